//! Pan/zoom transform over the content plane.
//!
//! `screen = content × scale + translate`. User pans and zooms apply
//! immediately; only `center_on` animates, and any direct manipulation
//! cancels that animation.

use crate::viz::tween::{Point, Tween, CENTER_SECS};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;

/// Fraction of the viewport a fitted tree may occupy.
const FIT_COVERAGE: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    translate: Point,
    scale: f32,
    anim: Option<(Tween<Point>, Tween<f32>)>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            translate: Point::new(0.0, 0.0),
            scale: 1.0,
            anim: None,
        }
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Record a container resize. Returns whether dimensions changed (the
    /// caller re-runs layout, but never re-centers on its own).
    pub fn set_size(&mut self, width: f32, height: f32) -> bool {
        let changed = (self.width - width).abs() > 0.5 || (self.height - height).abs() > 0.5;
        self.width = width;
        self.height = height;
        changed
    }

    /// Advance any in-flight centering animation. Returns true while moving.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some((translate, scale)) = &self.anim else {
            return false;
        };
        self.translate = translate.sample(now);
        self.scale = scale.sample(now);
        if translate.finished(now) && scale.finished(now) {
            self.anim = None;
            return false;
        }
        true
    }

    /// Immediate pan in screen pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.anim = None;
        self.translate.x += dx;
        self.translate.y += dy;
    }

    /// Immediate zoom by `factor` about a fixed screen point: the content
    /// under the pivot stays under it.
    pub fn zoom_about(&mut self, pivot: Point, factor: f32) {
        self.anim = None;
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let applied = new_scale / self.scale;
        self.translate.x = pivot.x - (pivot.x - self.translate.x) * applied;
        self.translate.y = pivot.y - (pivot.y - self.translate.y) * applied;
        self.scale = new_scale;
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.translate.x, p.y * self.scale + self.translate.y)
    }

    pub fn to_content(&self, p: Point) -> Point {
        Point::new((p.x - self.translate.x) / self.scale, (p.y - self.translate.y) / self.scale)
    }

    /// Transform fitting `(min, max)` into the coverage fraction of the
    /// viewport, centered, scale clamped to the usual range.
    fn fit(&self, min: Point, max: Point) -> (Point, f32) {
        let w = (max.x - min.x).max(1.0);
        let h = (max.y - min.y).max(1.0);
        let scale = (FIT_COVERAGE * self.width / w)
            .min(FIT_COVERAGE * self.height / h)
            .clamp(MIN_SCALE, MAX_SCALE);
        let center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        let translate = Point::new(
            self.width / 2.0 - center.x * scale,
            self.height / 2.0 - center.y * scale,
        );
        (translate, scale)
    }

    /// Animate toward the fitted transform. No content, no movement.
    pub fn center_on(&mut self, bounds: Option<(Point, Point)>, now: f64) {
        let Some((min, max)) = bounds else {
            return;
        };
        let (translate, scale) = self.fit(min, max);
        self.anim = Some((
            Tween::start(self.translate, translate, now, CENTER_SECS),
            Tween::start(self.scale, scale, now, CENTER_SECS),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_scale() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.zoom_about(Point::new(400.0, 300.0), 100.0);
        assert!((vp.scale() - MAX_SCALE).abs() < 1e-6);
        vp.zoom_about(Point::new(400.0, 300.0), 1e-6);
        assert!((vp.scale() - MIN_SCALE).abs() < 1e-6);
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(37.0, -12.0);
        let pivot = Point::new(200.0, 450.0);
        let anchor = vp.to_content(pivot);
        vp.zoom_about(pivot, 1.7);
        let after = vp.to_content(pivot);
        assert!(anchor.distance_sq(after) < 1e-4);
    }

    #[test]
    fn round_trip_screen_content() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(100.0, 50.0);
        vp.zoom_about(Point::new(0.0, 0.0), 2.0);
        let p = Point::new(123.0, -45.0);
        let back = vp.to_content(vp.to_screen(p));
        assert!(p.distance_sq(back) < 1e-4);
    }

    #[test]
    fn fit_centers_content() {
        let vp = Viewport::new(1000.0, 500.0);
        let (translate, scale) = vp.fit(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        // Both axes allow 4.5x, so the clamp binds.
        assert!((scale - MAX_SCALE).abs() < 1e-6);
        let center = Point::new(
            100.0 * scale + translate.x,
            50.0 * scale + translate.y,
        );
        assert!((center.x - 500.0).abs() < 1e-3);
        assert!((center.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn center_on_none_is_a_noop() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(10.0, 20.0);
        let (translate, scale) = (vp.translate(), vp.scale());
        vp.center_on(None, 1.0);
        assert!(!vp.tick(1.5));
        assert_eq!(vp.translate(), translate);
        assert!((vp.scale() - scale).abs() < 1e-6);
    }

    #[test]
    fn centering_animates_then_settles() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.center_on(Some((Point::new(0.0, 0.0), Point::new(400.0, 300.0))), 0.0);
        assert!(vp.tick(CENTER_SECS / 2.0));
        let mid = vp.translate();
        assert!(!vp.tick(CENTER_SECS + 0.01));
        assert!(vp.translate() != mid);
        // Fully fitted: content center maps to viewport center.
        let screen = vp.to_screen(Point::new(200.0, 150.0));
        assert!((screen.x - 400.0).abs() < 1e-2);
        assert!((screen.y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn pan_cancels_centering() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.center_on(Some((Point::new(0.0, 0.0), Point::new(100.0, 100.0))), 0.0);
        vp.tick(0.1);
        vp.pan(5.0, 5.0);
        let frozen = vp.translate();
        assert!(!vp.tick(0.2));
        assert_eq!(vp.translate(), frozen);
    }

    #[test]
    fn resize_reports_change() {
        let mut vp = Viewport::new(800.0, 600.0);
        assert!(!vp.set_size(800.0, 600.0));
        assert!(vp.set_size(1024.0, 600.0));
        assert!((vp.width - 1024.0).abs() < 1e-6);
    }
}
