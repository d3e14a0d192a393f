//! Tree-canvas rendering and interaction for `StudioApp`.
//!
//! Consumes sampled frames from the visualization core and paints them with
//! the egui Painter; pointer input maps to pan/zoom/toggle/hover commands.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};

use resonance::viz::tween::Point;

use super::StudioApp;

/// Wheel scroll → zoom factor exponent per scroll unit.
const WHEEL_ZOOM_RATE: f32 = 0.0015;

/// Segments used to flatten each link curve.
const CURVE_SEGMENTS: usize = 24;

/// Theme colors for the tree canvas.
struct Theme {
    canvas_bg: Color32,
    link: Color32,
    node_stroke: Color32,
    label: Color32,
    placeholder: Color32,
    tooltip_bg: Color32,
    tooltip_text: Color32,
}

impl Theme {
    fn light() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(250, 250, 252),
            link: Color32::from_rgb(176, 180, 192),
            node_stroke: Color32::from_rgb(255, 255, 255),
            label: Color32::from_rgb(38, 38, 46),
            placeholder: Color32::from_rgb(160, 160, 165),
            tooltip_bg: Color32::from_rgba_premultiplied(30, 30, 38, 235),
            tooltip_text: Color32::from_rgb(230, 230, 240),
        }
    }

    fn dark() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(24, 24, 30),
            link: Color32::from_rgb(90, 94, 108),
            node_stroke: Color32::from_rgb(24, 24, 30),
            label: Color32::from_rgb(210, 210, 220),
            placeholder: Color32::from_rgb(100, 100, 110),
            tooltip_bg: Color32::from_rgba_premultiplied(240, 240, 245, 240),
            tooltip_text: Color32::from_rgb(30, 30, 38),
        }
    }
}

impl StudioApp {
    /// Render the central tree viewport and route its interactions.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: f64) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );
        self.view.resize(rect.width(), rect.height(), now);

        // Drag pans; wheel and pinch zoom about the pointer.
        if response.dragged() {
            let delta = response.drag_delta();
            self.view.viewport.pan(delta.x, delta.y);
        }
        if let Some(pos) = response.hover_pos() {
            let pivot = Point::new(pos.x - rect.min.x, pos.y - rect.min.y);
            let pinch = ctx.input(|i| i.zoom_delta());
            if (pinch - 1.0).abs() > 1e-3 {
                self.view.viewport.zoom_about(pivot, pinch);
            }
            let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.view.viewport.zoom_about(pivot, (scroll * WHEEL_ZOOM_RATE).exp());
            }
        }

        let frame = self.view.sample(now);

        // Hover and click hit-testing happen in content space.
        self.hovered = None;
        if let Some(pos) = response.hover_pos() {
            let local = Point::new(pos.x - rect.min.x, pos.y - rect.min.y);
            let content = self.view.viewport.to_content(local);
            self.hovered = self.view.hit_test(&frame, content);
        }
        if response.clicked() {
            if let Some(index) = self.hovered {
                self.view.toggle_node(index, now);
                ctx.request_repaint();
            }
        }

        let theme = if self.dark_mode { Theme::dark() } else { Theme::light() };
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, Rounding::ZERO, theme.canvas_bg);

        if frame.nodes.is_empty() {
            let message = if self.loading {
                "Analyzing..."
            } else {
                "Start typing to grow the resonance tree"
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(16.0),
                theme.placeholder,
            );
            return;
        }

        let origin = rect.min;
        let scale = self.view.viewport.scale();
        let translate = self.view.viewport.translate();
        let to_screen = |p: Point| -> Pos2 {
            Pos2::new(
                origin.x + p.x * scale + translate.x,
                origin.y + p.y * scale + translate.y,
            )
        };

        // Links go under the nodes.
        for link in &frame.links {
            if link.alpha <= 0.01 {
                continue;
            }
            let points = flatten_curve(&link.points, &to_screen);
            let stroke = Stroke::new(
                (1.5 * scale).clamp(0.5, 3.0),
                theme.link.gamma_multiply(link.alpha),
            );
            painter.add(egui::Shape::line(points, stroke));
        }

        for node in &frame.nodes {
            if node.alpha <= 0.01 {
                continue;
            }
            let center = to_screen(node.pos);
            if !rect.expand(40.0).contains(center) {
                continue;
            }
            let radius = (node.radius * scale).max(0.5);
            let fill = Color32::from_rgb(node.color[0], node.color[1], node.color[2])
                .gamma_multiply(node.alpha);
            let hovered = node.hierarchy_index.is_some() && node.hierarchy_index == self.hovered;
            let stroke_width = if hovered { 2.5 } else { 1.5 };
            painter.circle(
                center,
                radius,
                fill,
                Stroke::new(stroke_width, theme.node_stroke.gamma_multiply(node.alpha)),
            );

            if !node.label.is_empty() && scale > 0.35 {
                painter.text(
                    center + Vec2::new(radius + 6.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional(13.0),
                    theme.label.gamma_multiply(node.alpha),
                );
            }
        }

        // Tooltip overlay near the pointer.
        if let (Some(index), Some(pos)) = (self.hovered, response.hover_pos()) {
            if let Some(text) = self.view.tooltip(index) {
                draw_tooltip(&painter, rect, pos, &text, &theme);
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        }

        if frame.animating {
            ctx.request_repaint();
        }
    }
}

/// Flatten cubic Bézier control points into a screen-space polyline.
fn flatten_curve(points: &[Point; 4], to_screen: &impl Fn(Point) -> Pos2) -> Vec<Pos2> {
    let mut out = Vec::with_capacity(CURVE_SEGMENTS + 1);
    for step in 0..=CURVE_SEGMENTS {
        let t = step as f32 / CURVE_SEGMENTS as f32;
        out.push(to_screen(cubic_at(points, t)));
    }
    out
}

fn cubic_at(p: &[Point; 4], t: f32) -> Point {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Point::new(
        w0 * p[0].x + w1 * p[1].x + w2 * p[2].x + w3 * p[3].x,
        w0 * p[0].y + w1 * p[1].y + w2 * p[2].y + w3 * p[3].y,
    )
}

fn draw_tooltip(painter: &egui::Painter, rect: Rect, pointer: Pos2, text: &str, theme: &Theme) {
    let galley = painter.layout(
        text.to_string(),
        FontId::proportional(12.5),
        theme.tooltip_text,
        260.0,
    );
    let padding = Vec2::new(8.0, 6.0);
    let size = galley.rect.size() + padding * 2.0;

    // Prefer below-right of the pointer, but stay inside the canvas.
    let mut min = pointer + Vec2::new(14.0, 14.0);
    if min.x + size.x > rect.max.x {
        min.x = pointer.x - size.x - 14.0;
    }
    if min.y + size.y > rect.max.y {
        min.y = pointer.y - size.y - 14.0;
    }
    let bg = Rect::from_min_size(min, size);

    painter.rect_filled(bg, Rounding::same(4.0), theme.tooltip_bg);
    painter.galley(bg.min + padding, galley, theme.tooltip_text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_hits_endpoints() {
        let p = [
            Point::new(0.0, 0.0),
            Point::new(90.0, 0.0),
            Point::new(90.0, 60.0),
            Point::new(180.0, 60.0),
        ];
        let start = cubic_at(&p, 0.0);
        let end = cubic_at(&p, 1.0);
        assert!(start.distance_sq(p[0]) < 1e-6);
        assert!(end.distance_sq(p[3]) < 1e-6);
    }

    #[test]
    fn cubic_midpoint_between_handles() {
        let p = [
            Point::new(0.0, 0.0),
            Point::new(90.0, 0.0),
            Point::new(90.0, 60.0),
            Point::new(180.0, 60.0),
        ];
        let mid = cubic_at(&p, 0.5);
        assert!((mid.x - 90.0).abs() < 1e-3);
        assert!((mid.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn flatten_produces_fixed_segment_count() {
        let p = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 1.0),
        ];
        let to_screen = |pt: Point| Pos2::new(pt.x, pt.y);
        let line = flatten_curve(&p, &to_screen);
        assert_eq!(line.len(), CURVE_SEGMENTS + 1);
        assert_eq!(line[0], Pos2::new(0.0, 0.0));
        assert_eq!(line[CURVE_SEGMENTS], Pos2::new(3.0, 1.0));
    }
}
