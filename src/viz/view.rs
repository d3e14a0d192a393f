//! The public visualization surface: commands in, paintable frames out.
//!
//! `TreeView` wires the hierarchy, layout, scene, and viewport together and
//! is the only type the surrounding UI layer talks to. It knows nothing
//! about any particular rendering backend; the caller feeds it a clock and
//! paints the frames it samples.

use crate::tree::hierarchy::Hierarchy;
use crate::tree::TreeData;
use crate::viz::layout;
use crate::viz::scene::{Frame, Scene, MIN_RADIUS};
use crate::viz::tween::Point;
use crate::viz::viewport::Viewport;

/// Extra pick distance around a node's circle, in content units.
const HIT_SLOP: f32 = 4.0;

pub struct TreeView {
    hierarchy: Option<Hierarchy>,
    scene: Scene,
    pub viewport: Viewport,
    next_id: u64,
}

impl TreeView {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            hierarchy: None,
            scene: Scene::new(),
            viewport: Viewport::new(width, height),
            next_id: 0,
        }
    }

    pub fn has_tree(&self) -> bool {
        self.hierarchy.is_some()
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    /// Replace the tree from a payload and re-center on the result. A
    /// missing or unusable payload clears to the empty state instead.
    ///
    /// The id counter keeps running across replacements, so sprites from
    /// the previous tree exit normally while the new tree enters fresh.
    pub fn update_tree(&mut self, payload: Option<&TreeData>, now: f64) {
        let origin = (0.0, self.viewport.height / 2.0);
        let built =
            payload.and_then(|p| Hierarchy::build(p, &mut self.next_id, origin));
        match built {
            Some(hierarchy) => {
                self.hierarchy = Some(hierarchy);
                self.refresh(now);
                self.center_tree(now);
            }
            None => self.clear_tree(now),
        }
    }

    /// Drop the tree; the scene animates out. Idempotent.
    pub fn clear_tree(&mut self, now: f64) {
        self.hierarchy = None;
        self.scene.exit_all(now);
    }

    /// Expand or collapse one node and re-flow. Never re-centers.
    pub fn toggle_node(&mut self, index: usize, now: f64) {
        if let Some(hierarchy) = &mut self.hierarchy {
            hierarchy.toggle(index);
            self.refresh(now);
        }
    }

    pub fn expand_all(&mut self, now: f64) {
        if let Some(hierarchy) = &mut self.hierarchy {
            hierarchy.expand_all();
            self.refresh(now);
        }
    }

    pub fn collapse_all(&mut self, now: f64) {
        if let Some(hierarchy) = &mut self.hierarchy {
            hierarchy.collapse_all();
            self.refresh(now);
        }
    }

    /// Animate the viewport to fit the content the scene is settling
    /// toward. Safe with an empty scene.
    pub fn center_tree(&mut self, now: f64) {
        self.viewport.center_on(self.scene.content_bounds(), now);
    }

    /// Record a container resize; layout re-flows to the new extent but the
    /// viewport transform is left alone.
    pub fn resize(&mut self, width: f32, height: f32, now: f64) {
        if self.viewport.set_size(width, height) && self.hierarchy.is_some() {
            self.refresh(now);
        }
    }

    /// Layout, reconcile, stamp baselines.
    fn refresh(&mut self, now: f64) {
        let Some(hierarchy) = &mut self.hierarchy else {
            return;
        };
        let layout = layout::compute(hierarchy, self.viewport.height);
        self.scene.reconcile(hierarchy, &layout, now);
        hierarchy.stamp_positions();
    }

    /// Sample a paintable frame, advancing the viewport animation with it.
    pub fn sample(&mut self, now: f64) -> Frame {
        let mut frame = self.scene.sample(now);
        frame.animating |= self.viewport.tick(now);
        frame
    }

    /// Topmost live node under a content-space point.
    pub fn hit_test(&self, frame: &Frame, content: Point) -> Option<usize> {
        frame
            .nodes
            .iter()
            .rev()
            .find(|node| {
                node.hierarchy_index.is_some() && {
                    let reach = node.radius.max(MIN_RADIUS) + HIT_SLOP;
                    node.pos.distance_sq(content) <= reach * reach
                }
            })
            .and_then(|node| node.hierarchy_index)
    }

    /// Tooltip text for a node: name and kind always, magnitude,
    /// description, and polarity when the payload carried them.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let node = self.hierarchy.as_ref()?.get(index)?;
        let mut lines = vec![node.name.clone(), node.kind.label().to_string()];
        if let Some(value) = node.value {
            lines.push(format!("Value: {value}"));
        }
        if let Some(description) = &node.description {
            lines.push(description.clone());
        }
        if let Some(polarity) = node.polarity {
            lines.push(format!("Polarity: {polarity:.2}"));
        }
        Some(lines.join("\n"))
    }
}
