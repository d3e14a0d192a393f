//! Scene reconciliation: stable-identity enter/update/exit transitions.
//!
//! The scene holds one sprite per node id and one per link (keyed by the
//! child's id). Reconciliation joins the freshly laid-out hierarchy against
//! the sprite set: entering sprites grow out of their parent's previous
//! position, updating sprites glide to their new target, exiting sprites
//! shrink into the root's current position and are pruned once their
//! transitions complete. Re-invoking reconciliation mid-flight retargets
//! the affected tweens; the latest pass always wins.

use std::collections::{HashMap, HashSet};

use crate::tree::hierarchy::Hierarchy;
use crate::tree::NodeKind;
use crate::viz::layout::Layout;
use crate::viz::tween::{Point, Tween, TRANSITION_SECS};

pub const MIN_RADIUS: f32 = 4.0;
pub const MAX_RADIUS: f32 = 10.0;

/// Magnitude used when the payload omits `value`.
pub const DEFAULT_MAGNITUDE: f64 = 4.0;

/// Entering and exiting sprites use a near-zero radius rather than zero so
/// no sampled frame ever contains a degenerate circle.
const EPSILON_RADIUS: f32 = 0.1;

/// Radius for a node magnitude, clamped to the display range.
pub fn node_radius(value: Option<f64>) -> f32 {
    (value.unwrap_or(DEFAULT_MAGNITUDE) as f32).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Cubic Bézier control points for a parent→child connector, with both
/// control handles at the horizontal midpoint.
pub fn link_curve(from: Point, to: Point) -> [Point; 4] {
    let mid = (from.x + to.x) / 2.0;
    [from, Point::new(mid, from.y), Point::new(mid, to.y), to]
}

#[derive(Debug, Clone)]
struct NodeSprite {
    id: u64,
    label: String,
    kind: NodeKind,
    /// Arena index while the node is part of the live tree; cleared on exit.
    hierarchy_index: Option<usize>,
    pos: Tween<Point>,
    radius: Tween<f32>,
    alpha: Tween<f32>,
    exiting: bool,
}

#[derive(Debug, Clone)]
struct LinkSprite {
    parent_id: u64,
    child_id: u64,
    alpha: Tween<f32>,
    exiting: bool,
}

/// A node ready to paint.
#[derive(Debug, Clone)]
pub struct FrameNode {
    pub id: u64,
    pub hierarchy_index: Option<usize>,
    pub label: String,
    pub color: [u8; 3],
    pub pos: Point,
    pub radius: f32,
    pub alpha: f32,
}

/// A link ready to paint: Bézier control points parent→child.
#[derive(Debug, Clone)]
pub struct FrameLink {
    pub points: [Point; 4],
    pub alpha: f32,
}

/// Everything needed to paint one instant of the scene.
#[derive(Debug, Default)]
pub struct Frame {
    pub nodes: Vec<FrameNode>,
    pub links: Vec<FrameLink>,
    /// Whether any transition was still in flight at the sampled instant.
    pub animating: bool,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<u64, NodeSprite>,
    links: HashMap<u64, LinkSprite>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: HashMap::new(), links: HashMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Reconcile the sprite set against a freshly laid-out hierarchy.
    ///
    /// Must run after `layout::compute` and before
    /// `Hierarchy::stamp_positions`: entering sprites read their parent's
    /// previous `(x0, y0)` while targets come from the new `(x, y)`.
    pub fn reconcile(&mut self, hierarchy: &Hierarchy, layout: &Layout, now: f64) {
        let root = hierarchy.root();
        let root_current = Point::new(root.x, root.y);
        let root_previous = Point::new(root.x0, root.y0);

        let live: HashSet<u64> =
            layout.order.iter().map(|&index| hierarchy.node(index).id).collect();
        let live_links: HashSet<u64> =
            layout.links.iter().map(|&(_, child)| hierarchy.node(child).id).collect();

        // Exits: collapse into the root's current position and fade.
        for sprite in self.nodes.values_mut() {
            if !live.contains(&sprite.id) && !sprite.exiting {
                sprite.exiting = true;
                sprite.hierarchy_index = None;
                sprite.pos.retarget(root_current, now, TRANSITION_SECS);
                sprite.radius.retarget(EPSILON_RADIUS, now, TRANSITION_SECS);
                sprite.alpha.retarget(0.0, now, TRANSITION_SECS);
            }
        }
        for link in self.links.values_mut() {
            if !live_links.contains(&link.child_id) && !link.exiting {
                link.exiting = true;
                link.alpha.retarget(0.0, now, TRANSITION_SECS);
            }
        }

        // Enters and updates.
        for &index in &layout.order {
            let node = hierarchy.node(index);
            let target = Point::new(node.x, node.y);
            let radius = node_radius(node.value);
            match self.nodes.get_mut(&node.id) {
                Some(sprite) => {
                    // A sprite mid-exit can come straight back (rapid
                    // re-expand); the new targets simply take over.
                    sprite.exiting = false;
                    sprite.hierarchy_index = Some(index);
                    sprite.label.clone_from(&node.name);
                    sprite.kind = node.kind;
                    if sprite.pos.target() != target {
                        sprite.pos.retarget(target, now, TRANSITION_SECS);
                    }
                    if sprite.radius.target() != radius {
                        sprite.radius.retarget(radius, now, TRANSITION_SECS);
                    }
                    if sprite.alpha.target() != 1.0 {
                        sprite.alpha.retarget(1.0, now, TRANSITION_SECS);
                    }
                }
                None => {
                    let origin = match node.parent {
                        Some(parent) => {
                            let p = hierarchy.node(parent);
                            Point::new(p.x0, p.y0)
                        }
                        None => root_previous,
                    };
                    self.nodes.insert(
                        node.id,
                        NodeSprite {
                            id: node.id,
                            label: node.name.clone(),
                            kind: node.kind,
                            hierarchy_index: Some(index),
                            pos: Tween::start(origin, target, now, TRANSITION_SECS),
                            radius: Tween::start(EPSILON_RADIUS, radius, now, TRANSITION_SECS),
                            alpha: Tween::start(0.0, 1.0, now, TRANSITION_SECS),
                            exiting: false,
                        },
                    );
                }
            }
        }

        for &(parent, child) in &layout.links {
            let parent_id = hierarchy.node(parent).id;
            let child_id = hierarchy.node(child).id;
            match self.links.get_mut(&child_id) {
                Some(link) => {
                    link.exiting = false;
                    link.parent_id = parent_id;
                    if link.alpha.target() != 1.0 {
                        link.alpha.retarget(1.0, now, TRANSITION_SECS);
                    }
                }
                None => {
                    self.links.insert(
                        child_id,
                        LinkSprite {
                            parent_id,
                            child_id,
                            alpha: Tween::start(0.0, 1.0, now, TRANSITION_SECS),
                            exiting: false,
                        },
                    );
                }
            }
        }
    }

    /// Send every sprite into its exit transition. With no surviving root to
    /// collapse into, sprites fade out in place. Idempotent.
    pub fn exit_all(&mut self, now: f64) {
        for sprite in self.nodes.values_mut() {
            if !sprite.exiting {
                sprite.exiting = true;
                sprite.hierarchy_index = None;
                let here = sprite.pos.sample(now);
                sprite.pos.retarget(here, now, TRANSITION_SECS);
                sprite.radius.retarget(EPSILON_RADIUS, now, TRANSITION_SECS);
                sprite.alpha.retarget(0.0, now, TRANSITION_SECS);
            }
        }
        for link in self.links.values_mut() {
            if !link.exiting {
                link.exiting = true;
                link.alpha.retarget(0.0, now, TRANSITION_SECS);
            }
        }
    }

    /// Bounding box of the content the scene is settling toward: target
    /// positions of every non-exiting sprite, padded by target radius.
    /// `None` when nothing is live.
    pub fn content_bounds(&self) -> Option<(Point, Point)> {
        let mut bounds: Option<(Point, Point)> = None;
        for sprite in self.nodes.values().filter(|s| !s.exiting) {
            let p = sprite.pos.target();
            let r = sprite.radius.target().max(MIN_RADIUS);
            let (min, max) = bounds.get_or_insert((p, p));
            min.x = min.x.min(p.x - r);
            min.y = min.y.min(p.y - r);
            max.x = max.x.max(p.x + r);
            max.y = max.y.max(p.y + r);
        }
        bounds
    }

    /// Sample every sprite at `now`, pruning exits whose transitions have
    /// completed. Output is sorted by id for a stable draw order.
    pub fn sample(&mut self, now: f64) -> Frame {
        self.nodes.retain(|_, sprite| !(sprite.exiting && sprite.alpha.finished(now)));

        let mut positions: HashMap<u64, Point> = HashMap::with_capacity(self.nodes.len());
        let mut frame = Frame::default();

        for sprite in self.nodes.values() {
            let pos = sprite.pos.sample(now);
            positions.insert(sprite.id, pos);
            frame.animating |= !(sprite.pos.finished(now)
                && sprite.radius.finished(now)
                && sprite.alpha.finished(now));
            frame.nodes.push(FrameNode {
                id: sprite.id,
                hierarchy_index: if sprite.exiting { None } else { sprite.hierarchy_index },
                label: sprite.label.clone(),
                color: sprite.kind.color(),
                pos,
                radius: sprite.radius.sample(now),
                alpha: sprite.alpha.sample(now),
            });
        }

        // A link dies with either endpoint: node and link exit transitions
        // share start and duration, so nothing disappears early.
        self.links.retain(|_, link| {
            !(link.exiting && link.alpha.finished(now))
                && positions.contains_key(&link.parent_id)
                && positions.contains_key(&link.child_id)
        });

        let mut link_order: Vec<&LinkSprite> = self.links.values().collect();
        link_order.sort_by_key(|link| link.child_id);
        for link in link_order {
            let from = positions[&link.parent_id];
            let to = positions[&link.child_id];
            frame.animating |= !link.alpha.finished(now);
            frame.links.push(FrameLink {
                points: link_curve(from, to),
                alpha: link.alpha.sample(now),
            });
        }

        frame.nodes.sort_by_key(|node| node.id);
        frame
    }
}
