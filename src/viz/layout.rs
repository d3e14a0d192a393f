//! Tree layout: fixed depth spacing, evenly spread leaf rows.

use crate::tree::hierarchy::Hierarchy;

/// Horizontal distance between consecutive depths. Deliberately fixed
/// rather than scaled to the viewport, so spacing stays consistent and wide
/// trees overflow into pannable space instead of compressing.
pub const DEPTH_SPACING: f32 = 180.0;

/// Vertical margin above the first and below the last leaf row.
pub const VERTICAL_MARGIN: f32 = 40.0;

/// One laid-out visible tree: pre-order node indices plus
/// (parent, child) links for every visible non-root node.
#[derive(Debug, Default)]
pub struct Layout {
    pub order: Vec<usize>,
    pub links: Vec<(usize, usize)>,
}

/// Assign `(x, y)` to every visible node of `hierarchy`.
///
/// Visible leaves (collapsed subtrees render as leaves) are given evenly
/// spaced rows across the vertical extent in insertion order; each internal
/// node sits midway between its first and last child. A single visible
/// chain centers at `view_height / 2`.
pub fn compute(hierarchy: &mut Hierarchy, view_height: f32) -> Layout {
    let order = hierarchy.visible();
    let leaf_count = order
        .iter()
        .filter(|&&index| hierarchy.node(index).expanded_children().is_empty())
        .count();

    let extent = (view_height - 2.0 * VERTICAL_MARGIN).max(0.0);
    let step = if leaf_count > 1 {
        extent / (leaf_count - 1) as f32
    } else {
        0.0
    };

    let mut next_row = 0usize;
    place(hierarchy, 0, leaf_count, step, view_height, &mut next_row);

    let mut links = Vec::with_capacity(order.len().saturating_sub(1));
    for &index in &order {
        if let Some(parent) = hierarchy.node(index).parent {
            links.push((parent, index));
        }
    }
    Layout { order, links }
}

fn place(
    hierarchy: &mut Hierarchy,
    index: usize,
    leaf_count: usize,
    step: f32,
    view_height: f32,
    next_row: &mut usize,
) -> f32 {
    let children = hierarchy.node(index).expanded_children().to_vec();

    let y = if children.is_empty() {
        let y = if leaf_count <= 1 {
            view_height / 2.0
        } else {
            VERTICAL_MARGIN + *next_row as f32 * step
        };
        *next_row += 1;
        y
    } else {
        let mut first = f32::MAX;
        let mut last = f32::MIN;
        for &child in &children {
            let child_y = place(hierarchy, child, leaf_count, step, view_height, next_row);
            first = first.min(child_y);
            last = last.max(child_y);
        }
        (first + last) / 2.0
    };

    let depth = hierarchy.node(index).depth;
    let node = hierarchy.node_mut(index);
    node.x = depth as f32 * DEPTH_SPACING;
    node.y = y;
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeData;

    fn build(json: &str) -> Hierarchy {
        let payload: TreeData = serde_json::from_str(json).unwrap();
        let mut next_id = 0;
        Hierarchy::build(&payload, &mut next_id, (0.0, 300.0)).unwrap()
    }

    const WIDE: &str = r#"{"name":"r","type":"root","children":[
        {"name":"a","type":"entity_group","children":[{"name":"a1","type":"entity"},{"name":"a2","type":"entity"}]},
        {"name":"b","type":"theme"},
        {"name":"c","type":"theme"}
    ]}"#;

    #[test]
    fn depth_axis_is_proportional() {
        let mut h = build(WIDE);
        h.expand_all();
        compute(&mut h, 600.0);
        for index in h.visible() {
            let node = h.node(index);
            assert!((node.x - node.depth as f32 * DEPTH_SPACING).abs() < 1e-6);
            if let Some(parent) = node.parent {
                assert!(h.node(parent).x < node.x);
            }
        }
    }

    #[test]
    fn leaves_spread_evenly_in_order() {
        let mut h = build(WIDE);
        h.expand_all();
        compute(&mut h, 600.0);
        // Visible leaves: a1, a2, b, c — four rows across 600 - 80.
        let leaves: Vec<f32> = h
            .visible()
            .into_iter()
            .filter(|&i| h.node(i).expanded_children().is_empty())
            .map(|i| h.node(i).y)
            .collect();
        assert_eq!(leaves.len(), 4);
        let step = (600.0 - 2.0 * VERTICAL_MARGIN) / 3.0;
        for (row, y) in leaves.iter().enumerate() {
            assert!((y - (VERTICAL_MARGIN + row as f32 * step)).abs() < 1e-3);
        }
        // Insertion order preserved: strictly descending rows never happen.
        for pair in leaves.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn parent_centers_over_children() {
        let mut h = build(WIDE);
        h.expand_all();
        compute(&mut h, 600.0);
        let group = h.node(1);
        let first = h.node(group.expanded_children()[0]).y;
        let last = h.node(*group.expanded_children().last().unwrap()).y;
        assert!((group.y - (first + last) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn single_chain_centers_vertically() {
        let mut h = build(r#"{"name":"only","type":"root"}"#);
        compute(&mut h, 480.0);
        assert!((h.root().y - 240.0).abs() < 1e-6);
        assert!((h.root().x - 0.0).abs() < 1e-6);
    }

    #[test]
    fn order_is_preorder_and_links_skip_root() {
        let mut h = build(WIDE);
        h.expand_all();
        let layout = compute(&mut h, 600.0);
        assert_eq!(layout.order[0], 0);
        assert_eq!(layout.links.len(), layout.order.len() - 1);
        for &(parent, child) in &layout.links {
            assert_eq!(h.node(child).parent, Some(parent));
        }
    }

    #[test]
    fn collapsed_subtree_lays_out_as_leaf() {
        let mut h = build(WIDE);
        // Default policy: "a" is collapsed, so visible leaves are a, b, c.
        let layout = compute(&mut h, 600.0);
        assert_eq!(layout.order.len(), 4);
        let a = h.node(1);
        assert!(a.is_collapsed());
        assert!((a.x - DEPTH_SPACING).abs() < 1e-6);
    }
}
