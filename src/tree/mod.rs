pub mod hierarchy;

use serde::Deserialize;

/// Node category assigned by the analysis service.
///
/// Unrecognized categories deserialize to `Other` and render with the
/// neutral fallback color instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    EntityGroup,
    Entity,
    RelationshipGroup,
    Relationship,
    ThemeGroup,
    Theme,
    #[serde(other)]
    Other,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Other
    }
}

impl NodeKind {
    /// Fill color for nodes of this kind.
    pub fn color(self) -> [u8; 3] {
        match self {
            NodeKind::Root => [230, 90, 90],
            NodeKind::EntityGroup => [66, 153, 225],
            NodeKind::Entity => [99, 179, 237],
            NodeKind::RelationshipGroup => [72, 187, 120],
            NodeKind::Relationship => [134, 219, 162],
            NodeKind::ThemeGroup => [159, 122, 234],
            NodeKind::Theme => [196, 163, 252],
            NodeKind::Other => [150, 150, 158],
        }
    }

    /// Human-readable label shown in tooltips.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::EntityGroup => "Entity Group",
            NodeKind::Entity => "Entity",
            NodeKind::RelationshipGroup => "Relationship Group",
            NodeKind::Relationship => "Relationship",
            NodeKind::ThemeGroup => "Theme Group",
            NodeKind::Theme => "Theme",
            NodeKind::Other => "Unknown",
        }
    }
}

/// Sentiment annotation attached to a tree node.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NodeSentiment {
    pub polarity: f64,
}

/// One node of the tree payload returned by the analysis service.
///
/// Every field is optional on the wire; a payload whose root has no usable
/// `name` is treated as "no data" rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeData {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sentiment: Option<NodeSentiment>,
    #[serde(default)]
    pub children: Vec<TreeData>,
}

impl TreeData {
    /// Whether this payload can seed a hierarchy at all.
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Recursively count all nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_known_kinds() {
        let data: TreeData = serde_json::from_str(
            r#"{"name":"PERSON (2)","type":"entity_group","value":2,"children":[
                {"name":"Alice","type":"entity","value":5}
            ]}"#,
        )
        .unwrap();
        assert_eq!(data.kind, NodeKind::EntityGroup);
        assert_eq!(data.children.len(), 1);
        assert_eq!(data.children[0].kind, NodeKind::Entity);
        assert_eq!(data.children[0].value, Some(5.0));
    }

    #[test]
    fn unknown_kind_falls_back() {
        let data: TreeData =
            serde_json::from_str(r#"{"name":"x","type":"quantum_vibe"}"#).unwrap();
        assert_eq!(data.kind, NodeKind::Other);
        assert_eq!(data.kind.color(), [150, 150, 158]);
    }

    #[test]
    fn missing_name_is_unusable() {
        let data: TreeData = serde_json::from_str(r#"{"type":"root"}"#).unwrap();
        assert!(!data.is_usable());
        let blank: TreeData = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(!blank.is_usable());
    }

    #[test]
    fn sentiment_ignores_extra_fields() {
        let data: TreeData = serde_json::from_str(
            r#"{"name":"Positive Resonance","type":"root",
                "sentiment":{"polarity":0.42,"subjectivity":0.6,"confidence":0.42}}"#,
        )
        .unwrap();
        let s = data.sentiment.unwrap();
        assert!((s.polarity - 0.42).abs() < 1e-9);
    }

    #[test]
    fn node_count_recurses() {
        let data: TreeData = serde_json::from_str(
            r#"{"name":"r","children":[{"name":"a"},{"name":"b","children":[{"name":"c"}]}]}"#,
        )
        .unwrap();
        assert_eq!(data.node_count(), 4);
    }
}
