//! Tree model shared by the parser, serializer and builder.

use serde::{Deserialize, Serialize};

/// One named field of a selector, optionally selecting nested sub-fields.
///
/// A node whose `children` is `None` or an empty list is a leaf and
/// serializes without parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FieldNode>>,
}

impl FieldNode {
    /// Create a leaf field.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
        }
    }

    /// Create a field that owns a (possibly empty) list of children.
    pub fn branch(name: impl Into<String>, children: Vec<FieldNode>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
        }
    }

    /// True when the node serializes without parentheses.
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().map_or(true, Vec::is_empty)
    }

    /// Children list, created empty on first access.
    pub fn children_mut(&mut self) -> &mut Vec<FieldNode> {
        self.children.get_or_insert_with(Vec::new)
    }
}

impl std::fmt::Display for FieldNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::serialize_field_structure(std::slice::from_ref(self)))
    }
}

// Unlinks descendants onto a worklist so dropping a deep tree does not
// recurse once per level.
impl Drop for FieldNode {
    fn drop(&mut self) {
        let mut pending = self.children.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children.take() {
                pending.extend(children);
            }
        }
    }
}

/// Number of levels in the deepest branch; `0` for an empty forest.
pub fn forest_depth(forest: &[FieldNode]) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&FieldNode, usize)> = forest.iter().map(|node| (node, 1)).collect();

    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        if let Some(children) = &node.children {
            pending.extend(children.iter().map(|child| (child, depth + 1)));
        }
    }

    deepest
}

/// Index of the first node named `name` at a single level.
pub(crate) fn position_of(level: &[FieldNode], name: &str) -> Option<usize> {
    level.iter().position(|node| node.name == name)
}

/// Resolve a dot-path by exact name match at each level.
///
/// The empty path never resolves: its only segment is `""`, and no stored
/// node has an empty name.
pub(crate) fn find_path_mut<'a>(
    forest: &'a mut [FieldNode],
    path: &str,
) -> Option<&'a mut FieldNode> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut node = forest.iter_mut().find(|node| node.name == first)?;

    for segment in segments {
        node = node
            .children
            .as_mut()?
            .iter_mut()
            .find(|child| child.name == segment)?;
    }

    Some(node)
}
