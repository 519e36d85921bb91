use crate::error::{WeaveError, WeaveResult};
use crate::node::Node;
use std::collections::HashSet;

/// Maximum tree nesting depth. Generated code can recurse arbitrarily;
/// past this the tree is rejected rather than rendered.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Validate a tree before rendering: depth cap and unique node ids.
pub fn validate_tree(root: &Node) -> WeaveResult<()> {
    let mut ids = HashSet::new();
    walk(root, 1, &mut ids)
}

fn walk<'a>(node: &'a Node, depth: usize, ids: &mut HashSet<&'a str>) -> WeaveResult<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(WeaveError::MaxNestingDepthExceeded {
            max_depth: MAX_NESTING_DEPTH,
        });
    }
    if let Some(id) = node.id() {
        if !ids.insert(id) {
            return Err(WeaveError::DuplicateId { id: id.to_string() });
        }
    }
    for child in node.children() {
        walk(child, depth + 1, ids)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Container, Text};

    fn text(id: Option<&str>) -> Node {
        Node::Text(Text {
            id: id.map(String::from),
            class: None,
            text: "x".to_string(),
        })
    }

    #[test]
    fn accepts_flat_tree_with_unique_ids() {
        let root = Node::Container(Container {
            id: Some("root".into()),
            class: None,
            children: vec![text(Some("a")), text(Some("b")), text(None)],
        });
        assert!(validate_tree(&root).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let root = Node::Container(Container {
            id: None,
            class: None,
            children: vec![text(Some("dup")), text(Some("dup"))],
        });
        assert!(matches!(
            validate_tree(&root),
            Err(WeaveError::DuplicateId { id }) if id == "dup"
        ));
    }

    #[test]
    fn rejects_overly_deep_tree() {
        let mut node = text(None);
        for _ in 0..MAX_NESTING_DEPTH + 1 {
            node = Node::Container(Container {
                id: None,
                class: None,
                children: vec![node],
            });
        }
        assert!(matches!(
            validate_tree(&node),
            Err(WeaveError::MaxNestingDepthExceeded { .. })
        ));
    }
}
