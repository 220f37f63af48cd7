//! Breadcrumbs and neighbours of a note within a tree.

use serde::Serialize;

use crate::tree::{NoteTree, TreeNode};

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub title: String,
    pub path: String,
}

/// Reference to a neighbouring note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NoteLink {
    pub id: String,
    pub title: String,
}

impl From<&TreeNode> for NoteLink {
    fn from(node: &TreeNode) -> Self {
        Self {
            id: node.note().id.clone(),
            title: node.note().title.clone(),
        }
    }
}

/// Where a note sits inside a tree.
///
/// The default value is the empty context returned for notes missing from
/// the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    /// Root-to-node path, inclusive.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Other children of the parent, in tree order.
    pub siblings: Vec<NoteLink>,
    /// Direct children, in tree order.
    pub children: Vec<NoteLink>,
    pub parent: Option<NoteLink>,
    pub is_leaf: bool,
    pub depth: usize,
}

impl NavigationContext {
    /// True when the target was not found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breadcrumbs.is_empty()
    }
}

/// Compute the navigation context of `target_id` in `tree`.
#[must_use]
pub fn navigate(target_id: &str, tree: &NoteTree) -> NavigationContext {
    let Some(index) = tree.find(target_id) else {
        return NavigationContext::default();
    };
    let node = tree.node(index);

    let breadcrumbs = tree
        .path_to(index)
        .into_iter()
        .map(|i| {
            let note = tree.node(i).note();
            Breadcrumb {
                id: note.id.clone(),
                title: note.title.clone(),
                path: note.path.clone(),
            }
        })
        .collect();

    let siblings = node
        .parent()
        .map(|p| {
            tree.node(p)
                .children()
                .iter()
                .filter(|&&c| c != index)
                .map(|&c| NoteLink::from(tree.node(c)))
                .collect()
        })
        .unwrap_or_default();

    NavigationContext {
        breadcrumbs,
        siblings,
        children: node
            .children()
            .iter()
            .map(|&c| NoteLink::from(tree.node(c)))
            .collect(),
        parent: node.parent().map(|p| NoteLink::from(tree.node(p))),
        is_leaf: node.is_leaf(),
        depth: node.depth(),
    }
}
