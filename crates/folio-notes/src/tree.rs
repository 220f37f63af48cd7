//! Navigation trees built from wiki links.
//!
//! # Architecture
//!
//! A [`NoteTree`] stores its nodes in a flat `Vec` in pre-order, with
//! children and parent tracked by index. Node 0 is always the root. This
//! provides:
//! - O(d) root-to-node paths where d is the node depth
//! - No reference cycles between parents and children
//!
//! Trees are expanded depth first. A note appears at most once per tree: the
//! first path that reaches it wins and later references are dropped.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::links::extract_links;
use crate::note::Note;
use crate::resolver::LinkResolver;

/// One note's position in a tree.
#[derive(Clone, Debug)]
pub struct TreeNode {
    note: Arc<Note>,
    depth: usize,
    is_root: bool,
    is_leaf: bool,
    children: Vec<usize>,
    parent: Option<usize>,
}

impl TreeNode {
    #[must_use]
    pub fn note(&self) -> &Arc<Note> {
        &self.note
    }

    /// Distance from the root (root is 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// True iff no child was attached during expansion.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Child node indices in link order.
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

/// Rooted, ordered tree of notes.
#[derive(Clone, Debug)]
pub struct NoteTree {
    nodes: Vec<TreeNode>,
}

impl NoteTree {
    /// The root node.
    #[must_use]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    /// Node by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    /// Nodes in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the node holding note `id`, searched in pre-order.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.note.id == id)
    }

    /// Indices from the root down to `index`, inclusive.
    #[must_use]
    pub fn path_to(&self, index: usize) -> Vec<usize> {
        let mut path = vec![index];
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    fn item(&self, index: usize) -> TreeItem<'_> {
        let node = &self.nodes[index];
        TreeItem {
            id: &node.note.id,
            title: &node.note.title,
            path: &node.note.path,
            group: node.note.group.as_deref(),
            is_root: node.is_root,
            is_leaf: node.is_leaf,
            depth: node.depth,
            children_count: node.children.len(),
            link_tokens: &node.note.links,
            children: node.children.iter().map(|&c| self.item(c)).collect(),
        }
    }
}

/// Nested serialization view of a tree node.
#[derive(Serialize)]
struct TreeItem<'a> {
    id: &'a str,
    title: &'a str,
    path: &'a str,
    group: Option<&'a str>,
    is_root: bool,
    is_leaf: bool,
    depth: usize,
    children_count: usize,
    link_tokens: &'a [String],
    children: Vec<TreeItem<'a>>,
}

impl Serialize for NoteTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.item(0).serialize(serializer)
    }
}

/// Builds trees over a fixed set of notes.
pub struct TreeBuilder<'a> {
    resolver: LinkResolver<'a>,
}

impl<'a> TreeBuilder<'a> {
    /// Index `notes` for resolution.
    #[must_use]
    pub fn new(notes: &'a [Arc<Note>]) -> Self {
        Self {
            resolver: LinkResolver::new(notes),
        }
    }

    /// Expand a tree from `root`.
    ///
    /// The root need not be part of the indexed notes.
    #[must_use]
    pub fn build(&self, root: &Arc<Note>) -> NoteTree {
        let mut nodes = Vec::new();
        let mut visited = HashSet::from([root.id.clone()]);
        self.expand(Arc::clone(root), 0, None, &mut visited, &mut nodes);

        tracing::debug!(root = %root.id, nodes = nodes.len(), "Built note tree");
        NoteTree { nodes }
    }

    fn expand(
        &self,
        note: Arc<Note>,
        depth: usize,
        parent: Option<usize>,
        visited: &mut HashSet<String>,
        nodes: &mut Vec<TreeNode>,
    ) -> usize {
        let index = nodes.len();
        nodes.push(TreeNode {
            note: Arc::clone(&note),
            depth,
            is_root: parent.is_none(),
            is_leaf: false,
            children: Vec::new(),
            parent,
        });

        for token in extract_links(&note.content) {
            let Some(target) = self
                .resolver
                .resolve(&token, &note.category, note.group.as_deref())
            else {
                continue;
            };
            if !visited.insert(target.id.clone()) {
                continue;
            }
            let child = self.expand(Arc::clone(target), depth + 1, Some(index), visited, nodes);
            nodes[index].children.push(child);
        }

        nodes[index].is_leaf = nodes[index].children.is_empty();
        index
    }
}

/// Build a single tree from `root` over `notes`.
#[must_use]
pub fn build_tree(root: &Arc<Note>, notes: &[Arc<Note>]) -> NoteTree {
    TreeBuilder::new(notes).build(root)
}
