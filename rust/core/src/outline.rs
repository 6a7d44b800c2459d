// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collapsible outline of a model's spatial structure.
//!
//! [`build_outline`] mirrors a [`SpatialNode`] tree one-to-one into plain
//! data. Nodes with children become branches (initially collapsed), nodes
//! without become leaves. Expansion and selection are local UI state and
//! never touch the viewer.

use rustc_hash::FxHashMap;

use crate::spatial::SpatialNode;

/// Branch or leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineKind {
    Leaf,
    Branch {
        expanded: bool,
        children: Vec<OutlineNode>,
    },
}

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub label: String,
    pub express_id: u32,
    pub kind: OutlineKind,
}

impl OutlineNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, OutlineKind::Leaf)
    }

    /// `Some(expanded)` for branches, `None` for leaves.
    pub fn expanded(&self) -> Option<bool> {
        match self.kind {
            OutlineKind::Branch { expanded, .. } => Some(expanded),
            OutlineKind::Leaf => None,
        }
    }

    pub fn children(&self) -> &[OutlineNode] {
        match &self.kind {
            OutlineKind::Branch { children, .. } => children,
            OutlineKind::Leaf => &[],
        }
    }

    /// Flips the expanded flag of a branch. Leaves are left alone.
    pub fn toggle(&mut self) -> Option<bool> {
        match &mut self.kind {
            OutlineKind::Branch { expanded, .. } => {
                *expanded = !*expanded;
                Some(*expanded)
            }
            OutlineKind::Leaf => None,
        }
    }
}

fn build_node(node: &SpatialNode) -> OutlineNode {
    let kind = if node.children.is_empty() {
        OutlineKind::Leaf
    } else {
        OutlineKind::Branch {
            expanded: false,
            children: node.children.iter().map(build_node).collect(),
        }
    };

    OutlineNode {
        label: node.label(),
        express_id: node.express_id,
        kind,
    }
}

fn index_paths(root: &OutlineNode) -> FxHashMap<u32, Vec<usize>> {
    let mut index = FxHashMap::default();
    let mut stack = vec![(root, Vec::new())];
    while let Some((node, path)) = stack.pop() {
        for (i, child) in node.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child, child_path));
        }
        // First occurrence wins if the viewer repeats an id.
        index.entry(node.express_id).or_insert(path);
    }
    index
}

/// Builds the outline for a model's spatial structure root.
pub fn build_outline(root: &SpatialNode) -> Outline {
    let root = build_node(root);
    let index = index_paths(&root);

    tracing::debug!(nodes = index.len(), "Built spatial outline");

    Outline {
        root,
        index,
        selected: None,
    }
}

/// Outline of one loaded model.
#[derive(Debug, Clone)]
pub struct Outline {
    root: OutlineNode,
    /// Express ID -> child-index path from the root
    index: FxHashMap<u32, Vec<usize>>,
    selected: Option<u32>,
}

impl Outline {
    pub fn root(&self) -> &OutlineNode {
        &self.root
    }

    /// Depth-first pre-order walk yielding `(depth, node)`.
    pub fn iter(&self) -> OutlineIter<'_> {
        OutlineIter {
            stack: vec![(0, &self.root)],
        }
    }

    /// Number of nodes, always at least the root.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn locate(&self, express_id: u32) -> Option<&OutlineNode> {
        let path = self.index.get(&express_id)?;
        let mut node = &self.root;
        for &i in path {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    fn locate_mut(&mut self, express_id: u32) -> Option<&mut OutlineNode> {
        let path = self.index.get(&express_id)?;
        let mut node = &mut self.root;
        for &i in path {
            node = match &mut node.kind {
                OutlineKind::Branch { children, .. } => children.get_mut(i)?,
                OutlineKind::Leaf => return None,
            };
        }
        Some(node)
    }

    /// Toggles the branch for `express_id`, returning its new state.
    pub fn toggle(&mut self, express_id: u32) -> Option<bool> {
        self.locate_mut(express_id)?.toggle()
    }

    /// Marks `express_id` as selected. Returns `false` if it is not part of
    /// this outline, in which case the selection is cleared.
    pub fn select(&mut self, express_id: u32) -> bool {
        let found = self.index.contains_key(&express_id);
        self.selected = found.then_some(express_id);
        found
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Nodes currently visible given each branch's expanded state.
    pub fn visible(&self) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.push(node);
            if node.expanded() == Some(true) {
                stack.extend(node.children().iter().rev());
            }
        }
        out
    }
}

/// Iterator returned by [`Outline::iter`].
pub struct OutlineIter<'a> {
    stack: Vec<(usize, &'a OutlineNode)>,
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = (usize, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
