//! Arena stylesheet AST.
//!
//! Nodes live in one flat vector; a [`NodeId`] is a stable integer handle
//! assigned at parse time. Parent links, child lists, and every auxiliary
//! index the engine builds (sections, resolutions) are keyed by that id, so
//! no identity-keyed maps are needed anywhere.

use std::fmt;

/// Stable handle to a node in a [`Stylesheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Closed sum of stylesheet node categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Rule {
        /// Raw selector text as written, nesting markers included.
        selector: String,
    },
    AtRule {
        /// Name without the `@`.
        name: String,
        /// Raw prelude text, trimmed.
        params: String,
    },
    Declaration {
        property: String,
        value: String,
    },
    Comment {
        /// Comment body with markers stripped, trimmed.
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    line: u32,
}

/// A parsed stylesheet: one root node plus everything under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    nodes: Vec<Node>,
}

impl Stylesheet {
    /// An empty sheet holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                line: 1,
            }],
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node under `parent`, returning its id.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, line: u32) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            line,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    #[must_use]
    pub fn line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].line
    }

    /// Total node count, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // The root node always exists.
        self.nodes.len() <= 1
    }

    /// Raw selector text when `id` is a rule.
    #[must_use]
    pub fn selector_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Rule { selector } => Some(selector.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_rule(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Rule { .. })
    }

    /// Ancestors of `id`, nearest first, root included.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// All node ids in document order (preorder).
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
    }

    /// `id` and everything under it, in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            sheet: self,
            stack: vec![id],
        }
    }

    /// Every rule node in document order.
    pub fn rules(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|&id| self.is_rule(id))
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Preorder traversal over a subtree.
pub struct Descendants<'a> {
    sheet: &'a Stylesheet,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.sheet.children(id).iter().rev().copied());
        Some(id)
    }
}
