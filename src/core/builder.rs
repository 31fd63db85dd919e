// src/core/builder.rs

use crate::{
    arguments::Argument,
    core::node::{GrammarNode, NodeKind, Requirement, TerminalAction},
    models::{DispatchContext, MessageEvent},
};
use std::{fmt, sync::Arc};

/// Mutable construction facility for one grammar (sub)tree.
///
/// Registration is declarative: a builder supplies a literal or typed node,
/// zero or more child builders, and an optional terminal action. Adding a
/// child whose name is already present *merges* the two builders instead of
/// creating a duplicate sibling (see [`Self::add_child`]).
///
/// One explicit [`freeze`](Self::freeze) pass turns the accumulated state
/// into the immutable [`GrammarNode`] tree the walker consumes; the frozen
/// tree is never mutated again.
pub struct NodeBuilder {
    kind: NodeKind,
    children: Vec<NodeBuilder>,
    requirement: Option<Requirement>,
    action: Option<TerminalAction>,
}

impl NodeBuilder {
    /// The entry point of one command's grammar.
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    /// A sub-command node matching one token case-insensitively equal to
    /// `name`.
    pub fn literal(name: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Literal { name: name.into() })
    }

    /// A typed node delegating to an argument contract, with a display
    /// name/description pair for diagnostics.
    pub fn argument(
        name: impl Into<String>,
        description: impl Into<String>,
        argument: impl Argument + 'static,
    ) -> Self {
        Self::with_kind(NodeKind::Typed {
            name: name.into(),
            description: description.into(),
            argument: Arc::new(argument),
        })
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            requirement: None,
            action: None,
        }
    }

    /// Builder-style [`add_child`](Self::add_child).
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.add_child(child);
        self
    }

    /// Adds a child, merging it into an existing child of the same kind and
    /// (case-insensitive) name: the new builder's children are recursively
    /// merged in, and its terminal action and requirement, where set,
    /// overwrite the existing ones.
    pub fn add_child(&mut self, child: NodeBuilder) {
        match self.children.iter_mut().find(|c| c.same_slot(&child)) {
            Some(existing) => existing.merge_from(child),
            None => self.children.push(child),
        }
    }

    /// Gates this node behind a predicate over the ambient invocation
    /// context (e.g. a permission check).
    pub fn require(
        mut self,
        requirement: impl Fn(&MessageEvent) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.requirement = Some(Arc::new(requirement));
        self
    }

    /// Sets the terminal action invoked when a walk resolves at this node.
    pub fn executes(
        mut self,
        action: impl Fn(DispatchContext) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    /// Two builders occupy the same slot when they are the same kind-class
    /// and carry the same name, ignoring ASCII case (literal matching is
    /// case-insensitive, so differently-cased duplicates would be
    /// unreachable siblings).
    fn same_slot(&self, other: &NodeBuilder) -> bool {
        match (&self.kind, &other.kind) {
            (NodeKind::Root, NodeKind::Root) => true,
            (NodeKind::Literal { name: a }, NodeKind::Literal { name: b }) => {
                a.eq_ignore_ascii_case(b)
            }
            (NodeKind::Typed { name: a, .. }, NodeKind::Typed { name: b, .. }) => {
                a.eq_ignore_ascii_case(b)
            }
            _ => false,
        }
    }

    /// Folds `other` into this builder: children merge recursively, and the
    /// incoming action/requirement overwrite the existing ones when set.
    fn merge_from(&mut self, other: NodeBuilder) {
        if other.action.is_some() {
            self.action = other.action;
        }
        if other.requirement.is_some() {
            self.requirement = other.requirement;
        }
        for child in other.children {
            self.add_child(child);
        }
    }

    /// Produces the immutable tree.
    ///
    /// Sibling order is fixed here, once: a stable sort groups typed nodes
    /// before literal nodes, preserving registration order within each
    /// group. Given the same registrations, two dispatcher runs therefore
    /// always attempt children in the same order.
    pub fn freeze(self) -> GrammarNode {
        let mut children: Vec<NodeBuilder> = self.children;
        children.sort_by_key(|c| c.kind.rank());
        GrammarNode {
            kind: self.kind,
            children: children.into_iter().map(NodeBuilder::freeze).collect(),
            requirement: self.requirement,
            action: self.action,
        }
    }
}

impl fmt::Debug for NodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .field("has_requirement", &self.requirement.is_some())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
