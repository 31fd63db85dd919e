// src/core/node.rs

use crate::{
    arguments::Argument,
    constants::ROOT_NODE_NAME,
    core::{context::ContextBuilder, reader::TokenReader, walker::DispatchError},
    models::{DispatchContext, MessageEvent},
};
use std::{fmt, sync::Arc};

/// A predicate gating whether a node may be attempted at all, evaluated
/// against the ambient invocation context (e.g. a permission check). Pure
/// and cheap: it may run once per sibling per dispatch.
pub type Requirement = Arc<dyn Fn(&MessageEvent) -> Result<(), String> + Send + Sync>;

/// The callback executed once a full path through the grammar tree is
/// resolved. The one piece of user code the engine runs after a walk.
pub type TerminalAction = Arc<dyn Fn(DispatchContext) -> anyhow::Result<()> + Send + Sync>;

/// The three matchable node kinds. The set is closed on purpose: the walker
/// matches exhaustively, so a new kind is a compile-time-checked addition.
#[derive(Clone)]
pub enum NodeKind {
    /// The entry point of one command's grammar. Carries no name and
    /// consumes no tokens.
    Root,
    /// Matches one token case-insensitively equal to its name (used for
    /// sub-commands).
    Literal { name: String },
    /// Delegates to an argument contract, which consumes one or more
    /// tokens. Carries a display name/description pair for diagnostics.
    Typed {
        name: String,
        description: String,
        argument: Arc<dyn Argument>,
    },
}

impl NodeKind {
    /// Sort rank applied by the builder's freeze pass: typed siblings are
    /// grouped before literal siblings; registration order is preserved
    /// within a rank (the sort is stable).
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Typed { .. } => 0,
            Self::Literal { .. } => 1,
        }
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "Root"),
            Self::Literal { name } => write!(f, "Literal({})", name),
            Self::Typed { name, .. } => write!(f, "Typed({})", name),
        }
    }
}

/// One immutable unit of a command grammar: a matcher, a requirement, an
/// optional terminal action, and ordered child nodes.
///
/// Built once at registration time by
/// [`NodeBuilder::freeze`](crate::core::builder::NodeBuilder), then shared
/// read-only across concurrent dispatches.
#[derive(Clone)]
pub struct GrammarNode {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<GrammarNode>,
    pub(crate) requirement: Option<Requirement>,
    pub(crate) action: Option<TerminalAction>,
}

impl GrammarNode {
    /// The node's display name, used in error attribution.
    pub fn display_name(&self) -> &str {
        match &self.kind {
            NodeKind::Root => ROOT_NODE_NAME,
            NodeKind::Literal { name } => name,
            NodeKind::Typed { name, .. } => name,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    pub fn children(&self) -> &[GrammarNode] {
        &self.children
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Display names of the children, in attempt order. Reported by
    /// `IncompleteCommand` as the still-possible continuations.
    pub(crate) fn child_names(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|c| c.display_name().to_string())
            .collect()
    }

    /// Evaluates this node's requirement against the ambient context.
    /// Nodes without a requirement always pass.
    pub(crate) fn check_requirement(&self, event: &MessageEvent) -> Result<(), String> {
        match &self.requirement {
            Some(req) => req(event),
            None => Ok(()),
        }
    }

    /// Attempts to match this node against the reader.
    ///
    /// A `Root` consumes nothing. A `Literal` consumes exactly one token. A
    /// `Typed` node delegates to its contract, which may consume several;
    /// on success the parsed value is appended to the context builder. The
    /// reader may be left partially advanced on failure; the caller rewinds.
    pub(crate) fn try_match(
        &self,
        ctx: &mut ContextBuilder,
        reader: &mut TokenReader,
    ) -> Result<(), DispatchError> {
        match &self.kind {
            NodeKind::Root => Ok(()),
            NodeKind::Literal { name } => {
                let position = reader.position() + 1;
                let token = reader
                    .next()
                    .map_err(|_| DispatchError::Exhausted { position })?;
                if token.eq_ignore_ascii_case(name) {
                    Ok(())
                } else {
                    Err(DispatchError::UnexpectedLiteral {
                        found: token.to_string(),
                        expected: name.clone(),
                        position,
                    })
                }
            }
            NodeKind::Typed { name, argument, .. } => {
                let position = reader.position() + 1;
                match argument.parse(reader) {
                    Ok(value) => {
                        ctx.push_arg(value);
                        Ok(())
                    }
                    Err(err) if err.is_fatal() => {
                        Err(DispatchError::Unexpected(err.to_string()))
                    }
                    Err(err) => Err(DispatchError::Argument {
                        name: name.clone(),
                        message: err.to_string(),
                        position,
                    }),
                }
            }
        }
    }
}

impl fmt::Debug for GrammarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarNode")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .field("has_requirement", &self.requirement.is_some())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
