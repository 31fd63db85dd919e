// src/core/walker.rs

//! # Tree Walker
//!
//! The core dispatch algorithm: a recursive-descent matcher over the frozen
//! grammar tree, with single-step backtracking at each tree level and
//! explicit, user-facing error attribution.
//!
//! At every level the walker tries the siblings in their frozen order. A
//! failed match rewinds the reader to the per-attempt mark so the next
//! sibling sees the same unconsumed input; a successful match commits — the
//! walker never backtracks across an already-completed ancestor level. The
//! first sibling whose requirement and match both succeed wins; there is no
//! "most specific match" heuristic beyond that order.

use crate::core::{context::ContextBuilder, node::GrammarNode, reader::TokenReader};
use thiserror::Error;

/// Every way a walk can halt without resolving a terminal action.
///
/// All variants carry enough structured data (node name, 1-based token
/// position, expected continuations) for the feedback sink to render a
/// precise, position-anchored message without string-parsing the error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The reader had no more tokens when one was required.
    #[error("expected another argument at position {position}, but the message ended")]
    Exhausted { position: usize },

    /// A literal node's token did not match its name.
    #[error("expected '{expected}' but found '{found}' (argument {position})")]
    UnexpectedLiteral {
        found: String,
        expected: String,
        position: usize,
    },

    /// An argument contract rejected its input.
    #[error("invalid value for '{name}': {message} (argument {position})")]
    Argument {
        name: String,
        message: String,
        position: usize,
    },

    /// No viable sibling passed its requirement predicate.
    #[error("you cannot use this command here: {reason}")]
    RequirementFailed { reason: String },

    /// A node had children but input ran out and no terminal action exists
    /// at this depth. `expected` lists the still-possible next nodes.
    #[error("incomplete command: expected one of [{}] (argument {position})", .expected.join(", "))]
    IncompleteCommand {
        expected: Vec<String>,
        position: usize,
    },

    /// The command requires arguments but none were supplied at all.
    #[error("this command requires arguments")]
    NoArguments,

    /// Anything not classified above. Always halts the walk; never retried
    /// against siblings.
    #[error("unexpected error during dispatch: {0}")]
    Unexpected(String),
}

impl DispatchError {
    /// True for the variant that aborts the walk outright instead of
    /// driving sibling backtracking.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unexpected(_))
    }
}

/// Runs one full walk of `root` against the reader, mutating the context
/// builder into exactly one of {terminal action, error}.
pub fn walk(root: &GrammarNode, ctx: &mut ContextBuilder, reader: &mut TokenReader) {
    let outcome = walk_root(root, ctx, reader);
    if let Err(error) = outcome {
        log::debug!("Walk halted: {}", error);
        ctx.fail(error);
    }
}

fn walk_root(
    root: &GrammarNode,
    ctx: &mut ContextBuilder,
    reader: &mut TokenReader,
) -> Result<(), DispatchError> {
    root.check_requirement(ctx.event())
        .map_err(|reason| DispatchError::RequirementFailed { reason })?;
    descend(root, ctx, reader)
}

/// Continues the walk below a node that has already matched: either installs
/// its terminal action or recurses into its children.
fn descend(
    node: &GrammarNode,
    ctx: &mut ContextBuilder,
    reader: &mut TokenReader,
) -> Result<(), DispatchError> {
    if node.children.is_empty() {
        return match &node.action {
            Some(action) => {
                ctx.set_action(action.clone());
                Ok(())
            }
            // A leaf without an action is a registration mistake; surface
            // it as an incomplete command at the current position.
            None => Err(DispatchError::IncompleteCommand {
                expected: Vec::new(),
                position: reader.position() + 1,
            }),
        };
    }

    // Children exist but no input remains. Do not recurse into a child
    // that cannot possibly match: the node's own action (if any) completes
    // the command, otherwise the walk halts here.
    if !reader.has_next() {
        return match &node.action {
            Some(action) => {
                ctx.set_action(action.clone());
                Ok(())
            }
            None if node.is_root() => Err(DispatchError::NoArguments),
            None => Err(DispatchError::IncompleteCommand {
                expected: node.child_names(),
                position: reader.position() + 1,
            }),
        };
    }

    walk_children(node, ctx, reader)
}

/// Tries the children of `parent` in frozen order against the same token
/// position, rewinding between attempts.
fn walk_children(
    parent: &GrammarNode,
    ctx: &mut ContextBuilder,
    reader: &mut TokenReader,
) -> Result<(), DispatchError> {
    let mut last_error: Option<DispatchError> = None;

    for child in parent.children() {
        if let Err(reason) = child.check_requirement(ctx.event()) {
            log::trace!(
                "Sibling '{}' skipped, requirement not met: {}",
                child.display_name(),
                reason
            );
            last_error = Some(DispatchError::RequirementFailed { reason });
            continue;
        }

        let mark = reader.mark();
        match child.try_match(ctx, reader) {
            // The match committed; deeper failures do not reopen this level.
            Ok(()) => return descend(child, ctx, reader),
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                // Undo any partial token consumption so the next sibling
                // sees the same unconsumed input.
                reader.rewind(mark);
                log::trace!("Sibling '{}' failed: {}", child.display_name(), error);
                last_error = Some(error);
            }
        }
    }

    // Every sibling failed at the same position. If nothing remains to be
    // read and this level already completes a command, the failed optional
    // tail is not fatal.
    if !reader.has_next()
        && let Some(action) = &parent.action
    {
        ctx.set_action(action.clone());
        return Ok(());
    }

    Err(last_error.unwrap_or_else(|| DispatchError::IncompleteCommand {
        expected: parent.child_names(),
        position: reader.position() + 1,
    }))
}
