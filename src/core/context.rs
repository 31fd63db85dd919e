// src/core/context.rs

use crate::{
    core::{node::TerminalAction, walker::DispatchError},
    models::{ArgValue, DispatchContext, MessageEvent},
};
use std::fmt;

/// What a finished walk resolved to: exactly one of a runnable terminal
/// action or a typed, positioned error.
pub enum Resolution {
    /// The walk reached a terminal node. The action is ready to invoke with
    /// the finished context.
    Action {
        action: TerminalAction,
        context: DispatchContext,
    },
    /// The walk halted with an error. The event is handed back so the
    /// caller can report against it.
    Error {
        event: MessageEvent,
        error: DispatchError,
    },
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action { context, .. } => {
                f.debug_struct("Action").field("context", context).finish()
            }
            Self::Error { error, .. } => f.debug_struct("Error").field("error", error).finish(),
        }
    }
}

/// Per-invocation accumulator mutated by the tree walker: parsed argument
/// values in traversal order, the resolved terminal action, and any raised
/// error.
///
/// Invariant: when the walk halts, at most one of {action, error} is set.
/// The walker guarantees this; [`finish`](Self::finish) prefers the error
/// if it is ever violated.
pub struct ContextBuilder {
    event: MessageEvent,
    args: Vec<ArgValue>,
    action: Option<TerminalAction>,
    error: Option<DispatchError>,
}

impl ContextBuilder {
    /// Creates a fresh builder for one incoming message.
    pub fn new(event: MessageEvent) -> Self {
        Self {
            event,
            args: Vec::new(),
            action: None,
            error: None,
        }
    }

    /// The ambient invocation data, for requirement evaluation.
    pub fn event(&self) -> &MessageEvent {
        &self.event
    }

    /// Appends a parsed value. Insertion order is grammar traversal order.
    pub(crate) fn push_arg(&mut self, value: ArgValue) {
        self.args.push(value);
    }

    /// Installs the terminal action of the resolved path.
    pub(crate) fn set_action(&mut self, action: TerminalAction) {
        debug_assert!(self.error.is_none(), "action set after an error was raised");
        self.action = Some(action);
    }

    /// Records the error the walk halted with.
    pub(crate) fn fail(&mut self, error: DispatchError) {
        debug_assert!(self.action.is_none(), "error raised after an action was set");
        self.error = Some(error);
    }

    /// Number of values parsed so far (used by tests and diagnostics).
    pub fn parsed_len(&self) -> usize {
        self.args.len()
    }

    /// Consumes the builder into its final resolution.
    ///
    /// A walk always sets one of the two; a builder finished without either
    /// is a bug in the walker and surfaces as `Unexpected`.
    pub fn finish(self) -> Resolution {
        if let Some(error) = self.error {
            return Resolution::Error {
                event: self.event,
                error,
            };
        }
        match self.action {
            Some(action) => Resolution::Action {
                action,
                context: DispatchContext::new(self.event, self.args),
            },
            None => Resolution::Error {
                event: self.event,
                error: DispatchError::Unexpected(
                    "walk finished without resolving to an action or an error".to_string(),
                ),
            },
        }
    }
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("event", &self.event)
            .field("args", &self.args)
            .field("has_action", &self.action.is_some())
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_finish_prefers_recorded_error() {
        let mut builder = ContextBuilder::new(MessageEvent::default());
        builder.fail(DispatchError::NoArguments);
        match builder.finish() {
            Resolution::Error { error, .. } => {
                assert!(matches!(error, DispatchError::NoArguments));
            }
            Resolution::Action { .. } => panic!("expected an error resolution"),
        }
    }

    #[test]
    fn test_finish_with_action_yields_context() {
        let mut builder = ContextBuilder::new(MessageEvent::default());
        builder.push_arg(ArgValue::Int(42));
        builder.set_action(Arc::new(|_ctx| Ok(())));
        match builder.finish() {
            Resolution::Action { context, .. } => {
                assert_eq!(context.arg(0), Some(&ArgValue::Int(42)));
                assert_eq!(context.args().len(), 1);
            }
            Resolution::Error { .. } => panic!("expected an action resolution"),
        }
    }

    #[test]
    fn test_finish_without_resolution_is_unexpected() {
        let builder = ContextBuilder::new(MessageEvent::default());
        match builder.finish() {
            Resolution::Error { error, .. } => {
                assert!(matches!(error, DispatchError::Unexpected(_)));
            }
            Resolution::Action { .. } => panic!("expected an error resolution"),
        }
    }
}
