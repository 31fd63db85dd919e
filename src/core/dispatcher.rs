// src/core/dispatcher.rs

//! # Dispatch Entry Point
//!
//! Root-level orchestration for one incoming message: tokenize, strip the
//! prefix, look the command up in the alias table, run the tree walker, and
//! finally either execute the resolved terminal action or hand the typed
//! error to the feedback sink. This function never propagates an error to
//! its own caller.

use crate::{
    core::{
        context::{ContextBuilder, Resolution},
        registry::CommandRegistry,
        reader::TokenReader,
        walker::{self, DispatchError},
    },
    models::MessageEvent,
};

/// Receives every typed failure the dispatcher produces and is responsible
/// for rendering it to the end user. The engine only ever hands over the
/// structured value, never formatted text.
pub trait FeedbackSink: Send + Sync {
    fn report(&self, event: &MessageEvent, error: &DispatchError);
}

/// A sink that forwards failures to the `log` facade. Useful as a default
/// while embedding applications wire up their own rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn report(&self, event: &MessageEvent, error: &DispatchError) {
        log::warn!(
            "Dispatch failed for author {} in channel {}: {}",
            event.author_id,
            event.channel_id,
            error
        );
    }
}

/// Matches one incoming message against the registry.
///
/// Returns `true` iff the message named a registered command. Unrelated
/// messages (no prefix, unknown name, empty input) are routine, not errors:
/// they return `false` without touching the sink. Exactly one
/// [`TokenReader`] and one [`ContextBuilder`] are created per matched
/// message; a terminal action's own failure is reported to the sink as
/// [`DispatchError::Unexpected`].
pub fn dispatch(registry: &CommandRegistry, event: MessageEvent, sink: &dyn FeedbackSink) -> bool {
    let tokens: Vec<String> = event.content.split_whitespace().map(str::to_string).collect();
    let name: String = match tokens
        .first()
        .and_then(|first| first.strip_prefix(registry.prefix()))
    {
        Some(name) => name.to_string(),
        None => return false,
    };
    let Some(root) = registry.find(&name) else {
        log::trace!("No command registered under '{}'", name);
        return false;
    };

    log::debug!("Dispatching '{}' for author {}", name, event.author_id);

    let root = std::sync::Arc::clone(root);
    let mut reader = TokenReader::new(tokens);
    let mut ctx = ContextBuilder::new(event);
    walker::walk(&root, &mut ctx, &mut reader);

    match ctx.finish() {
        Resolution::Action { action, context } => {
            // Keep the event around: if the user code fails, the failure is
            // reported against the message that triggered it.
            let event = context.event.clone();
            if let Err(err) = action(context) {
                sink.report(&event, &DispatchError::Unexpected(err.to_string()));
            }
        }
        Resolution::Error { event, error } => {
            sink.report(&event, &error);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arguments::primitives::IntArg,
        core::builder::NodeBuilder,
        models::{ArgValue, MessageEvent},
    };
    use std::sync::{Arc, Mutex};

    /// A sink that stores every reported error for inspection.
    #[derive(Default)]
    struct CollectingSink {
        errors: Mutex<Vec<DispatchError>>,
    }

    impl FeedbackSink for CollectingSink {
        fn report(&self, _event: &MessageEvent, error: &DispatchError) {
            self.errors.lock().expect("sink lock").push(error.clone());
        }
    }

    fn sample_registry(seen: &Arc<Mutex<Vec<ArgValue>>>) -> CommandRegistry {
        let seen = Arc::clone(seen);
        CommandRegistry::builder()
            .command(
                ["count", "c"],
                NodeBuilder::root().child(
                    NodeBuilder::argument("n", "a number", IntArg::any()).executes(move |ctx| {
                        let value = ctx.arg(0).cloned().expect("argument parsed");
                        seen.lock().expect("seen lock").push(value);
                        Ok(())
                    }),
                ),
            )
            .freeze()
    }

    #[test]
    fn test_matched_command_executes_action() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = sample_registry(&seen);
        let sink = CollectingSink::default();

        let handled = dispatch(&registry, MessageEvent::from_content("!count 42"), &sink);

        assert!(handled);
        assert_eq!(*seen.lock().unwrap(), vec![ArgValue::Int(42)]);
        assert!(sink.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_alias_and_casing_resolve_to_same_command() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = sample_registry(&seen);
        let sink = CollectingSink::default();

        assert!(dispatch(&registry, MessageEvent::from_content("!C 7"), &sink));
        assert_eq!(*seen.lock().unwrap(), vec![ArgValue::Int(7)]);
    }

    #[test]
    fn test_unrelated_messages_are_ignored_silently() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = sample_registry(&seen);
        let sink = CollectingSink::default();

        assert!(!dispatch(&registry, MessageEvent::from_content("hello there"), &sink));
        assert!(!dispatch(&registry, MessageEvent::from_content("!unknown 1"), &sink));
        assert!(!dispatch(&registry, MessageEvent::from_content("   "), &sink));
        // Prefix must match exactly; a bare command name is not an invocation.
        assert!(!dispatch(&registry, MessageEvent::from_content("count 42"), &sink));

        assert!(seen.lock().unwrap().is_empty());
        assert!(sink.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_walk_failure_reaches_the_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = sample_registry(&seen);
        let sink = CollectingSink::default();

        let handled = dispatch(&registry, MessageEvent::from_content("!count abc"), &sink);

        assert!(handled);
        let errors = sink.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            DispatchError::Argument { position: 1, .. }
        ));
    }

    #[test]
    fn test_failing_action_is_reported_as_unexpected() {
        let registry = CommandRegistry::builder()
            .command(
                ["boom"],
                NodeBuilder::root().executes(|_| anyhow::bail!("user code exploded")),
            )
            .freeze();
        let sink = CollectingSink::default();

        assert!(dispatch(&registry, MessageEvent::from_content("!boom"), &sink));

        let errors = sink.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DispatchError::Unexpected(_)));
    }

    #[test]
    fn test_custom_prefix() {
        let registry = CommandRegistry::builder()
            .prefix("~")
            .command(["ping"], NodeBuilder::root().executes(|_| Ok(())))
            .freeze();
        let sink = CollectingSink::default();

        assert!(dispatch(&registry, MessageEvent::from_content("~ping"), &sink));
        assert!(!dispatch(&registry, MessageEvent::from_content("!ping"), &sink));
    }
}
