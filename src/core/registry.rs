// src/core/registry.rs

use crate::{
    constants::DEFAULT_PREFIX,
    core::{builder::NodeBuilder, node::GrammarNode},
};
use std::{collections::HashMap, fmt, sync::Arc};

/// Mutable accumulation of command registrations, frozen once into a
/// [`CommandRegistry`].
///
/// Each registration supplies a grammar builder plus one or more alias
/// strings; registering an alias that is already taken overwrites the
/// previous grammar (explicit re-registration rebuilds the tree).
pub struct RegistryBuilder {
    prefix: String,
    entries: Vec<(Vec<String>, NodeBuilder)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            entries: Vec::new(),
        }
    }

    /// Sets the prefix that marks a message as a command invocation.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Registers one command grammar under the given aliases.
    pub fn register<I, S>(&mut self, aliases: I, grammar: NodeBuilder) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        self.entries.push((aliases, grammar));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn command<I, S>(mut self, aliases: I, grammar: NodeBuilder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(aliases, grammar);
        self
    }

    /// Freezes every registered grammar and produces the immutable,
    /// share-everywhere registry.
    pub fn freeze(self) -> CommandRegistry {
        let mut commands: HashMap<String, Arc<GrammarNode>> = HashMap::new();
        for (aliases, grammar) in self.entries {
            let root = Arc::new(grammar.freeze());
            for alias in aliases {
                let key = alias.to_ascii_lowercase();
                if commands.insert(key, Arc::clone(&root)).is_some() {
                    log::warn!("Alias '{}' was re-registered; the previous grammar is replaced.", alias);
                }
            }
        }
        CommandRegistry {
            prefix: self.prefix,
            commands,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("prefix", &self.prefix)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// The flat alias table mapping command names to frozen grammar roots.
///
/// Immutable after construction and safe to share across worker threads
/// behind an `Arc`; lookups are lock-free.
pub struct CommandRegistry {
    prefix: String,
    commands: HashMap<String, Arc<GrammarNode>>,
}

impl CommandRegistry {
    /// Convenience entry to start a builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The configured command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Looks up the grammar root for a command name or alias,
    /// case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Arc<GrammarNode>> {
        self.commands.get(&name.to_ascii_lowercase())
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("prefix", &self.prefix)
            .field("aliases", &self.commands.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::NodeBuilder;

    #[test]
    fn test_lookup_is_case_insensitive_across_aliases() {
        let registry = CommandRegistry::builder()
            .command(["ping", "p"], NodeBuilder::root().executes(|_| Ok(())))
            .freeze();

        assert_eq!(registry.len(), 2);
        assert!(registry.find("PING").is_some());
        assert!(registry.find("P").is_some());
        assert!(registry.find("pong").is_none());
    }

    #[test]
    fn test_aliases_share_one_frozen_root() {
        let registry = CommandRegistry::builder()
            .command(["tree", "ls"], NodeBuilder::root().executes(|_| Ok(())))
            .freeze();

        let a = registry.find("tree").expect("tree registered");
        let b = registry.find("ls").expect("ls registered");
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_re_registration_replaces_previous_grammar() {
        let mut builder = CommandRegistry::builder();
        builder.register(["ping"], NodeBuilder::root());
        builder.register(
            ["ping"],
            NodeBuilder::root().child(NodeBuilder::literal("loud").executes(|_| Ok(()))),
        );
        let registry = builder.freeze();

        let root = registry.find("ping").expect("ping registered");
        assert_eq!(root.children().len(), 1);
    }
}
