// src/constants.rs

/// The default prefix that marks a message as a command invocation.
pub const DEFAULT_PREFIX: &str = "!";

/// The default number of worker threads in the dispatch pool.
pub const DEFAULT_WORKERS: usize = 4;

/// The name of the engine configuration file.
pub const CONFIG_FILENAME: &str = "herald.toml";

/// Display name used for the root node in diagnostics.
pub const ROOT_NODE_NAME: &str = "<root>";
