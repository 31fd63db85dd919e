pub mod builder;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod node;
pub mod reader;
pub mod registry;
pub mod walker;
