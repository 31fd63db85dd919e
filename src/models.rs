// src/models.rs

use std::fmt;

// --- AMBIENT INVOCATION CONTEXT ---

/// Everything the engine knows about the message being dispatched, beyond its
/// tokens: who sent it, where, and with which roles. Requirement predicates
/// are evaluated against this; terminal actions receive it inside the
/// finished [`DispatchContext`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEvent {
    /// Platform identifier of the message author.
    pub author_id: u64,
    /// Channel the message was posted in.
    pub channel_id: u64,
    /// Guild/server, if the message was not a direct message.
    pub guild_id: Option<u64>,
    /// Role names held by the author, used by requirement predicates.
    pub roles: Vec<String>,
    /// The raw message text, before tokenization.
    pub content: String,
}

impl MessageEvent {
    /// Convenience constructor for a plain message with no ambient metadata.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// True if the author carries the given role (case-sensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// --- PARSED ARGUMENT VALUES ---

/// A parsed argument value. The set is closed: every argument contract
/// produces one of these, and terminal actions match on them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Channel(u64),
    User(u64),
    Role(u64),
}

impl ArgValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<u64> {
        match self {
            Self::Channel(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<u64> {
        match self {
            Self::User(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<u64> {
        match self {
            Self::Role(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{}", v),
            Self::Channel(v) => write!(f, "#{}", v),
            Self::User(v) => write!(f, "@{}", v),
            Self::Role(v) => write!(f, "@&{}", v),
        }
    }
}

// --- FINISHED DISPATCH CONTEXT ---

/// The finished, immutable result of a successful walk: the ambient event
/// plus every parsed argument value in grammar-traversal order. This is what
/// a terminal action receives.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// The ambient invocation data.
    pub event: MessageEvent,
    /// Parsed values, indexed by their position in the grammar traversal.
    args: Vec<ArgValue>,
}

impl DispatchContext {
    pub(crate) fn new(event: MessageEvent, args: Vec<ArgValue>) -> Self {
        Self { event, args }
    }

    /// The parsed value at the given traversal index, if present.
    pub fn arg(&self, index: usize) -> Option<&ArgValue> {
        self.args.get(index)
    }

    /// All parsed values, in grammar-traversal order.
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }
}
