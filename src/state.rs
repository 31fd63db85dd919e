// src/state.rs

use crate::core::{builder::NodeBuilder, registry::{CommandRegistry, RegistryBuilder}};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Commands can no longer be registered: the registry is frozen.")]
    AlreadyFrozen,
}

/// The lifecycle of the process-wide command registry.
///
/// Registration happens while `Building`; the first freeze produces the
/// immutable `Frozen` registry that every dispatch reads lock-free from
/// then on.
enum RegistryState {
    /// Commands are still being registered.
    Building(RegistryBuilder),
    /// The registry has been frozen; it is read-only for the rest of the
    /// process (or until an explicit reset rebuilds it).
    Frozen(Arc<CommandRegistry>),
}

static REGISTRY: OnceLock<Mutex<RegistryState>> = OnceLock::new();

fn state() -> &'static Mutex<RegistryState> {
    REGISTRY.get_or_init(|| Mutex::new(RegistryState::Building(RegistryBuilder::new())))
}

/// Registers one command grammar under the given aliases.
///
/// Safe to call from multiple threads; fails once the registry has been
/// frozen.
pub fn register<I, S>(aliases: I, grammar: NodeBuilder) -> Result<(), StateError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut guard = state().lock().expect("registry state lock poisoned");
    match &mut *guard {
        RegistryState::Building(builder) => {
            builder.register(aliases, grammar);
            Ok(())
        }
        RegistryState::Frozen(_) => Err(StateError::AlreadyFrozen),
    }
}

/// Sets the command prefix. Fails once the registry has been frozen.
pub fn set_prefix(prefix: impl Into<String>) -> Result<(), StateError> {
    let mut guard = state().lock().expect("registry state lock poisoned");
    match std::mem::replace(&mut *guard, RegistryState::Building(RegistryBuilder::new())) {
        RegistryState::Building(builder) => {
            *guard = RegistryState::Building(builder.prefix(prefix));
            Ok(())
        }
        frozen @ RegistryState::Frozen(_) => {
            *guard = frozen;
            Err(StateError::AlreadyFrozen)
        }
    }
}

/// Freezes the accumulated registrations into the shared, immutable
/// registry and returns it. Idempotent: repeated calls return the same
/// registry.
pub fn freeze() -> Arc<CommandRegistry> {
    let mut guard = state().lock().expect("registry state lock poisoned");
    match &*guard {
        RegistryState::Frozen(registry) => Arc::clone(registry),
        RegistryState::Building(_) => {
            let builder = match std::mem::replace(
                &mut *guard,
                RegistryState::Building(RegistryBuilder::new()),
            ) {
                RegistryState::Building(builder) => builder,
                RegistryState::Frozen(_) => unreachable!("state checked above"),
            };
            let registry = Arc::new(builder.freeze());
            *guard = RegistryState::Frozen(Arc::clone(&registry));
            registry
        }
    }
}

/// The frozen registry, if one exists yet.
pub fn current() -> Option<Arc<CommandRegistry>> {
    let guard = state().lock().expect("registry state lock poisoned");
    match &*guard {
        RegistryState::Frozen(registry) => Some(Arc::clone(registry)),
        RegistryState::Building(_) => None,
    }
}
