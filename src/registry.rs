//! Command registry abstraction and an in-memory implementation.
//!
//! `Command` targets delegate to an independently registered command
//! looked up by name. The registry is injected by the host;
//! [`MemoryRegistry`] is the bundled concurrent implementation, suitable
//! for tests and simple hosts.

use std::sync::Arc;

use dashmap::DashMap;

use crate::handler::{ChatInputHandler, MessageHandler};
use crate::precondition::PreconditionRunner;

/// An externally registered command a subcommand may delegate to.
///
/// Run capabilities are optional per invocation style; a delegation to a
/// command lacking the required capability fails with `TargetNotFound`.
pub trait RegisteredCommand: Send + Sync {
    /// Canonical command name.
    fn name(&self) -> &str;

    /// This command's own preconditions, if it declares any.
    fn preconditions(&self) -> Option<&dyn PreconditionRunner> {
        None
    }

    /// Chat-input run capability, if the command supports that style.
    fn as_chat_input(&self) -> Option<&dyn ChatInputHandler> {
        None
    }

    /// Message run capability, if the command supports that style.
    fn as_message(&self) -> Option<&dyn MessageHandler> {
        None
    }
}

/// Name-indexed store of registered commands.
pub trait CommandRegistry: Send + Sync {
    /// Look up a command by exact name.
    fn get(&self, name: &str) -> Option<Arc<dyn RegisteredCommand>>;
}

/// Concurrent in-memory [`CommandRegistry`].
#[derive(Default)]
pub struct MemoryRegistry {
    commands: DashMap<String, Arc<dyn RegisteredCommand>>,
}

impl MemoryRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its canonical name, replacing any previous
    /// entry with that name.
    pub fn insert(&self, command: Arc<dyn RegisteredCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandRegistry for MemoryRegistry {
    fn get(&self, name: &str) -> Option<Arc<dyn RegisteredCommand>> {
        self.commands.get(name).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare(&'static str);

    impl RegisteredCommand for Bare {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_insert_and_get_by_exact_name() {
        let registry = MemoryRegistry::new();
        registry.insert(Arc::new(Bare("config-get")));

        assert!(registry.get("config-get").is_some());
        assert!(registry.get("Config-Get").is_none());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let registry = MemoryRegistry::new();
        registry.insert(Arc::new(Bare("dup")));
        registry.insert(Arc::new(Bare("dup")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capabilities_default_to_absent() {
        let command = Bare("bare");
        assert!(command.as_chat_input().is_none());
        assert!(command.as_message().is_none());
        assert!(command.preconditions().is_none());
    }
}
