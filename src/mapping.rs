//! Subcommand mapping tables.
//!
//! A [`MappingTable`] is built once at command-registration time and is
//! read-only afterwards; it is safely shared across every concurrent
//! dispatch of the owning command. Construction never fails.
//! [`MappingTable::validate`] is a separate pass that surfaces
//! configuration mistakes: duplicate names within a mapping, duplicate
//! group names, and more than one default message definition per table.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::handler::{ChatInputHandler, MessageHandler};

/// Dispatch target of a chat-input subcommand definition.
///
/// `Inline` and `Method` are local targets: the owning command's own
/// preconditions already ran upstream, so none run again. `Command`
/// delegates to an independently registered command and re-runs
/// preconditions before it.
#[derive(Clone)]
pub enum ChatInputTarget {
    /// Callable registered inline with the definition.
    Inline(Arc<dyn ChatInputHandler>),
    /// Named callable resolved from the owning dispatcher's method table.
    Method(&'static str),
    /// Delegate to an externally registered command.
    Command(String),
}

/// Dispatch target of a message subcommand definition.
#[derive(Clone)]
pub enum MessageTarget {
    /// Callable registered inline with the definition.
    Inline(Arc<dyn MessageHandler>),
    /// Named callable resolved from the owning dispatcher's method table.
    Method(&'static str),
    /// Delegate to an externally registered command.
    Command(String),
}

impl fmt::Debug for ChatInputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Command(name) => f.debug_tuple("Command").field(name).finish(),
        }
    }
}

impl fmt::Debug for MessageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Command(name) => f.debug_tuple("Command").field(name).finish(),
        }
    }
}

/// One chat-input subcommand definition.
#[derive(Debug, Clone)]
pub struct ChatInputDefinition {
    /// Name matched case-sensitively against the declared subcommand.
    pub name: String,
    /// Where a matching invocation is routed.
    pub target: ChatInputTarget,
}

impl ChatInputDefinition {
    /// Definition with an explicit target.
    pub fn new(name: impl Into<String>, target: ChatInputTarget) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Definition backed by an inline handler.
    pub fn inline(name: impl Into<String>, handler: impl ChatInputHandler + 'static) -> Self {
        Self::new(name, ChatInputTarget::Inline(Arc::new(handler)))
    }

    /// Definition routed to a named entry in the dispatcher's method table.
    pub fn method(name: impl Into<String>, method: &'static str) -> Self {
        Self::new(name, ChatInputTarget::Method(method))
    }

    /// Definition delegating to an externally registered command.
    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(name, ChatInputTarget::Command(command.into()))
    }
}

/// One message (free-text) subcommand definition.
#[derive(Debug, Clone)]
pub struct MessageDefinition {
    /// Name matched case-sensitively against the first unconsumed token.
    pub name: String,
    /// Where a matching invocation is routed.
    pub target: MessageTarget,
    /// Fallback used when no token matches. At most one definition per
    /// table may set this; [`MappingTable::validate`] rejects duplicates.
    pub default: bool,
}

impl MessageDefinition {
    /// Definition with an explicit target.
    pub fn new(name: impl Into<String>, target: MessageTarget) -> Self {
        Self {
            name: name.into(),
            target,
            default: false,
        }
    }

    /// Definition backed by an inline handler.
    pub fn inline(name: impl Into<String>, handler: impl MessageHandler + 'static) -> Self {
        Self::new(name, MessageTarget::Inline(Arc::new(handler)))
    }

    /// Definition routed to a named entry in the dispatcher's method table.
    pub fn method(name: impl Into<String>, method: &'static str) -> Self {
        Self::new(name, MessageTarget::Method(method))
    }

    /// Definition delegating to an externally registered command.
    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(name, MessageTarget::Command(command.into()))
    }

    /// Mark this definition as the table's default fallback.
    pub fn fallback(mut self) -> Self {
        self.default = true;
        self
    }
}

/// One entry of a mapping table, in declaration order.
#[derive(Debug, Clone)]
pub enum Mapping {
    /// Flat chat-input subcommands (no group).
    ChatInput(Vec<ChatInputDefinition>),
    /// Grouped chat-input subcommands (`/config mod-roles add role`).
    ChatInputGroup {
        /// Group name matched against the declared subcommand group.
        group: String,
        /// Definitions inside this group.
        subcommands: Vec<ChatInputDefinition>,
    },
    /// Flat message (free-text) subcommands.
    Message(Vec<MessageDefinition>),
}

/// Ordered, immutable set of subcommand mappings for one command.
///
/// Lookup is a linear scan; tables are small and declaration order is
/// significant for deterministic resolution.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    mappings: Vec<Mapping>,
}

impl MappingTable {
    /// Build a table from mappings in declaration order.
    ///
    /// Never fails; run [`MappingTable::validate`] to surface configuration
    /// mistakes before dispatching.
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    /// Mappings in declaration order.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Whether the table holds no mappings at all. An empty table is legal;
    /// every resolution over it yields no match.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Reject duplicate subcommand names within a mapping, duplicate group
    /// names across the table, and more than one default message
    /// definition per table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut groups = HashSet::new();
        let mut default: Option<&str> = None;

        for mapping in &self.mappings {
            match mapping {
                Mapping::ChatInput(defs) => {
                    check_unique(defs.iter().map(|d| d.name.as_str()))?;
                }
                Mapping::ChatInputGroup { group, subcommands } => {
                    if !groups.insert(group.as_str()) {
                        return Err(ConfigError::DuplicateGroup(group.clone()));
                    }
                    check_unique(subcommands.iter().map(|d| d.name.as_str()))?;
                }
                Mapping::Message(defs) => {
                    check_unique(defs.iter().map(|d| d.name.as_str()))?;
                    for def in defs.iter().filter(|d| d.default) {
                        match default {
                            None => default = Some(def.name.as_str()),
                            Some(first) => {
                                return Err(ConfigError::DuplicateDefault {
                                    first: first.to_string(),
                                    second: def.name.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateSubcommand {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(names: &[&str]) -> Mapping {
        Mapping::ChatInput(
            names
                .iter()
                .map(|n| ChatInputDefinition::method(*n, "noop"))
                .collect(),
        )
    }

    fn msg(names: &[&str], default: Option<&str>) -> Mapping {
        Mapping::Message(
            names
                .iter()
                .map(|n| {
                    let def = MessageDefinition::method(*n, "noop");
                    if default == Some(*n) { def.fallback() } else { def }
                })
                .collect(),
        )
    }

    #[test]
    fn test_validate_accepts_well_formed_table() {
        let table = MappingTable::new(vec![
            chat(&["add", "remove"]),
            Mapping::ChatInputGroup {
                group: "config".into(),
                subcommands: vec![ChatInputDefinition::method("get", "noop")],
            },
            msg(&["add", "list"], Some("list")),
        ]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_name_within_mapping() {
        let table = MappingTable::new(vec![chat(&["add", "add"])]);
        assert_eq!(
            table.validate(),
            Err(ConfigError::DuplicateSubcommand { name: "add".into() })
        );
    }

    #[test]
    fn test_validate_allows_same_name_across_mappings() {
        // Duplicates across mappings resolve by declaration order; only
        // duplicates within one mapping are configuration errors.
        let table = MappingTable::new(vec![chat(&["add"]), chat(&["add"])]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_group() {
        let table = MappingTable::new(vec![
            Mapping::ChatInputGroup {
                group: "config".into(),
                subcommands: vec![ChatInputDefinition::method("get", "noop")],
            },
            Mapping::ChatInputGroup {
                group: "config".into(),
                subcommands: vec![ChatInputDefinition::method("set", "noop")],
            },
        ]);
        assert_eq!(
            table.validate(),
            Err(ConfigError::DuplicateGroup("config".into()))
        );
    }

    #[test]
    fn test_validate_rejects_second_default_across_mappings() {
        let table = MappingTable::new(vec![
            msg(&["add"], Some("add")),
            msg(&["help"], Some("help")),
        ]);
        assert_eq!(
            table.validate(),
            Err(ConfigError::DuplicateDefault {
                first: "add".into(),
                second: "help".into(),
            })
        );
    }

    #[test]
    fn test_empty_table_is_legal() {
        let table = MappingTable::default();
        assert!(table.is_empty());
        assert!(table.validate().is_ok());
    }
}
