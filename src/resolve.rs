//! Pure resolution of an invocation against a mapping table.
//!
//! Both styles share one rule: the first structurally matching definition
//! in declaration order wins. Free-text resolution additionally tracks a
//! default fallback and backtracks the cursor, so an unmatched token stays
//! available to the default handler as its first argument.

use crate::args::ArgumentCursor;
use crate::mapping::{ChatInputDefinition, Mapping, MappingTable, MessageDefinition};

/// Normalized selector of a structured invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Descriptor<'a> {
    /// Declared subcommand name, if any.
    pub subcommand: Option<&'a str>,
    /// Declared subcommand group name, if any.
    pub group: Option<&'a str>,
}

/// Resolve a structured invocation.
///
/// Pure and deterministic: the same table and descriptor always produce
/// the same definition. Matching is case-sensitive and exact.
pub fn chat_input<'t>(
    table: &'t MappingTable,
    descriptor: Descriptor<'_>,
) -> Option<&'t ChatInputDefinition> {
    match (descriptor.group, descriptor.subcommand) {
        // Ungrouped: first flat mapping containing the name wins.
        (None, Some(name)) => table.mappings().iter().find_map(|mapping| match mapping {
            Mapping::ChatInput(defs) => defs.iter().find(|d| d.name == name),
            _ => None,
        }),
        // Grouped: only the first mapping with a matching group name is
        // searched; a miss inside it is a miss for the whole table.
        (Some(group), name) => {
            let subcommands = table.mappings().iter().find_map(|mapping| match mapping {
                Mapping::ChatInputGroup {
                    group: group_name,
                    subcommands,
                } if group_name == group => Some(subcommands),
                _ => None,
            })?;
            let name = name?;
            subcommands.iter().find(|d| d.name == name)
        }
        // The invocation did not select any subcommand.
        (None, None) => None,
    }
}

/// Resolve a free-text invocation by its first unconsumed token.
///
/// The token is read speculatively. On a name match it stays consumed. On
/// a miss the cursor is restored to its pre-resolution position and the
/// tracked default definition (if any) is returned, with the cursor
/// unconsumed so the default handler sees the original token again. The
/// last default seen across mappings wins; validated tables have at most
/// one.
pub fn message<'t>(
    table: &'t MappingTable,
    args: &mut dyn ArgumentCursor,
) -> Option<&'t MessageDefinition> {
    args.save();
    let token = args.next_maybe();

    let mut default = None;
    for mapping in table.mappings() {
        let Mapping::Message(defs) = mapping else {
            continue;
        };
        if let Some(def) = defs.iter().find(|d| d.default) {
            default = Some(def);
        }
        if let Some(token) = token.as_deref() {
            if let Some(found) = defs.iter().find(|d| d.name == token) {
                return Some(found);
            }
        }
    }

    args.restore();
    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::TokenCursor;
    use crate::mapping::MessageDefinition;

    fn flat(names: &[&str]) -> Mapping {
        Mapping::ChatInput(
            names
                .iter()
                .map(|n| ChatInputDefinition::method(*n, "noop"))
                .collect(),
        )
    }

    fn group(name: &str, names: &[&str]) -> Mapping {
        Mapping::ChatInputGroup {
            group: name.into(),
            subcommands: names
                .iter()
                .map(|n| ChatInputDefinition::method(*n, "noop"))
                .collect(),
        }
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

    fn by_subcommand(name: &str) -> Descriptor<'_> {
        Descriptor {
            subcommand: Some(name),
            group: None,
        }
    }

    #[test]
    fn test_flat_match_by_name() {
        let table = MappingTable::new(vec![flat(&["ping", "add"])]);
        let found = chat_input(&table, by_subcommand("add")).unwrap();
        assert_eq!(found.name, "add");
    }

    #[test]
    fn test_first_mapping_wins_in_declaration_order() {
        let table = MappingTable::new(vec![flat(&["other"]), flat(&["add"]), flat(&["add"])]);
        // A linear scan is deterministic; re-resolving gives the same hit.
        let first = chat_input(&table, by_subcommand("add")).unwrap() as *const _;
        let second = chat_input(&table, by_subcommand("add")).unwrap() as *const _;
        assert_eq!(first, second);
        let Mapping::ChatInput(defs) = &table.mappings()[1] else {
            panic!("expected flat mapping");
        };
        assert_eq!(first, &defs[0] as *const _);
    }

    #[test]
    fn test_flat_match_is_case_sensitive() {
        let table = MappingTable::new(vec![flat(&["add"])]);
        assert!(chat_input(&table, by_subcommand("Add")).is_none());
    }

    #[test]
    fn test_grouped_match_requires_group_and_name() {
        let table = MappingTable::new(vec![flat(&["get"]), group("config", &["get", "set"])]);
        let descriptor = Descriptor {
            subcommand: Some("set"),
            group: Some("config"),
        };
        assert_eq!(chat_input(&table, descriptor).unwrap().name, "set");

        // Unknown group is a miss even when the name exists elsewhere.
        let descriptor = Descriptor {
            subcommand: Some("get"),
            group: Some("admin"),
        };
        assert!(chat_input(&table, descriptor).is_none());

        // Name missing inside the matched group is a miss.
        let descriptor = Descriptor {
            subcommand: Some("drop"),
            group: Some("config"),
        };
        assert!(chat_input(&table, descriptor).is_none());
    }

    #[test]
    fn test_no_selector_is_no_match() {
        let table = MappingTable::new(vec![flat(&["add"])]);
        assert!(chat_input(&table, Descriptor::default()).is_none());
    }

    #[test]
    fn test_message_match_consumes_token() {
        let table = MappingTable::new(vec![msg(&["add", "list"], None)]);
        let mut cursor = TokenCursor::new("add foo");
        let found = message(&table, &mut cursor).unwrap();
        assert_eq!(found.name, "add");
        // The matched token stays consumed; the handler reads its args next.
        assert_eq!(cursor.next_maybe().as_deref(), Some("foo"));
    }

    #[test]
    fn test_message_default_leaves_cursor_unconsumed() {
        let table = MappingTable::new(vec![msg(&["add", "list"], Some("list"))]);
        let mut cursor = TokenCursor::new("bogus foo");
        let found = message(&table, &mut cursor).unwrap();
        assert_eq!(found.name, "list");
        // The default handler reinterprets the unmatched token.
        assert_eq!(cursor.next_maybe().as_deref(), Some("bogus"));
    }

    #[test]
    fn test_message_no_match_no_default_restores_cursor() {
        let table = MappingTable::new(vec![msg(&["add"], None)]);
        let mut cursor = TokenCursor::new("bogus foo");
        assert!(message(&table, &mut cursor).is_none());
        assert_eq!(cursor.next_maybe().as_deref(), Some("bogus"));
    }

    #[test]
    fn test_message_empty_input_falls_to_default() {
        let table = MappingTable::new(vec![msg(&["add", "list"], Some("list"))]);
        let mut cursor = TokenCursor::new("");
        assert_eq!(message(&table, &mut cursor).unwrap().name, "list");

        let table = MappingTable::new(vec![msg(&["add"], None)]);
        let mut cursor = TokenCursor::new("");
        assert!(message(&table, &mut cursor).is_none());
    }

    #[test]
    fn test_every_definition_resolves_to_itself() {
        // Round-trip: each definition is reachable under its own name.
        let table = MappingTable::new(vec![
            flat(&["ping", "add"]),
            group("config", &["get", "set"]),
            msg(&["tag", "untag"], None),
        ]);

        for mapping in table.mappings() {
            match mapping {
                Mapping::ChatInput(defs) => {
                    for def in defs {
                        let hit = chat_input(&table, by_subcommand(&def.name)).unwrap();
                        assert_eq!(hit.name, def.name);
                    }
                }
                Mapping::ChatInputGroup { group, subcommands } => {
                    for def in subcommands {
                        let descriptor = Descriptor {
                            subcommand: Some(&def.name),
                            group: Some(group),
                        };
                        let hit = chat_input(&table, descriptor).unwrap();
                        assert_eq!(hit.name, def.name);
                    }
                }
                Mapping::Message(defs) => {
                    for def in defs {
                        let mut cursor = TokenCursor::new(&def.name);
                        let hit = message(&table, &mut cursor).unwrap();
                        assert_eq!(hit.name, def.name);
                    }
                }
            }
        }
    }
}
