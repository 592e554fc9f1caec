//! Invocation types shared by both dispatch styles.
//!
//! The dispatcher receives already-deserialized invocation objects; wire
//! decoding is the host's problem. A structured invocation names its
//! subcommand (and optionally a group) as discrete fields, while a free-text
//! invocation carries a body whose first token selects the subcommand.

use std::collections::HashMap;
use std::fmt;

/// A structured invocation: the subcommand and group names arrive as
/// discrete fields rather than being parsed from free text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatInputInvocation {
    /// Top-level command name as received from the host.
    pub command: String,
    /// Declared subcommand name, if any.
    pub subcommand: Option<String>,
    /// Declared subcommand group name, if any.
    pub subcommand_group: Option<String>,
}

impl ChatInputInvocation {
    /// Create an invocation of the named top-level command with no
    /// subcommand selected.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            subcommand: None,
            subcommand_group: None,
        }
    }

    /// Set the declared subcommand name.
    pub fn with_subcommand(mut self, name: impl Into<String>) -> Self {
        self.subcommand = Some(name.into());
        self
    }

    /// Set the declared subcommand group name.
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.subcommand_group = Some(name.into());
        self
    }
}

/// A free-text invocation. The body is tokenized by an
/// [`ArgumentCursor`](crate::args::ArgumentCursor), never by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageInvocation {
    /// Top-level command name that routed the message here.
    pub command: String,
    /// Message body after the top-level command, untouched.
    pub content: String,
}

impl MessageInvocation {
    /// Create a free-text invocation of the named command.
    pub fn new(command: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            content: content.into(),
        }
    }
}

/// Borrowed either-style view of an invocation, as carried by event
/// payloads and precondition checks.
#[derive(Debug, Clone, Copy)]
pub enum InvocationRef<'a> {
    /// A structured invocation.
    ChatInput(&'a ChatInputInvocation),
    /// A free-text invocation.
    Message(&'a MessageInvocation),
}

impl InvocationRef<'_> {
    /// The style of the underlying invocation.
    pub fn style(&self) -> InvocationStyle {
        match self {
            Self::ChatInput(_) => InvocationStyle::ChatInput,
            Self::Message(_) => InvocationStyle::Message,
        }
    }

    /// Top-level command name of the underlying invocation.
    pub fn command(&self) -> &str {
        match self {
            Self::ChatInput(i) => &i.command,
            Self::Message(m) => &m.command,
        }
    }
}

/// The two invocation styles a dispatcher accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationStyle {
    /// Structured (slash-command style) invocation.
    ChatInput,
    /// Free-text (message) invocation.
    Message,
}

impl InvocationStyle {
    /// Stable lowercase label, used in event names and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatInput => "chat_input",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for InvocationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dispatch context supplied by the host.
///
/// Created fresh for every dispatch and never shared across concurrent
/// dispatches; the dispatcher only threads it through to handlers,
/// preconditions, and event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationContext {
    /// Name of the owning top-level command.
    pub command_name: String,
    /// Free-form host data (invocation prefix, shard id, and the like).
    pub data: HashMap<String, String>,
}

impl InvocationContext {
    /// Context for the named owning command with no extra host data.
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            data: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_ref_style_and_command() {
        let chat = ChatInputInvocation::new("config").with_subcommand("get");
        let msg = MessageInvocation::new("tag", "add foo bar");

        let chat_ref = InvocationRef::ChatInput(&chat);
        assert_eq!(chat_ref.style(), InvocationStyle::ChatInput);
        assert_eq!(chat_ref.command(), "config");

        let msg_ref = InvocationRef::Message(&msg);
        assert_eq!(msg_ref.style(), InvocationStyle::Message);
        assert_eq!(msg_ref.command(), "tag");
    }

    #[test]
    fn test_style_labels_are_stable() {
        assert_eq!(InvocationStyle::ChatInput.as_str(), "chat_input");
        assert_eq!(InvocationStyle::Message.as_str(), "message");
    }
}
