//! Lifecycle events emitted around each dispatch.
//!
//! Event names and payload shapes are part of the public contract. The
//! dispatcher emits through the injected [`EventSink`]; hosts translate
//! onto their own bus. Emission is synchronous fire-and-forget: the only
//! suspension points in a dispatch are precondition checks and the handler
//! itself.

use crate::error::DispatchError;
use crate::handler::Effect;
use crate::invocation::{InvocationContext, InvocationRef, InvocationStyle};
use crate::precondition::Denial;

/// Lifecycle phase of a dispatch.
///
/// `Run` fires once per dispatch that resolves a definition; exactly one
/// of the other three follows as the terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Resolution succeeded; the handler is about to be invoked.
    Run,
    /// The handler completed; the payload carries its result.
    Success,
    /// A precondition rejected the invocation.
    Denied,
    /// Target resolution or the handler itself failed.
    Error,
}

impl Phase {
    /// Stable wire name of this phase for the given invocation style.
    pub fn event_name(self, style: InvocationStyle) -> &'static str {
        match (style, self) {
            (InvocationStyle::ChatInput, Self::Run) => "chat_input_subcommand_run",
            (InvocationStyle::ChatInput, Self::Success) => "chat_input_subcommand_success",
            (InvocationStyle::ChatInput, Self::Denied) => "chat_input_subcommand_denied",
            (InvocationStyle::ChatInput, Self::Error) => "chat_input_subcommand_error",
            (InvocationStyle::Message, Self::Run) => "message_subcommand_run",
            (InvocationStyle::Message, Self::Success) => "message_subcommand_success",
            (InvocationStyle::Message, Self::Denied) => "message_subcommand_denied",
            (InvocationStyle::Message, Self::Error) => "message_subcommand_error",
        }
    }
}

/// Borrowed, per-phase view of a dispatch's accumulated state.
///
/// Constructed fresh for every emit and never shared across concurrent
/// dispatches. Phase-specific fields are `None` outside their phase.
#[derive(Debug, Clone, Copy)]
pub struct EventPayload<'a> {
    /// Name of the owning command whose dispatcher emitted this event.
    pub command: &'a str,
    /// The raw invocation being dispatched.
    pub invocation: InvocationRef<'a>,
    /// Per-dispatch context.
    pub context: &'a InvocationContext,
    /// Name of the matched definition.
    pub subcommand: &'a str,
    /// Handler result; present only on `Success`.
    pub result: Option<&'a [Effect]>,
    /// Denial cause; present only on `Denied`.
    pub denial: Option<&'a Denial>,
    /// Failure; present only on `Error`.
    pub error: Option<&'a DispatchError>,
}

/// Host event bus seam.
///
/// Fire-and-forget: `emit` never suspends and its return value is not
/// observed. Implementations must be cheap; a slow sink stalls dispatch.
pub trait EventSink: Send + Sync {
    /// Deliver one lifecycle event.
    fn emit(&self, phase: Phase, payload: &EventPayload<'_>);
}

/// Sink that drops every event. Installed by default when the host
/// configures none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _phase: Phase, _payload: &EventPayload<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_stable() {
        let expected = [
            (InvocationStyle::ChatInput, Phase::Run, "chat_input_subcommand_run"),
            (InvocationStyle::ChatInput, Phase::Success, "chat_input_subcommand_success"),
            (InvocationStyle::ChatInput, Phase::Denied, "chat_input_subcommand_denied"),
            (InvocationStyle::ChatInput, Phase::Error, "chat_input_subcommand_error"),
            (InvocationStyle::Message, Phase::Run, "message_subcommand_run"),
            (InvocationStyle::Message, Phase::Success, "message_subcommand_success"),
            (InvocationStyle::Message, Phase::Denied, "message_subcommand_denied"),
            (InvocationStyle::Message, Phase::Error, "message_subcommand_error"),
        ];
        for (style, phase, name) in expected {
            assert_eq!(phase.event_name(style), name);
        }
    }
}
