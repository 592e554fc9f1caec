//! Handler traits and the effect type handlers produce.
//!
//! Handlers never touch host state directly; they return a list of
//! [`Effect`]s which the host applies after the dispatch settles. This
//! keeps subcommand logic independently testable and lets the dispatcher
//! treat handler output as opaque result data for the `Success` payload.

use async_trait::async_trait;

use crate::args::ArgumentCursor;
use crate::error::HandlerFailure;
use crate::invocation::{ChatInputInvocation, InvocationContext, MessageInvocation};

/// One side effect requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reply to the invoking user or channel.
    Reply(String),
    /// Reply visible only to the invoking user.
    Ephemeral(String),
}

/// Result of a handler invocation: effects on success, an opaque host
/// failure otherwise.
pub type HandlerResult = Result<Vec<Effect>, HandlerFailure>;

/// Handler for structured (chat input) subcommand invocations.
#[async_trait]
pub trait ChatInputHandler: Send + Sync {
    /// Run the subcommand for a structured invocation.
    async fn run(
        &self,
        interaction: &ChatInputInvocation,
        ctx: &InvocationContext,
    ) -> HandlerResult;
}

/// Handler for free-text subcommand invocations.
///
/// Receives the argument cursor positioned after the matched token, or at
/// the original position when invoked as the default fallback (the
/// unmatched token is then the first argument).
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Run the subcommand for a free-text invocation.
    async fn run(
        &self,
        message: &MessageInvocation,
        args: &mut dyn ArgumentCursor,
        ctx: &InvocationContext,
    ) -> HandlerResult;
}
