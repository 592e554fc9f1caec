//! Precondition checks gating delegation to external commands.
//!
//! Preconditions only run for `Command` targets: local targets were already
//! covered by the owning command's checks upstream. The host-wide (global)
//! runner goes first, then the target command's own runner; the first
//! denial wins. Denial is an expected outcome, reported through the
//! `Denied` lifecycle event rather than the error channel.

use async_trait::async_trait;

use crate::invocation::{InvocationContext, InvocationRef};
use crate::registry::RegisteredCommand;

/// Cause of a precondition denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// Stable identifier of the failed check (e.g. `"cooldown"`).
    pub identifier: String,
    /// Human-readable message for the invoking user.
    pub message: String,
}

impl Denial {
    /// Denial with the given identifier and user-facing message.
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a precondition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionResult {
    /// Every check passed.
    Pass,
    /// A check rejected the invocation.
    Deny(Denial),
}

/// Runs precondition checks against a command.
///
/// Implemented by the host; both the global runner and each command's own
/// runner follow this shape.
#[async_trait]
pub trait PreconditionRunner: Send + Sync {
    /// Run every check; the first denial wins.
    async fn run(
        &self,
        invocation: InvocationRef<'_>,
        command: &dyn RegisteredCommand,
        ctx: &InvocationContext,
    ) -> PreconditionResult;
}

/// Runner that passes every invocation. Installed by default when the host
/// configures no global preconditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl PreconditionRunner for AllowAll {
    async fn run(
        &self,
        _invocation: InvocationRef<'_>,
        _command: &dyn RegisteredCommand,
        _ctx: &InvocationContext,
    ) -> PreconditionResult {
        PreconditionResult::Pass
    }
}
