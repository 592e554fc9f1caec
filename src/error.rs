//! Unified error handling for subcmd.
//!
//! This module provides the error taxonomy for table validation and
//! dispatch, with static code labels for metrics and log fields.

use thiserror::Error;

use crate::invocation::InvocationStyle;

/// Failure raised by an invoked handler.
///
/// Host handlers keep their own error types; the dispatcher only transports
/// the failure into the `Error` lifecycle event and the terminal outcome.
pub type HandlerFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while dispatching a resolved subcommand.
///
/// Every variant is reported through the `Error` lifecycle event; none of
/// them escape a dispatch uncaught.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A `Method` target named a handler that is not in the owning
    /// dispatcher's method table.
    #[error("no handler method named {0:?} registered on this command")]
    HandlerNotFound(String),

    /// A `Command` target named a command that is not registered, or the
    /// registered command lacks the run capability for the invocation style.
    #[error("target command {name:?} is not registered or does not support {style} invocations")]
    TargetNotFound {
        /// Name the target was looked up under.
        name: String,
        /// Invocation style the capability was required for.
        style: InvocationStyle,
    },

    /// The invoked handler itself failed.
    #[error("subcommand handler failed: {0}")]
    Handler(#[source] HandlerFailure),
}

impl DispatchError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HandlerNotFound(_) => "handler_not_found",
            Self::TargetNotFound { .. } => "target_not_found",
            Self::Handler(_) => "handler_failure",
        }
    }
}

/// No subcommand, group, or token matched and no default exists.
///
/// Surfaced directly to the caller of the dispatch entry points. It
/// short-circuits before the `Run` event fires, so callers that do not
/// listen on the event sink still observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no subcommand matched the {0} invocation")]
pub struct NoMatchError(pub InvocationStyle);

impl NoMatchError {
    /// Stable identifier distinguishing the two invocation styles.
    pub fn identifier(&self) -> &'static str {
        match self.0 {
            InvocationStyle::ChatInput => "chat_input_subcommand_no_match",
            InvocationStyle::Message => "message_subcommand_no_match",
        }
    }
}

/// Mapping-table configuration errors surfaced by
/// [`MappingTable::validate`](crate::mapping::MappingTable::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two definitions in one mapping share a name.
    #[error("duplicate subcommand name {name:?} within one mapping")]
    DuplicateSubcommand {
        /// The duplicated name.
        name: String,
    },

    /// Two grouped mappings share a group name.
    #[error("duplicate subcommand group {0:?}")]
    DuplicateGroup(String),

    /// More than one message definition is flagged as the default fallback.
    #[error("more than one default message subcommand: {first:?} and {second:?}")]
    DuplicateDefault {
        /// Name of the first default encountered in declaration order.
        first: String,
        /// Name of the offending second default.
        second: String,
    },
}
