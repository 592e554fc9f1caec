//! # subcmd
//!
//! Subcommand dispatch for chat-style bot commands.
//!
//! Given a top-level command invocation — either a structured interaction
//! with a declared subcommand/group name, or a free-text message whose
//! first token names a subcommand — this crate resolves the matching
//! definition from an immutable [`MappingTable`], runs precondition checks
//! for delegations to external commands, invokes exactly one handler, and
//! emits lifecycle events (`Run`, `Success`, `Denied`, `Error`) through an
//! injected [`EventSink`].
//!
//! ## Features
//!
//! - One resolution algorithm for both invocation styles, with
//!   deterministic first-match-in-declaration-order semantics
//! - Default-subcommand fallback with cursor backtracking: an unmatched
//!   token is handed back to the default handler as its first argument
//! - Local method-table targets and delegation to externally registered
//!   commands, with global and per-command precondition checks
//! - Construction-time validation of duplicate names, groups, and defaults
//! - No shared mutable state; one dispatcher serves concurrent dispatches
//!
//! ## Quick start
//!
//! ```rust
//! use async_trait::async_trait;
//! use subcmd::{
//!     ChatInputDefinition, ChatInputHandler, ChatInputInvocation, DispatchOutcome, Effect,
//!     HandlerResult, InvocationContext, SubcommandDispatcher,
//! };
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl ChatInputHandler for Ping {
//!     async fn run(&self, _: &ChatInputInvocation, _: &InvocationContext) -> HandlerResult {
//!         Ok(vec![Effect::Reply("pong".into())])
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = SubcommandDispatcher::builder("util")
//!     .chat_input(vec![ChatInputDefinition::inline("ping", Ping)])
//!     .build()?;
//!
//! let interaction = ChatInputInvocation::new("util").with_subcommand("ping");
//! let ctx = InvocationContext::new("util");
//! match dispatcher.chat_input_run(&interaction, &ctx).await? {
//!     DispatchOutcome::Success(effects) => {
//!         assert_eq!(effects, vec![Effect::Reply("pong".into())]);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod args;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod handler;
pub mod invocation;
pub mod mapping;
pub mod precondition;
pub mod registry;
pub mod resolve;

pub use args::{ArgumentCursor, TokenCursor};
pub use dispatch::{DispatchOutcome, DispatcherBuilder, SubcommandDispatcher};
pub use error::{ConfigError, DispatchError, HandlerFailure, NoMatchError};
pub use events::{EventPayload, EventSink, NullSink, Phase};
pub use handler::{ChatInputHandler, Effect, HandlerResult, MessageHandler};
pub use invocation::{
    ChatInputInvocation, InvocationContext, InvocationRef, InvocationStyle, MessageInvocation,
};
pub use mapping::{
    ChatInputDefinition, ChatInputTarget, Mapping, MappingTable, MessageDefinition, MessageTarget,
};
pub use precondition::{AllowAll, Denial, PreconditionResult, PreconditionRunner};
pub use registry::{CommandRegistry, MemoryRegistry, RegisteredCommand};
pub use resolve::Descriptor;
