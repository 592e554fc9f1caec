//! The dispatcher: resolution, preconditions, handler invocation, and the
//! lifecycle event state machine.
//!
//! Each entry point runs one dispatch to a terminal outcome. A `NoMatch`
//! short-circuits before the `Run` event and is returned to the caller
//! directly; every other path emits `Run` followed by exactly one of
//! `Success`, `Denied`, or `Error`, invokes at most one handler, and lets
//! no failure escape uncaught. Dropping the returned future cancels the
//! dispatch; remaining lifecycle events are then skipped.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Instrument, debug, debug_span};

use crate::args::ArgumentCursor;
use crate::error::{ConfigError, DispatchError, NoMatchError};
use crate::events::{EventPayload, EventSink, NullSink, Phase};
use crate::handler::{ChatInputHandler, Effect, MessageHandler};
use crate::invocation::{
    ChatInputInvocation, InvocationContext, InvocationRef, InvocationStyle, MessageInvocation,
};
use crate::mapping::{
    ChatInputDefinition, ChatInputTarget, Mapping, MappingTable, MessageDefinition, MessageTarget,
};
use crate::precondition::{AllowAll, Denial, PreconditionResult, PreconditionRunner};
use crate::registry::{CommandRegistry, MemoryRegistry, RegisteredCommand};
use crate::resolve::{self, Descriptor};

/// Terminal outcome of a dispatch that emitted its `Run` event.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran to completion; carries its effects.
    Success(Vec<Effect>),
    /// A precondition rejected the invocation. Expected, not a failure.
    Denied(Denial),
    /// Target resolution or the handler itself failed. Already reported
    /// through the `Error` event; returned here for callers that do not
    /// listen on the sink.
    Errored(DispatchError),
}

/// Result of the delegation stage for `Command` targets.
enum Delegated {
    Ran(Result<Vec<Effect>, DispatchError>),
    Denied(Denial),
}

/// Subcommand dispatch core for one owning command.
///
/// Holds the immutable mapping table, the method table built at
/// registration time, and the injected host capabilities. Nothing here is
/// mutated after [`DispatcherBuilder::build`]; a dispatcher is safely
/// shared across concurrent dispatches, each of which keeps its own
/// per-dispatch payload.
pub struct SubcommandDispatcher {
    command: String,
    table: MappingTable,
    chat_methods: HashMap<&'static str, Arc<dyn ChatInputHandler>>,
    message_methods: HashMap<&'static str, Arc<dyn MessageHandler>>,
    registry: Arc<dyn CommandRegistry>,
    global_preconditions: Arc<dyn PreconditionRunner>,
    sink: Arc<dyn EventSink>,
}

impl SubcommandDispatcher {
    /// Start building a dispatcher for the named owning command.
    pub fn builder(command: impl Into<String>) -> DispatcherBuilder {
        DispatcherBuilder {
            command: command.into(),
            mappings: Vec::new(),
            chat_methods: HashMap::new(),
            message_methods: HashMap::new(),
            registry: None,
            global_preconditions: None,
            sink: None,
        }
    }

    /// Name of the owning command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The mapping table, mainly for introspection.
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Dispatch a structured invocation.
    ///
    /// Returns `NoMatchError` without emitting any event when neither a
    /// subcommand nor a group selects a definition. Every other path emits
    /// `Run` plus exactly one terminal event, mirrored in the returned
    /// [`DispatchOutcome`].
    pub async fn chat_input_run(
        &self,
        interaction: &ChatInputInvocation,
        ctx: &InvocationContext,
    ) -> Result<DispatchOutcome, NoMatchError> {
        let descriptor = Descriptor {
            subcommand: interaction.subcommand.as_deref(),
            group: interaction.subcommand_group.as_deref(),
        };
        let Some(definition) = resolve::chat_input(&self.table, descriptor) else {
            return Err(NoMatchError(InvocationStyle::ChatInput));
        };

        let span = debug_span!(
            "subcommand.dispatch",
            command = %self.command,
            style = %InvocationStyle::ChatInput,
            subcommand = %definition.name,
        );
        Ok(self
            .run_chat_input(interaction, ctx, definition)
            .instrument(span)
            .await)
    }

    /// Dispatch a free-text invocation.
    ///
    /// The cursor must sit on the candidate subcommand token. On a match
    /// the token is consumed before the handler runs; when the default
    /// fallback is taken the cursor is left at its original position.
    pub async fn message_run(
        &self,
        message: &MessageInvocation,
        args: &mut dyn ArgumentCursor,
        ctx: &InvocationContext,
    ) -> Result<DispatchOutcome, NoMatchError> {
        let Some(definition) = resolve::message(&self.table, args) else {
            return Err(NoMatchError(InvocationStyle::Message));
        };

        let span = debug_span!(
            "subcommand.dispatch",
            command = %self.command,
            style = %InvocationStyle::Message,
            subcommand = %definition.name,
        );
        Ok(self
            .run_message(message, args, ctx, definition)
            .instrument(span)
            .await)
    }

    async fn run_chat_input(
        &self,
        interaction: &ChatInputInvocation,
        ctx: &InvocationContext,
        definition: &ChatInputDefinition,
    ) -> DispatchOutcome {
        let invocation = InvocationRef::ChatInput(interaction);
        self.emit(Phase::Run, invocation, ctx, &definition.name, None, None, None);

        let step = match &definition.target {
            ChatInputTarget::Inline(handler) => handler
                .run(interaction, ctx)
                .await
                .map_err(DispatchError::Handler),
            ChatInputTarget::Method(method) => match self.chat_methods.get(method) {
                Some(handler) => handler
                    .run(interaction, ctx)
                    .await
                    .map_err(DispatchError::Handler),
                None => Err(DispatchError::HandlerNotFound((*method).to_string())),
            },
            ChatInputTarget::Command(name) => {
                match self
                    .delegate_chat_input(name, interaction, invocation, ctx)
                    .await
                {
                    Delegated::Ran(result) => result,
                    Delegated::Denied(denial) => {
                        return self.deny(invocation, ctx, &definition.name, denial);
                    }
                }
            }
        };

        self.settle(step, invocation, ctx, &definition.name)
    }

    async fn run_message(
        &self,
        message: &MessageInvocation,
        args: &mut dyn ArgumentCursor,
        ctx: &InvocationContext,
        definition: &MessageDefinition,
    ) -> DispatchOutcome {
        let invocation = InvocationRef::Message(message);
        self.emit(Phase::Run, invocation, ctx, &definition.name, None, None, None);

        let step = match &definition.target {
            MessageTarget::Inline(handler) => handler
                .run(message, args, ctx)
                .await
                .map_err(DispatchError::Handler),
            MessageTarget::Method(method) => match self.message_methods.get(method) {
                Some(handler) => handler
                    .run(message, args, ctx)
                    .await
                    .map_err(DispatchError::Handler),
                None => Err(DispatchError::HandlerNotFound((*method).to_string())),
            },
            MessageTarget::Command(name) => {
                match self
                    .delegate_message(name, message, args, invocation, ctx)
                    .await
                {
                    Delegated::Ran(result) => result,
                    Delegated::Denied(denial) => {
                        return self.deny(invocation, ctx, &definition.name, denial);
                    }
                }
            }
        };

        self.settle(step, invocation, ctx, &definition.name)
    }

    /// Delegate a structured invocation to a registered command.
    async fn delegate_chat_input(
        &self,
        name: &str,
        interaction: &ChatInputInvocation,
        invocation: InvocationRef<'_>,
        ctx: &InvocationContext,
    ) -> Delegated {
        let Some(command) = self.registry.get(name) else {
            return Delegated::Ran(Err(Self::target_not_found(name, InvocationStyle::ChatInput)));
        };
        let Some(handler) = command.as_chat_input() else {
            return Delegated::Ran(Err(Self::target_not_found(name, InvocationStyle::ChatInput)));
        };
        if let Some(denial) = self
            .check_preconditions(invocation, command.as_ref(), ctx)
            .await
        {
            return Delegated::Denied(denial);
        }
        Delegated::Ran(
            handler
                .run(interaction, ctx)
                .await
                .map_err(DispatchError::Handler),
        )
    }

    /// Delegate a free-text invocation to a registered command.
    async fn delegate_message(
        &self,
        name: &str,
        message: &MessageInvocation,
        args: &mut dyn ArgumentCursor,
        invocation: InvocationRef<'_>,
        ctx: &InvocationContext,
    ) -> Delegated {
        let Some(command) = self.registry.get(name) else {
            return Delegated::Ran(Err(Self::target_not_found(name, InvocationStyle::Message)));
        };
        let Some(handler) = command.as_message() else {
            return Delegated::Ran(Err(Self::target_not_found(name, InvocationStyle::Message)));
        };
        if let Some(denial) = self
            .check_preconditions(invocation, command.as_ref(), ctx)
            .await
        {
            return Delegated::Denied(denial);
        }
        Delegated::Ran(
            handler
                .run(message, args, ctx)
                .await
                .map_err(DispatchError::Handler),
        )
    }

    /// Run global then per-command preconditions; the first denial wins.
    async fn check_preconditions(
        &self,
        invocation: InvocationRef<'_>,
        command: &dyn RegisteredCommand,
        ctx: &InvocationContext,
    ) -> Option<Denial> {
        if let PreconditionResult::Deny(denial) =
            self.global_preconditions.run(invocation, command, ctx).await
        {
            return Some(denial);
        }
        if let Some(own) = command.preconditions() {
            if let PreconditionResult::Deny(denial) = own.run(invocation, command, ctx).await {
                return Some(denial);
            }
        }
        None
    }

    /// Settle the terminal phase for a completed invocation step.
    fn settle(
        &self,
        step: Result<Vec<Effect>, DispatchError>,
        invocation: InvocationRef<'_>,
        ctx: &InvocationContext,
        subcommand: &str,
    ) -> DispatchOutcome {
        match step {
            Ok(effects) => {
                self.emit(
                    Phase::Success,
                    invocation,
                    ctx,
                    subcommand,
                    Some(&effects),
                    None,
                    None,
                );
                DispatchOutcome::Success(effects)
            }
            Err(error) => {
                debug!(
                    command = %self.command,
                    subcommand = %subcommand,
                    error = %error,
                    code = error.error_code(),
                    "dispatch failed"
                );
                self.emit(
                    Phase::Error,
                    invocation,
                    ctx,
                    subcommand,
                    None,
                    None,
                    Some(&error),
                );
                DispatchOutcome::Errored(error)
            }
        }
    }

    fn deny(
        &self,
        invocation: InvocationRef<'_>,
        ctx: &InvocationContext,
        subcommand: &str,
        denial: Denial,
    ) -> DispatchOutcome {
        debug!(
            command = %self.command,
            subcommand = %subcommand,
            identifier = %denial.identifier,
            "dispatch denied"
        );
        self.emit(
            Phase::Denied,
            invocation,
            ctx,
            subcommand,
            None,
            Some(&denial),
            None,
        );
        DispatchOutcome::Denied(denial)
    }

    fn target_not_found(name: &str, style: InvocationStyle) -> DispatchError {
        DispatchError::TargetNotFound {
            name: name.to_string(),
            style,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        phase: Phase,
        invocation: InvocationRef<'_>,
        ctx: &InvocationContext,
        subcommand: &str,
        result: Option<&[Effect]>,
        denial: Option<&Denial>,
        error: Option<&DispatchError>,
    ) {
        let payload = EventPayload {
            command: &self.command,
            invocation,
            context: ctx,
            subcommand,
            result,
            denial,
            error,
        };
        self.sink.emit(phase, &payload);
    }
}

/// Builder for [`SubcommandDispatcher`].
///
/// Mappings and method-table entries are registered here, replacing
/// reflection-style lookup with an explicit name-to-callable table fixed
/// at build time. `build` validates the mapping table; everything else is
/// infallible.
pub struct DispatcherBuilder {
    command: String,
    mappings: Vec<Mapping>,
    chat_methods: HashMap<&'static str, Arc<dyn ChatInputHandler>>,
    message_methods: HashMap<&'static str, Arc<dyn MessageHandler>>,
    registry: Option<Arc<dyn CommandRegistry>>,
    global_preconditions: Option<Arc<dyn PreconditionRunner>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl DispatcherBuilder {
    /// Append a flat chat-input mapping.
    pub fn chat_input(mut self, definitions: Vec<ChatInputDefinition>) -> Self {
        self.mappings.push(Mapping::ChatInput(definitions));
        self
    }

    /// Append a grouped chat-input mapping.
    pub fn chat_input_group(
        mut self,
        group: impl Into<String>,
        definitions: Vec<ChatInputDefinition>,
    ) -> Self {
        self.mappings.push(Mapping::ChatInputGroup {
            group: group.into(),
            subcommands: definitions,
        });
        self
    }

    /// Append a flat message mapping.
    pub fn message(mut self, definitions: Vec<MessageDefinition>) -> Self {
        self.mappings.push(Mapping::Message(definitions));
        self
    }

    /// Register a named chat-input handler for `Method` targets.
    pub fn chat_input_method(
        mut self,
        name: &'static str,
        handler: impl ChatInputHandler + 'static,
    ) -> Self {
        self.chat_methods.insert(name, Arc::new(handler));
        self
    }

    /// Register a named message handler for `Method` targets.
    pub fn message_method(
        mut self,
        name: &'static str,
        handler: impl MessageHandler + 'static,
    ) -> Self {
        self.message_methods.insert(name, Arc::new(handler));
        self
    }

    /// Install the command registry consulted by `Command` targets.
    /// Defaults to an empty [`MemoryRegistry`].
    pub fn registry(mut self, registry: Arc<dyn CommandRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Install the host-wide precondition runner. Defaults to
    /// [`AllowAll`].
    pub fn global_preconditions(mut self, runner: Arc<dyn PreconditionRunner>) -> Self {
        self.global_preconditions = Some(runner);
        self
    }

    /// Install the lifecycle event sink. Defaults to [`NullSink`].
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the mapping table and assemble the dispatcher.
    pub fn build(self) -> Result<SubcommandDispatcher, ConfigError> {
        let table = MappingTable::new(self.mappings);
        table.validate()?;
        Ok(SubcommandDispatcher {
            command: self.command,
            table,
            chat_methods: self.chat_methods,
            message_methods: self.message_methods,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(MemoryRegistry::new())),
            global_preconditions: self
                .global_preconditions
                .unwrap_or_else(|| Arc::new(AllowAll)),
            sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
        })
    }
}
