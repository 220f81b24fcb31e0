use async_trait::async_trait;
use tracing::debug;

use crate::{
    command::{MessageContext, ReplyCommand, ReplyDispatcher, SharedCommand},
    errors::Error,
    Result,
};

/// Runs all children in order, or exactly one chosen uniformly at random.
#[derive(Clone, Debug)]
pub struct CompositeReplyCommand {
    commands: Vec<SharedCommand>,
    execute_all: bool,
}

impl CompositeReplyCommand {
    pub fn new(commands: Vec<SharedCommand>, execute_all: bool) -> Result<Self> {
        if commands.is_empty() {
            return Err(Error::Validation(
                "at least one command must be provided".to_string(),
            ));
        }
        Ok(Self {
            commands,
            execute_all,
        })
    }

    /// A new composite with `command` appended; `self` is left untouched.
    pub fn add_command(&self, command: SharedCommand) -> Self {
        let mut commands = self.commands.clone();
        commands.push(command);
        Self {
            commands,
            execute_all: self.execute_all,
        }
    }

    pub fn commands(&self) -> &[SharedCommand] {
        &self.commands
    }

    pub fn execute_all(&self) -> bool {
        self.execute_all
    }
}

#[async_trait]
impl ReplyCommand for CompositeReplyCommand {
    async fn execute(&self, ctx: &MessageContext, dispatcher: &ReplyDispatcher) -> Result<()> {
        if self.execute_all {
            for command in &self.commands {
                command.execute(ctx, dispatcher).await?;
            }
            return Ok(());
        }

        let idx = dispatcher.pick(self.commands.len());
        debug!(index = idx, of = self.commands.len(), "composite picked one command");
        self.commands[idx].execute(ctx, dispatcher).await
    }
}
