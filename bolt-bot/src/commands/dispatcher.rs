//! Text command registry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{HandlerResponse, Message, Result};

/// A chat command matched by exact text: its canonical name or one of its aliases.
#[async_trait]
pub trait Command: Send + Sync {
    /// Canonical name, lowercase (e.g. `/price`). Registration key.
    fn name(&self) -> &str;

    /// Alternative spellings, lowercase.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn description(&self) -> &str;

    async fn execute(&self, message: &Message) -> Result<HandlerResponse>;

    /// True if `text` (already lowercased) is the name or an alias.
    fn matches(&self, text: &str) -> bool {
        self.name().to_lowercase() == text
            || self.aliases().iter().any(|alias| alias.to_lowercase() == text)
    }
}

/// Ordered set of commands keyed by canonical name.
#[derive(Clone, Default)]
pub struct Dispatcher {
    commands: Vec<Arc<dyn Command>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `command`, or replaces the command already registered under the same name (ignoring
    /// case). A replacement keeps the original position.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_lowercase();
        match self
            .commands
            .iter()
            .position(|c| c.name().to_lowercase() == name)
        {
            Some(index) => {
                debug!(command = %command.name(), "command replaced");
                self.commands[index] = command;
            }
            None => {
                info!(command = %command.name(), "command registered");
                self.commands.push(command);
            }
        }
    }

    /// Builder form of [`Dispatcher::register`].
    pub fn with(mut self, command: Arc<dyn Command>) -> Self {
        self.register(command);
        self
    }

    /// First command, in registration order, whose name or alias equals `text` ignoring case.
    /// Surrounding whitespace and a `@botname` suffix on slash commands are ignored.
    pub fn resolve(&self, text: &str) -> Option<Arc<dyn Command>> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }
        self.commands.iter().find(|c| c.matches(&text)).cloned()
    }

    /// Registered commands in order.
    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn normalize(text: &str) -> String {
    let text = text.trim().to_lowercase();
    match text.split_once('@') {
        Some((command, _bot)) if command.starts_with('/') => command.to_string(),
        _ => text,
    }
}
