//! Collaborators supplied by the hosting application

use crate::sync::protocol::{NodeGroup, OutboundMessage};
use async_trait::async_trait;

/// Where outbound renderer messages go
pub trait RendererSink: Send {
    fn send(&mut self, message: OutboundMessage);
}

/// Asks the user for a new node label. `None` means the prompt was dismissed.
#[async_trait]
pub trait LabelPrompt: Send + Sync {
    async fn prompt_label(&self, group: NodeGroup, current_label: &str) -> Option<String>;
}

/// Buffers outbound messages until the host drains them
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Vec<OutboundMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }
}

impl RendererSink for Outbox {
    fn send(&mut self, message: OutboundMessage) {
        self.messages.push(message);
    }
}

/// A prompt whose answer is already known, e.g. submitted with the request.
#[derive(Debug, Clone, Default)]
pub struct ProvidedLabel(pub Option<String>);

#[async_trait]
impl LabelPrompt for ProvidedLabel {
    async fn prompt_label(&self, _group: NodeGroup, _current_label: &str) -> Option<String> {
        self.0.clone()
    }
}
