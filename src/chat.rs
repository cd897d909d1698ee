use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::request::{RequestToken, RequestTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Append-only conversation history
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Produces the assistant side of the conversation
pub trait ChatAssistant: Send + Sync {
    fn name(&self) -> &str;
    fn reply(&self, message: &str) -> String;
}

/// Canned local reply that echoes the question. Stands in for a real backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoAssistant;

impl ChatAssistant for EchoAssistant {
    fn name(&self) -> &str {
        "echo"
    }

    fn reply(&self, message: &str) -> String {
        format!(
            "I understand you're asking about: \"{}\". Let me help you with that.",
            message
        )
    }
}

/// Chat panel state: history, the pending input line and replies in flight
#[derive(Debug, Default)]
pub struct ChatSession {
    log: ChatLog,
    input: String,
    tokens: RequestTracker,
    pending: BTreeSet<RequestToken>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Sends the input line. Returns the reply request to schedule, or `None`
    /// when the input is blank.
    pub fn send_input(&mut self) -> Option<(RequestToken, String)> {
        let text = std::mem::take(&mut self.input);
        let request = self.send(&text);
        if request.is_none() {
            self.input = text;
        }
        request
    }

    /// Appends the user message now; the reply arrives later through
    /// [`ChatSession::receive_reply`] with the returned token.
    pub fn send(&mut self, text: &str) -> Option<(RequestToken, String)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.log.push(ChatMessage::user(text));
        let token = self.tokens.issue();
        self.pending.insert(token);
        debug!("Chat request {} sent ({} chars)", token, text.chars().count());
        Some((token, text.to_string()))
    }

    /// Appends the reply for a request once. Unknown or repeated tokens are dropped.
    pub fn receive_reply(&mut self, token: RequestToken, content: String) -> bool {
        if !self.pending.remove(&token) {
            warn!("Dropping chat reply for unknown request {}", token);
            return false;
        }
        self.log.push(ChatMessage::assistant(content));
        true
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }
}
