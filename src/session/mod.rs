//! Chat session model
//!
//! A [`ChatSession`] is one traveller's conversation: a rolling natural
//! language `summary` of everything older than the retained window, plus the
//! `recent_messages` window itself. The window policy lives in [`window`],
//! the summary rewrite in [`summary`].

pub mod summary;
pub mod window;

pub use summary::{RollingSummarizer, SummaryOutcome, UnchangedReason};
pub use window::{SessionWindow, MIN_RECENT_MESSAGES};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The traveller
    User,
    /// The travel agent
    Assistant,
}

impl Role {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a chat session
///
/// Messages are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// When the message was created
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::session::{Message, Role};
    ///
    /// let msg = Message::user("Find me a hotel in Lisbon");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Renders the message as a `role: content` transcript line
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

/// Renders messages as newline-joined `role: content` lines, in order
///
/// # Examples
///
/// ```
/// use wayfarer::session::{render_transcript, Message};
///
/// let lines = render_transcript(&[Message::user("hi"), Message::assistant("hello")]);
/// assert_eq!(lines, "user: hi\nassistant: hello");
/// ```
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persistent conversation state for one session
///
/// Stored records that omit `summary` or `recent_messages` deserialize with
/// an empty summary and an empty window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Opaque session identifier
    pub session_id: String,
    /// Rolling summary of messages older than the window
    #[serde(default)]
    pub summary: String,
    /// Retained raw messages, oldest first
    #[serde(default)]
    pub recent_messages: Vec<Message>,
    /// Creation time, never changed afterwards
    pub created_at: DateTime<Utc>,
    /// Time of the last persisted mutation
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates an empty session with a freshly generated identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::session::ChatSession;
    ///
    /// let a = ChatSession::new();
    /// let b = ChatSession::new();
    /// assert_ne!(a.session_id, b.session_id);
    /// assert!(a.summary.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Creates an empty session that uses a caller-supplied identifier
    pub fn with_id(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            summary: String::new(),
            recent_messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a user turn to the window
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.recent_messages.push(Message::user(content));
    }

    /// Appends an assistant turn to the window
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.recent_messages.push(Message::assistant(content));
    }

    /// Builds the context string handed to the orchestrator
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::session::ChatSession;
    ///
    /// let mut session = ChatSession::with_id("s1");
    /// session.summary = "Wants to visit Japan.".to_string();
    /// session.push_user("Which month?");
    /// assert_eq!(
    ///     session.context(),
    ///     "Summary of past conversation:\nWants to visit Japan.\n\nRecent conversation:\nuser: Which month?"
    /// );
    /// ```
    pub fn context(&self) -> String {
        format!(
            "Summary of past conversation:\n{}\n\nRecent conversation:\n{}",
            self.summary,
            render_transcript(&self.recent_messages)
        )
    }

    /// Marks the session as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
