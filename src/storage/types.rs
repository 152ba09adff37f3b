use crate::error::{Result, WayfarerError};
use crate::session::{ChatSession, Message};
use chrono::{DateTime, SecondsFormat, Utc};

/// Flat row layout of a stored chat session
///
/// `recent_messages` holds the window as a JSON array; timestamps are
/// RFC 3339 with nanosecond precision so a saved session reads back equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub session_id: String,
    pub summary: String,
    pub recent_messages: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SessionRow {
    /// Flattens a session for storage
    pub fn from_session(session: &ChatSession) -> Result<Self> {
        if session.session_id.is_empty() {
            return Err(WayfarerError::Storage("session_id cannot be empty".to_string()).into());
        }

        let recent_messages = serde_json::to_string(&session.recent_messages).map_err(|e| {
            WayfarerError::Storage(format!("Failed to serialize messages: {}", e))
        })?;

        Ok(Self {
            session_id: session.session_id.clone(),
            summary: session.summary.clone(),
            recent_messages,
            created_at: format_timestamp(&session.created_at),
            updated_at: format_timestamp(&session.updated_at),
        })
    }

    /// Validates a stored row and rebuilds the session
    ///
    /// Rows with unparseable messages or timestamps are rejected rather
    /// than repaired.
    pub fn into_session(self) -> Result<ChatSession> {
        let recent_messages: Vec<Message> =
            serde_json::from_str(&self.recent_messages).map_err(|e| {
                WayfarerError::Storage(format!(
                    "Corrupt messages for session {}: {}",
                    self.session_id, e
                ))
            })?;

        let created_at = parse_timestamp(&self.session_id, "created_at", &self.created_at)?;
        let updated_at = parse_timestamp(&self.session_id, "updated_at", &self.updated_at)?;

        Ok(ChatSession {
            session_id: self.session_id,
            summary: self.summary,
            recent_messages,
            created_at,
            updated_at,
        })
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(session_id: &str, field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            WayfarerError::Storage(format!(
                "Corrupt {} for session {}: {}",
                field, session_id, e
            ))
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trip_preserves_session() {
        let mut session = ChatSession::with_id("row-1");
        session.summary = "Heading to Peru".to_string();
        session.push_user("Machu Picchu tickets?");
        session.push_assistant("Book early.");

        let row = SessionRow::from_session(&session).unwrap();
        assert_eq!(row.into_session().unwrap(), session);
    }

    #[test]
    fn test_empty_id_rejected() {
        let session = ChatSession::with_id("");
        assert!(SessionRow::from_session(&session).is_err());
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut row = SessionRow::from_session(&ChatSession::with_id("row-2")).unwrap();
        row.updated_at = "yesterday".to_string();
        let err = row.into_session().unwrap_err();
        assert!(err.to_string().contains("updated_at"));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut row = SessionRow::from_session(&ChatSession::with_id("row-3")).unwrap();
        row.recent_messages =
            r#"[{"role": "tool", "content": "x", "timestamp": "2025-01-01T00:00:00Z"}]"#.to_string();
        assert!(row.into_session().is_err());
    }
}
