//! Chat request handling
//!
//! [`ChatService`] runs one request cycle: load or create the session, append
//! the user turn, invoke the orchestrator, append the reply, apply the window
//! policy, stamp and persist. Both the HTTP API and the interactive REPL go
//! through it.

use crate::error::Result;
use crate::orchestrator::{Orchestrator, OrchestratorInputs};
use crate::session::{ChatSession, SessionWindow};
use crate::storage::SessionStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one chat cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Session the reply belongs to; new sessions get a fresh id
    pub session_id: String,
    /// Assistant reply text
    pub response: String,
    /// Rolling summary after this cycle
    pub summary: String,
}

/// Stateless request handler over an injected store and orchestrator
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    orchestrator: Arc<dyn Orchestrator>,
    window: SessionWindow,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        orchestrator: Arc<dyn Orchestrator>,
        window: SessionWindow,
    ) -> Self {
        Self {
            store,
            orchestrator,
            window,
        }
    }

    /// Handles one user message
    ///
    /// A blank `session_id` counts as omitted. A non-blank id that is not
    /// stored starts a new session under that id.
    ///
    /// # Errors
    ///
    /// Store errors propagate unchanged; an unavailable store fails the
    /// request before the session is touched or the orchestrator runs. An
    /// orchestrator failure is returned without persisting anything, so the
    /// user turn is not recorded.
    pub async fn handle(&self, session_id: Option<String>, message: String) -> Result<ChatReply> {
        self.store.ensure_available().await?;

        let mut session = self.load_or_create(session_id).await?;

        session.push_user(message.clone());
        let inputs = OrchestratorInputs::new(message, session.context());
        debug!(
            session_id = %session.session_id,
            window = session.recent_messages.len(),
            "Invoking orchestrator"
        );

        let response = self.orchestrator.execute(&inputs).await?;

        session.push_assistant(response.clone());
        self.window.maybe_summarize(&mut session).await;
        session.touch();

        self.store.save(&session).await?;
        info!(
            session_id = %session.session_id,
            window = session.recent_messages.len(),
            "Chat cycle persisted"
        );

        Ok(ChatReply {
            session_id: session.session_id,
            response,
            summary: session.summary,
        })
    }

    async fn load_or_create(&self, session_id: Option<String>) -> Result<ChatSession> {
        let id = session_id.filter(|id| !id.trim().is_empty());

        let Some(id) = id else {
            let session = ChatSession::new();
            info!(session_id = %session.session_id, "Started new session");
            return Ok(session);
        };

        match self.store.get(&id).await? {
            Some(session) => {
                debug!(
                    session_id = %id,
                    window = session.recent_messages.len(),
                    "Loaded session"
                );
                Ok(session)
            }
            None => {
                info!(session_id = %id, "Started new session with client id");
                Ok(ChatSession::with_id(id))
            }
        }
    }
}
