use crate::models::ConversationTurn;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Append-only conversation log scoped to one user session. Created at
/// session start, dropped at session end; never shared across sessions.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    turns: Vec<ConversationTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Full ordered transcript. The log is never truncated; callers
    /// that feed a prompt should use [`ChatSession::recent`].
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The last `window` turns, for bounded prompt assembly.
    pub fn recent(&self, window: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
