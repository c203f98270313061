//! Process-wide store of live match sessions
//!
//! One entry per match id. Opening a match that already has a session
//! replaces it, so there is never more than one. Sessions are closed
//! explicitly or when the log reports the match result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::Result;
use tactician_battle::{BattleState, MatchId};

use crate::log::{LogEvent, observe, parse_log_line};
use crate::memory::MatchSession;

pub type SharedSession = Arc<Mutex<MatchSession>>;

/// Lock a session, recovering it if a previous holder panicked
pub fn lock(session: &SharedSession) -> MutexGuard<'_, MatchSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct MatchRegistry {
    sessions: RwLock<HashMap<MatchId, SharedSession>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session for a match (at team preview)
    pub fn open(&self, match_id: impl Into<MatchId>) -> SharedSession {
        self.insert(MatchSession::new(match_id))
    }

    /// Register a prepared session, e.g. one with a fixed seed
    pub fn insert(&self, session: MatchSession) -> SharedSession {
        let match_id = session.match_id().clone();
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.insert(match_id.clone(), shared.clone()).is_some() {
            tracing::warn!(match_id = %match_id, "Replaced stale session");
        } else {
            tracing::info!(match_id = %match_id, "Opened session");
        }
        shared
    }

    pub fn get(&self, match_id: &str) -> Option<SharedSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(match_id)
            .cloned()
    }

    /// Existing session, or a new one if the match was never opened
    pub fn get_or_open(&self, match_id: &MatchId) -> SharedSession {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(match_id.clone())
            .or_insert_with(|| {
                tracing::info!(match_id = %match_id, "Opened session");
                Arc::new(Mutex::new(MatchSession::new(match_id.clone())))
            })
            .clone()
    }

    /// Drop a match's session. Returns false if there was none.
    pub fn close(&self, match_id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(match_id)
            .is_some();
        if removed {
            tracing::info!(match_id = %match_id, "Closed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(match_id)
    }

    /// Feed one log line for the snapshot's match; closes the session when the match ends
    pub fn observe_log(&self, state: &BattleState, line: &str) -> Result<LogEvent> {
        let event = parse_log_line(line)?;
        if event == LogEvent::Other {
            return Ok(event);
        }

        let Some(session) = self.get(state.match_id.as_str()) else {
            tracing::debug!(match_id = %state.match_id, "Log line for unknown match");
            return Ok(event);
        };

        let finished = observe(&mut lock(&session), state, &event);
        if finished {
            self.close(state.match_id.as_str());
        }
        Ok(event)
    }
}
