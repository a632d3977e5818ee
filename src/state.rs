//! Core application state, separated from UI logic.
//!
//! `ChatState` holds all data that represents the chat session:
//! the conversation log, the busy flag for the in-flight request, the
//! diagnostics log, and transient status toasts. This separation allows
//! UI components to receive state as a parameter rather than owning it.

use std::time::Instant;

use crate::logging::Logger;
use crate::message::Conversation;

/// Maximum diagnostics lines to keep in memory.
const MAX_SYSTEM_LOG: usize = 500;

/// Core application state for the chat widget.
///
/// Owned by `ChatApp` and passed to UI components as needed.
#[derive(Default)]
pub struct ChatState {
    /// The append-only conversation log for this session.
    pub conversation: Conversation,

    /// Whether a request is outstanding. Input is disabled while true,
    /// so at most one request is ever in flight.
    pub is_loading: bool,

    /// Diagnostics log (request failures, attachment problems). Shown
    /// only in the diagnostics window, never in the conversation.
    pub system_log: Vec<String>,

    /// Status toast messages with creation time (auto-expire).
    pub status_messages: Vec<(String, Instant)>,

    /// Transcript logger for persisting the conversation to disk.
    pub logger: Option<Logger>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            is_loading: false,
            system_log: Vec::new(),
            status_messages: Vec::new(),
            logger: Logger::new().ok(),
        }
    }

    /// Append a diagnostics line, trimming the oldest when over cap.
    pub fn log_diagnostic(&mut self, line: String) {
        self.system_log.push(line);
        if self.system_log.len() > MAX_SYSTEM_LOG {
            self.system_log.remove(0);
        }
    }

    /// Show a transient status toast.
    pub fn push_status(&mut self, text: String) {
        self.status_messages.push((text, Instant::now()));
    }

    /// Purge status messages older than the given duration.
    pub fn purge_old_status_messages(&mut self, max_age_secs: u64) {
        self.status_messages
            .retain(|(_, created)| created.elapsed().as_secs() < max_age_secs);
    }
}
