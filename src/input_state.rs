//! Input state management for message composition, history, and
//! pending attachments.
//!
//! Separated from the main application state so the input panel can
//! work on its own struct, the way modern chat clients split it out.

/// A file staged for the next send, held in memory until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Manages all input-related state for the chat widget.
#[derive(Default)]
pub struct InputState {
    /// Current message being composed
    pub message_input: String,

    /// Sent-message history (for up/down arrow navigation)
    pub history: Vec<String>,

    /// Current position in history (None = not navigating)
    pub history_pos: Option<usize>,

    /// Saved input when entering history mode
    pub history_saved_input: Option<String>,

    /// Files staged for the next send
    pub pending_files: Vec<PendingAttachment>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent message, skipping consecutive duplicates.
    pub fn push_history(&mut self, text: &str) {
        if self.history.last().map(String::as_str) != Some(text) {
            self.history.push(text.to_string());
        }
        self.history_pos = None;
        self.history_saved_input = None;
    }

    /// Step backwards through history (Up arrow).
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.history_saved_input = Some(self.message_input.clone());
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.message_input = self.history[pos].clone();
    }

    /// Step forwards through history (Down arrow); past the newest
    /// entry restores whatever was being typed.
    pub fn history_next(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            self.message_input = self.history[pos + 1].clone();
        } else {
            self.history_pos = None;
            self.message_input = self.history_saved_input.take().unwrap_or_default();
        }
    }

    /// Stage a dropped file for the next send. Re-dropping the same
    /// name replaces the staged copy.
    pub fn attach_file(&mut self, name: String, bytes: Vec<u8>) {
        self.pending_files.retain(|f| f.name != name);
        self.pending_files.push(PendingAttachment { name, bytes });
    }

    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.pending_files.len() {
            self.pending_files.remove(index);
        }
    }

    /// Take everything needed for a send, clearing the compose state.
    pub fn take_submission(&mut self) -> (String, Vec<PendingAttachment>) {
        let text = std::mem::take(&mut self.message_input).trim().to_string();
        let files = std::mem::take(&mut self.pending_files);
        self.history_pos = None;
        self.history_saved_input = None;
        (text, files)
    }
}
