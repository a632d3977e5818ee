//! Backend event processing (bot responses and request failures).

use chrono::Local;
use crossbeam_channel::Receiver;

use crate::logging::TranscriptEntry;
use crate::message::Sender;
use crate::protocol::UiEvent;
use crate::state::ChatState;

/// What the user sees when a request fails, for any reason. The actual
/// error detail goes to the diagnostics log only.
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I'm having trouble connecting right now. Please try again.";

/// Process all pending events from the backend.
pub fn process_events(event_rx: &Receiver<UiEvent>, state: &mut ChatState) {
    // Drain all pending events from the backend
    while let Ok(event) = event_rx.try_recv() {
        match event {
            UiEvent::BotResponse(text) => {
                append_bot_message(state, text);
            }

            UiEvent::RequestFailed(detail) => {
                let ts = Local::now().format("%H:%M:%S").to_string();
                state.log_diagnostic(format!("[{}] request failed: {}", ts, detail));
                state.push_status("Connection problem".into());
                append_bot_message(state, APOLOGY_MESSAGE.to_string());
            }
        }
    }
}

/// Append a bot message to the conversation and mark the request done.
fn append_bot_message(state: &mut ChatState, text: String) {
    state.conversation.push(Sender::Bot, text.clone(), vec![]);
    state.is_loading = false;

    if let Some(logger) = &state.logger {
        logger.log(TranscriptEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            sender: "bot".into(),
            text,
        });
    }
}
