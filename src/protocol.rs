/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Send a text-only message to the chat endpoint
    SendMessage { text: String },
    /// Send a message with file attachments (multipart)
    SendMessageWithFiles {
        text: String,
        files: Vec<FileUpload>,
    },
    /// Stop the backend thread
    Shutdown,
}

/// A file attachment as it goes over the wire
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Events sent from the Backend to the UI
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The endpoint answered; payload is the bot's reply text
    BotResponse(String),
    /// The request failed (transport, non-2xx, or bad JSON).
    /// Carries diagnostic detail for the log, never shown to the user.
    RequestFailed(String),
}
