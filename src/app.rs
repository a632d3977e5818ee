//! ChatApp: owns the session state, the backend channels, and the
//! per-frame update loop.

use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;

use crate::backend::run_backend;
use crate::config::{load_settings, resolve_api_base, save_settings, Settings};
use crate::events::process_events;
use crate::input_state::{InputState, PendingAttachment};
use crate::logging::TranscriptEntry;
use crate::message::{AttachmentInfo, Sender as MsgSender};
use crate::protocol::{BackendAction, FileUpload, UiEvent};
use crate::reveal::{RevealScheduler, REVEAL_CHAR_INTERVAL};
use crate::state::ChatState;
use crate::ui;
use crate::ui::theme::ChatTheme;

/// Idle repaint interval (keeps backend events draining).
const IDLE_REPAINT: Duration = Duration::from_millis(100);
/// How long a status toast stays up.
const STATUS_TOAST_SECS: u64 = 4;

pub struct ChatApp {
    // Core state (conversation, loading flag, diagnostics)
    pub state: ChatState,

    // Input state (message composition, history, attachments)
    pub input: InputState,

    // Typewriter reveal for the latest bot message
    pub reveal: RevealScheduler,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<UiEvent>,

    // Configuration
    pub api_base: String,
    pub theme: String,

    pub show_diagnostics: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<UiEvent>();

        let settings = load_settings();
        let api_base = resolve_api_base(settings.as_ref().map(|s| s.api_base_url.as_str()));

        // Spawn the backend thread
        let backend_base = api_base.clone();
        thread::spawn(move || {
            run_backend(action_rx, event_tx, backend_base);
        });

        let mut theme = "light".to_string();
        let mut input = InputState::new();
        if let Some(s) = &settings {
            if !s.theme.is_empty() {
                theme = s.theme.clone();
            }
            input.history = s.history.clone();
        }

        match theme.as_str() {
            "dark" => cc.egui_ctx.set_visuals(egui::Visuals::dark()),
            _ => cc.egui_ctx.set_visuals(egui::Visuals::light()),
        }
        ui::theme::apply_app_style(&cc.egui_ctx);

        Self {
            state: ChatState::new(),
            input,
            reveal: RevealScheduler::new(),
            action_tx,
            event_rx,
            api_base,
            theme,
            show_diagnostics: false,
        }
    }

    pub(crate) fn chat_theme(&self) -> ChatTheme {
        match self.theme.as_str() {
            "dark" => ChatTheme::dark(),
            _ => ChatTheme::light(),
        }
    }

    /// Append the user message and hand the request to the backend.
    pub fn send_message(&mut self, text: String, files: Vec<PendingAttachment>) {
        let content = compose_user_content(&text, &files);
        let infos: Vec<AttachmentInfo> = files
            .iter()
            .map(|f| AttachmentInfo { name: f.name.clone(), size: f.bytes.len() })
            .collect();

        self.state
            .conversation
            .push(MsgSender::User, content.clone(), infos);
        if let Some(logger) = &self.state.logger {
            logger.log(TranscriptEntry {
                timestamp: Local::now().format("%H:%M:%S").to_string(),
                sender: "user".into(),
                text: content,
            });
        }

        self.state.is_loading = true;

        let action = if files.is_empty() {
            BackendAction::SendMessage { text }
        } else {
            let files = files
                .into_iter()
                .map(|f| FileUpload { name: f.name, bytes: f.bytes })
                .collect();
            BackendAction::SendMessageWithFiles { text, files }
        };
        let _ = self.action_tx.send(action);
    }

    /// Stage files dropped onto the window as pending attachments.
    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "attachment".to_string());
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        self.state.push_status(format!("Attached {}", name));
                        self.input.attach_file(name, bytes);
                    }
                    Err(e) => {
                        let ts = Local::now().format("%H:%M:%S").to_string();
                        self.state
                            .log_diagnostic(format!("[{}] failed to read {}: {}", ts, name, e));
                        self.state.push_status(format!("Could not attach {}", name));
                    }
                }
            } else if let Some(bytes) = file.bytes {
                self.state.push_status(format!("Attached {}", file.name));
                self.input.attach_file(file.name, bytes.to_vec());
            }
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = if self.theme == "dark" { "light".into() } else { "dark".into() };
        match self.theme.as_str() {
            "dark" => ctx.set_visuals(egui::Visuals::dark()),
            _ => ctx.set_visuals(egui::Visuals::light()),
        }
    }
}

/// Build the user-visible message content, appending the attachment
/// summary line when files ride along.
fn compose_user_content(text: &str, files: &[PendingAttachment]) -> String {
    if files.is_empty() {
        return text.to_string();
    }
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    let summary = format!("📎 Attached files: {}", names.join(", "));
    if text.is_empty() {
        summary
    } else {
        format!("{}\n\n{}", text, summary)
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain backend events and window file drops
        process_events(&self.event_rx, &mut self.state);
        self.collect_dropped_files(ctx);

        // Advance the typewriter for the latest bot message
        let now = Instant::now();
        let latest_bot = self
            .state
            .conversation
            .latest_bot()
            .map(|m| (m.id, m.formatted.as_str()));
        self.reveal.sync(latest_bot, now);
        self.reveal.tick(now);

        if self.reveal.is_revealing() {
            ctx.request_repaint_after(REVEAL_CHAR_INTERVAL);
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }

        self.state.purge_old_status_messages(STATUS_TOAST_SECS);
        let theme = self.chat_theme();

        // Header
        let mut header_action = None;
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme.header_bg)
                    .inner_margin(egui::Margin::symmetric(8, 8)),
            )
            .show(ctx, |ui| {
                header_action = ui::render_header(ui, &theme);
            });
        match header_action {
            Some(ui::HeaderAction::ClearConversation) => {
                self.state.conversation.clear();
                self.state.push_status("Conversation cleared".into());
            }
            Some(ui::HeaderAction::ToggleDiagnostics) => {
                self.show_diagnostics = !self.show_diagnostics;
            }
            Some(ui::HeaderAction::ToggleTheme) => self.toggle_theme(ctx),
            None => {}
        }

        // Input panel
        let mut submission = None;
        egui::TopBottomPanel::bottom("input_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            submission = ui::render_input(ui, &theme, &mut self.input, self.state.is_loading);
            ui.add_space(4.0);
        });
        if let Some(sub) = submission {
            self.send_message(sub.text, sub.files);
        }

        // Conversation
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.app_bg)
                    .inner_margin(egui::Margin::symmetric(10, 8)),
            )
            .show(ctx, |ui| {
                ui::render_messages(
                    ui,
                    &theme,
                    &self.state.conversation,
                    &self.reveal,
                    self.state.is_loading,
                );
            });

        // Diagnostics window
        if self.show_diagnostics {
            let mut open = true;
            egui::Window::new("Diagnostics")
                .open(&mut open)
                .default_width(380.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if self.state.system_log.is_empty() {
                            ui.label("No diagnostics recorded.");
                        }
                        for line in &self.state.system_log {
                            ui.label(egui::RichText::new(line).monospace().size(11.0));
                        }
                    });
                });
            self.show_diagnostics = open;
        }

        // Status toasts
        if !self.state.status_messages.is_empty() {
            egui::Area::new(egui::Id::new("status_toasts"))
                .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -52.0))
                .show(ctx, |ui| {
                    for (text, _) in &self.state.status_messages {
                        egui::Frame::new()
                            .fill(theme.code_header_bg)
                            .corner_radius(egui::CornerRadius::same(6))
                            .inner_margin(egui::Margin::symmetric(10, 6))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(text)
                                        .size(12.0)
                                        .color(theme.code_header_text),
                                );
                            });
                    }
                });
        }
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        let _ = self.action_tx.send(BackendAction::Shutdown);
        // Persist settings on exit
        let settings = Settings {
            api_base_url: self.api_base.clone(),
            theme: self.theme.clone(),
            history: self.input.history.clone(),
        };
        if let Err(e) = save_settings(&settings) {
            eprintln!("Failed to save settings: {}", e);
        }
    }
}
