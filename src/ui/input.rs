//! Message input panel: compose field, attachment chips, send button.

use eframe::egui::{self, RichText};

use crate::input_state::{InputState, PendingAttachment};
use crate::ui::theme::ChatTheme;
use crate::validation;

/// A completed send request from the input panel.
#[derive(Debug)]
pub struct Submission {
    pub text: String,
    pub files: Vec<PendingAttachment>,
}

/// Render the bottom input panel. Returns a submission when the user
/// sends. The whole panel is disabled while a request is outstanding,
/// so sends can never overlap.
pub fn render_input(
    ui: &mut egui::Ui,
    theme: &ChatTheme,
    input: &mut InputState,
    is_loading: bool,
) -> Option<Submission> {
    let mut submitted = false;

    // Attachment chips above the compose row
    if !input.pending_files.is_empty() {
        let mut remove: Option<usize> = None;
        ui.horizontal_wrapped(|ui| {
            for (idx, file) in input.pending_files.iter().enumerate() {
                egui::Frame::new()
                    .fill(theme.inline_code_bg)
                    .corner_radius(egui::CornerRadius::same(10))
                    .inner_margin(egui::Margin::symmetric(8, 2))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(format!("📎 {}", file.name))
                                .size(11.0)
                                .color(theme.bot_text),
                        );
                        if ui.small_button("✕").clicked() {
                            remove = Some(idx);
                        }
                    });
            }
        });
        if let Some(idx) = remove {
            input.remove_attachment(idx);
        }
    }

    ui.horizontal(|ui| {
        let compose = ui.add_enabled(
            !is_loading,
            egui::TextEdit::singleline(&mut input.message_input)
                .desired_width(ui.available_width() - 70.0)
                .hint_text("Type your message..."),
        );

        // Up/Down recall previously sent messages
        if compose.has_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                input.history_prev();
            }
            if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                input.history_next();
            }
        }

        let can_submit = !is_loading
            && validation::validate_outbound(&input.message_input, !input.pending_files.is_empty())
                .is_ok();

        let send_clicked = ui
            .add_enabled(can_submit, egui::Button::new(if is_loading { "..." } else { "Send" }))
            .clicked();
        let enter_pressed =
            compose.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if (send_clicked || (enter_pressed && can_submit)) && !is_loading {
            submitted = true;
            compose.request_focus();
        }
    });

    if submitted {
        let (text, files) = input.take_submission();
        if !text.is_empty() {
            input.push_history(&text);
        }
        Some(Submission { text, files })
    } else {
        None
    }
}
