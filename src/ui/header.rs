//! Title bar: assistant identity, online indicator, and a few controls.

use eframe::egui::{self, Color32, RichText};

use crate::ui::theme::ChatTheme;

/// Actions the header can request from the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    ClearConversation,
    ToggleDiagnostics,
    ToggleTheme,
}

/// Render the header bar. Returns an action if a control was clicked.
pub fn render_header(ui: &mut egui::Ui, theme: &ChatTheme) -> Option<HeaderAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.add_space(4.0);

        // Bot badge
        let (rect, _) = ui.allocate_exact_size(egui::vec2(30.0, 30.0), egui::Sense::hover());
        ui.painter()
            .circle_filled(rect.center(), 15.0, Color32::from_white_alpha(40));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "AI",
            egui::FontId::proportional(12.0),
            theme.header_text,
        );

        ui.vertical(|ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            ui.label(
                RichText::new("AI Assistant")
                    .strong()
                    .size(15.0)
                    .color(theme.header_text),
            );
            ui.label(
                RichText::new("Always here to help")
                    .size(11.0)
                    .color(theme.header_text.gamma_multiply(0.8)),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(4.0);

            // Online dot
            let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(dot.center(), 5.0, theme.online);

            if ui.small_button("Clear").clicked() {
                action = Some(HeaderAction::ClearConversation);
            }
            if ui.small_button("Log").clicked() {
                action = Some(HeaderAction::ToggleDiagnostics);
            }
            if ui.small_button("Theme").clicked() {
                action = Some(HeaderAction::ToggleTheme);
            }
        });
    });

    action
}
