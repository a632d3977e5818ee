//! Color themes and styling for the chat widget.

use eframe::egui::{self, Color32};

/// Semantic colors for the chat surfaces and bubbles.
#[derive(Debug, Clone, Copy)]
pub struct ChatTheme {
    pub app_bg: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub user_bubble: Color32,
    pub user_text: Color32,
    pub bot_bubble: Color32,
    pub bot_text: Color32,
    pub bubble_border: Color32,
    pub code_bg: Color32,
    pub code_header_bg: Color32,
    pub code_header_text: Color32,
    pub code_text: Color32,
    pub inline_code_bg: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub online: Color32,
    pub cursor: Color32,
}

impl ChatTheme {
    pub fn light() -> Self {
        Self {
            app_bg: Color32::from_rgb(249, 250, 251),
            header_bg: Color32::from_rgb(37, 99, 235),
            header_text: Color32::WHITE,
            user_bubble: Color32::from_rgb(59, 130, 246),
            user_text: Color32::WHITE,
            bot_bubble: Color32::WHITE,
            bot_text: Color32::from_rgb(31, 41, 55),
            bubble_border: Color32::from_rgb(229, 231, 235),
            code_bg: Color32::from_rgb(17, 24, 39),
            code_header_bg: Color32::from_rgb(31, 41, 55),
            code_header_text: Color32::from_rgb(209, 213, 219),
            code_text: Color32::from_rgb(243, 244, 246),
            inline_code_bg: Color32::from_rgb(229, 231, 235),
            text_muted: Color32::from_rgb(107, 114, 128),
            accent: Color32::from_rgb(37, 99, 235),
            online: Color32::from_rgb(74, 222, 128),
            cursor: Color32::from_rgb(156, 163, 175),
        }
    }

    pub fn dark() -> Self {
        Self {
            app_bg: Color32::from_rgb(24, 26, 31),
            header_bg: Color32::from_rgb(30, 58, 138),
            header_text: Color32::WHITE,
            user_bubble: Color32::from_rgb(37, 99, 235),
            user_text: Color32::WHITE,
            bot_bubble: Color32::from_rgb(39, 42, 50),
            bot_text: Color32::from_rgb(229, 231, 235),
            bubble_border: Color32::from_rgb(55, 58, 66),
            code_bg: Color32::from_rgb(13, 17, 23),
            code_header_bg: Color32::from_rgb(30, 34, 42),
            code_header_text: Color32::from_rgb(148, 155, 164),
            code_text: Color32::from_rgb(230, 237, 243),
            inline_code_bg: Color32::from_rgb(55, 58, 66),
            text_muted: Color32::from_rgb(148, 155, 164),
            accent: Color32::from_rgb(96, 165, 250),
            online: Color32::from_rgb(74, 222, 128),
            cursor: Color32::from_rgb(148, 155, 164),
        }
    }
}

/// Apply global spacing and widget styling.
pub fn apply_app_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.window_margin = egui::Margin::same(12);

    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);

    ctx.set_style(style);
}
