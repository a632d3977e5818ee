//! Message rendering for the central chat panel.
//!
//! Bot messages render whatever prefix of their formatted string the
//! reveal scheduler has disclosed so far; everything else renders its
//! cached formatted string in full.

use eframe::egui::{self, Color32, RichText};

use crate::markup::{self, Segment};
use crate::message::{ChatMessage, Conversation, Sender};
use crate::reveal::RevealScheduler;
use crate::ui::theme::ChatTheme;

/// Render the scrollable conversation area.
pub fn render_messages(
    ui: &mut egui::Ui,
    theme: &ChatTheme,
    conversation: &Conversation,
    reveal: &RevealScheduler,
    is_loading: bool,
) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if conversation.is_empty() && !is_loading {
                render_welcome(ui, theme);
                return;
            }

            for msg in conversation.messages() {
                render_bubble(ui, theme, msg, reveal);
                ui.add_space(6.0);
            }

            if is_loading {
                render_thinking_row(ui, theme);
            }
        });
}

fn render_welcome(ui: &mut egui::Ui, theme: &ChatTheme) {
    ui.add_space(ui.available_height() * 0.3);
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new("Welcome to AI Assistant").color(theme.bot_text));
        ui.add_space(6.0);
        ui.label(
            RichText::new(
                "Start a conversation by typing a message below. \
                 You can also drop files onto the window to attach them.",
            )
            .color(theme.text_muted),
        );
    });
}

fn render_bubble(ui: &mut egui::Ui, theme: &ChatTheme, msg: &ChatMessage, reveal: &RevealScheduler) {
    let is_user = msg.sender == Sender::User;

    // The latest bot message may still be typing; render its current
    // prefix. Everyone else gets the full cached string.
    let (visible, show_cursor) = match reveal.session_for(msg.id) {
        Some(session) => (session.visible_prefix(), session.is_revealing),
        None => (msg.formatted.clone(), false),
    };

    let layout = if is_user {
        egui::Layout::right_to_left(egui::Align::Min)
    } else {
        egui::Layout::left_to_right(egui::Align::Min)
    };

    ui.with_layout(layout, |ui| {
        render_avatar(ui, theme, msg.sender);

        let max_bubble = ui.available_width() * 0.85;
        let (fill, text_color) = if is_user {
            (theme.user_bubble, theme.user_text)
        } else {
            (theme.bot_bubble, theme.bot_text)
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(egui::Stroke::new(1.0, theme.bubble_border))
            .corner_radius(egui::CornerRadius::same(12))
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.set_max_width(max_bubble);
                render_markup(ui, theme, &visible, text_color, show_cursor);
            });
    });
}

fn render_avatar(ui: &mut egui::Ui, theme: &ChatTheme, sender: Sender) {
    let (label, color) = match sender {
        Sender::User => ("You", theme.user_bubble),
        Sender::Bot => ("AI", theme.online),
    };
    let (rect, _) = ui.allocate_exact_size(egui::vec2(26.0, 26.0), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), 13.0, color);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(10.0),
        Color32::WHITE,
    );
}

fn render_thinking_row(ui: &mut egui::Ui, theme: &ChatTheme) {
    ui.with_layout(egui::Layout::left_to_right(egui::Align::Min), |ui| {
        render_avatar(ui, theme, Sender::Bot);
        egui::Frame::new()
            .fill(theme.bot_bubble)
            .stroke(egui::Stroke::new(1.0, theme.bubble_border))
            .corner_radius(egui::CornerRadius::same(12))
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.add(egui::Spinner::new().size(14.0));
                ui.label(RichText::new("Thinking...").color(theme.text_muted).size(12.0));
            });
    });
}

/// One displayable row of a message body.
enum Row {
    /// A wrapped line of plain text and inline code pieces.
    Line(Vec<Piece>),
    /// A fenced code block.
    Block { lang: String, body: String },
}

struct Piece {
    text: String,
    kind: PieceKind,
}

#[derive(Clone, Copy)]
enum PieceKind {
    Plain,
    Code,
    Cursor,
}

/// Render a formatted marker string (or a reveal prefix of one).
fn render_markup(
    ui: &mut egui::Ui,
    theme: &ChatTheme,
    formatted: &str,
    text_color: Color32,
    show_cursor: bool,
) {
    let mut rows = layout_rows(markup::parse_segments(formatted));

    if show_cursor && cursor_on(ui) {
        let piece = Piece { text: "\u{258C}".into(), kind: PieceKind::Cursor };
        match rows.last_mut() {
            Some(Row::Line(pieces)) => pieces.push(piece),
            _ => rows.push(Row::Line(vec![piece])),
        }
    }

    for row in &rows {
        match row {
            Row::Line(pieces) if pieces.is_empty() => ui.add_space(6.0),
            Row::Line(pieces) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for piece in pieces {
                        match piece.kind {
                            PieceKind::Code => {
                                ui.label(
                                    RichText::new(&piece.text)
                                        .monospace()
                                        .color(text_color)
                                        .background_color(theme.inline_code_bg),
                                );
                            }
                            PieceKind::Cursor => {
                                ui.label(RichText::new(&piece.text).color(theme.cursor));
                            }
                            PieceKind::Plain => {
                                ui.label(RichText::new(&piece.text).color(text_color));
                            }
                        }
                    }
                });
            }
            Row::Block { lang, body } => render_code_block(ui, theme, lang, body),
        }
    }
}

fn render_code_block(ui: &mut egui::Ui, theme: &ChatTheme, lang: &str, body: &str) {
    egui::Frame::new()
        .fill(theme.code_bg)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(0))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                egui::Frame::new()
                    .fill(theme.code_header_bg)
                    .inner_margin(egui::Margin::symmetric(10, 4))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(lang)
                                .monospace()
                                .size(11.0)
                                .color(theme.code_header_text),
                        );
                    });
                egui::Frame::new()
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.label(RichText::new(body).monospace().color(theme.code_text));
                    });
            });
        });
}

/// Split parsed segments into renderable rows.
fn layout_rows(segments: Vec<Segment>) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut line: Vec<Piece> = Vec::new();

    for segment in segments {
        match segment {
            Segment::CodeBlock { lang, body } => {
                if !line.is_empty() {
                    rows.push(Row::Line(std::mem::take(&mut line)));
                }
                rows.push(Row::Block { lang, body });
            }
            Segment::Text(text) => push_multiline(&mut rows, &mut line, &text, PieceKind::Plain),
            Segment::InlineCode(body) => {
                push_multiline(&mut rows, &mut line, &body, PieceKind::Code)
            }
        }
    }

    if !line.is_empty() {
        rows.push(Row::Line(line));
    }
    rows
}

fn push_multiline(rows: &mut Vec<Row>, line: &mut Vec<Piece>, text: &str, kind: PieceKind) {
    let mut parts = text.split('\n').peekable();
    while let Some(part) = parts.next() {
        if !part.is_empty() {
            line.push(Piece { text: part.to_string(), kind });
        }
        if parts.peek().is_some() {
            rows.push(Row::Line(std::mem::take(line)));
        }
    }
}

/// Half-second blink phase for the typing cursor.
fn cursor_on(ui: &egui::Ui) -> bool {
    ui.input(|i| i.time).rem_euclid(1.0) < 0.5
}
