use eframe::egui;

use chatbubble::app::ChatApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AI Assistant",
        options,
        Box::new(|cc| Ok(Box::new(ChatApp::new(cc)))),
    )
}
