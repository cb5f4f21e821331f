use easy_bbox::app::{AnnotatorApp, FatalSlot};
use easy_bbox::config::AnnotatorConfig;
use easy_bbox::{logging, AnnotatorError};
use eframe::egui;

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<(), AnnotatorError> {
    logging::setup_logger();

    let config = AnnotatorConfig::default();
    let title = config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title(&title),
        ..Default::default()
    };

    let fatal = FatalSlot::default();
    let slot = fatal.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, config, slot)))),
    )?;

    // Errors raised inside the event loop close the window and end up here.
    match fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
