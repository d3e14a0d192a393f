use eframe::egui;

mod app;

use app::StudioApp;

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Resonance — Live Text Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(StudioApp::default()))),
    )
    .expect("Failed to start Resonance");
}
