use eframe::egui;

use touchplot::ViewerApp;

fn main() -> eframe::Result<()> {
    let files: Vec<std::path::PathBuf> = std::env::args().skip(1).map(Into::into).collect();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_drag_and_drop(true)
            .with_title("touchplot"),
        ..Default::default()
    };
    eframe::run_native(
        "touchplot",
        options,
        Box::new(move |cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            let mut app = ViewerApp::new(cc);
            app.open_files(files.clone());
            Ok(Box::new(app))
        }),
    )
}
