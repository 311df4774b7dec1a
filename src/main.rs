#![warn(clippy::all, rust_2018_idioms)]

use clap::Parser;
use eframe_annotator::{AnnotatorApp, Cli};

const WINDOW_TITLE: &str = "Image Annotator";

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, cli)))),
    )
}
