mod app;
mod state;
mod worker;

use clap::Parser;
use eframe::{run_native, AppCreator, NativeOptions};
use prodstock_client::ProductClientArgs;
use tracing::{error, info};

use crate::app::ProductApp;

fn main() {
    ::prodstock_core::tracer::init_once();
    info!("Welcome to prodstock ui!");

    let args = ProductClientArgs::parse();

    let app_name = "prodstock";
    let native_options = NativeOptions::default();
    let app_creator: AppCreator = Box::new(move |cc| Box::new(ProductApp::new(args, cc)));

    match run_native(app_name, native_options, app_creator) {
        Ok(()) => info!("Completed prodstock ui"),
        Err(error) => error!("failed to operate the ui: {error}"),
    }
}
