mod api;
mod folder;
mod images;
mod mapping;
mod seed;
mod supabase;
mod types;

use env_logger::Env;
use log::{error, info};
use std::env;

#[macro_use]
extern crate failure;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if env::args().nth(1).as_deref() == Some("seed") {
        if let Err(e) = seed::run().await {
            error!("Seeding failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    info!("Starting truck-listings");
    api::run().await;
    info!("Exiting main");
}
