#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod dates;
mod error;
mod export;
mod fetch;
mod parse;
mod scrape_timetable;

use crate::{config::Config, fetch::Session};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::info!(
        "scraping {} ({}) as {}",
        config.group,
        config.faculty.as_deref().unwrap_or("all faculties"),
        config.output
    );

    let session = Session::connect(&config.webdriver_url, config.headless).await?;
    let today = chrono::Local::now().date_naive();
    let result = scrape_timetable::scrape(&session, &config, today).await;
    if let Err(e) = session.close().await {
        log::warn!("Error while closing webdriver session: {e}");
    }

    let path = result?;
    println!("{}", path.display());
    Ok(())
}
