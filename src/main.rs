mod config;
mod error;
mod fuzzy;
mod histogram;
mod metadata;
mod movie;
mod query;
mod shell;
mod stats;
mod storage;
mod theme;
mod website;

use std::io;

use log::info;

use metadata::MetadataFetcher;
use shell::Shell;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    let config_path = config::config_file_path();
    let config = config::load_or_create(&config_path);

    let storage = storage::open_storage(&config.storage)?;

    let fetcher = if config.metadata.api_key.is_empty() {
        info!("No metadata API key configured. The add command uses manual entry.");
        None
    } else {
        Some(MetadataFetcher::new(&config.metadata))
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(
        stdin.lock(),
        stdout.lock(),
        storage,
        fetcher,
        config.website.clone(),
        config.histogram,
    );
    shell.run()?;
    Ok(())
}
