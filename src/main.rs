#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use instatoon_storyboard::{console, core::config::Config};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            eprintln!("Please check that 'config.yml' is valid YAML.");
            return Err(e);
        }
    };

    config.ensure_directories()?;
    log::info!("Using backend at {}", config.api.base_url);

    console::run(&config).await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    instatoon_storyboard::start();
}
