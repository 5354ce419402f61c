use std::sync::Arc;

use productos::config::{self, AppState, Config};
use productos::logger;
use productos::server::{signal, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&cfg));
    let server = Server::bind(state)?;
    logger::log_server_start(&server.local_addr()?, &cfg);

    server
        .run(async {
            let name = signal::shutdown_signal().await;
            logger::log_shutdown_requested(name);
        })
        .await;

    Ok(())
}
