use monitor_core::{config::Config, logging, Result, TracingSink};
use tracing::{error, info};

mod probe;
mod shutdown;
mod worker;

use crate::probe::IcmpProber;
use crate::worker::Worker;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let config = Config::load()?;
    info!("Starting host monitor with config: {:?}", config);

    let (handle, shutdown) = shutdown::channel();

    tokio::spawn(async move {
        match shutdown::wait_for_signal().await {
            Ok(()) => {
                info!("Shutdown signal received");
                handle.trigger();
            }
            Err(e) => {
                error!("Failed to listen for shutdown signals: {}", e);
                // Keep the handle alive so the worker is not stopped by its drop.
                std::future::pending::<()>().await;
            }
        }
    });

    let worker = Worker::new(config.service, IcmpProber::new(), TracingSink);
    worker.run(shutdown).await;

    Ok(())
}
