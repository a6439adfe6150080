use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vacuum_app::{config::DemoConfig, demo};

fn main() {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Vacuum demo starting");
    let config = match std::env::args().nth(1) {
        Some(path) => match DemoConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(%path, "failed to load config: {e}");
                std::process::exit(1);
            }
        },
        None => DemoConfig::default(),
    };

    match demo::run(&config) {
        Ok(report) => info!(?report, "Vacuum demo finished"),
        Err(e) => {
            error!("Vacuum demo error: {e}");
            std::process::exit(1);
        }
    }
}
