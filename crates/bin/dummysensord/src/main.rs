//! # dummysensord
//!
//! Composition root that wires the file store, the accessories and the
//! console host adapter together.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Open the durable state store
//! - Build one accessory per configured entry and register it
//! - Serve console commands until stdin closes or Ctrl-C
//! - Cancel pending sensor transitions on shutdown
//!
//! No accessory logic belongs here.

mod config;
mod console;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dummysensor_adapter_storage_file::{Config as StoreConfig, FileStateStore};
use dummysensor_app::notifier::InProcessNotifier;
use dummysensor_app::services::accessory::Accessory;
use dummysensor_app::services::registry::AccessoryRegistry;
use dummysensor_app::services::sensor_switch::SensorSwitch;

use crate::config::Config;

type Controller = SensorSwitch<FileStateStore, InProcessNotifier>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let store = StoreConfig {
        dir: config.storage.path.clone(),
        forgive_parse_errors: config.storage.forgive_parse_errors,
    }
    .build()?;
    let store = Arc::new(store);

    let notifier = Arc::new(InProcessNotifier::new(256));
    // Subscribe first so the initial switch announcements reach the console.
    let events = notifier.subscribe();

    let mut registry: AccessoryRegistry<Controller> = AccessoryRegistry::new();
    for accessory in &config.accessories {
        let controller =
            SensorSwitch::from_config(accessory, Arc::clone(&store), Arc::clone(&notifier))?;
        registry.register(Accessory::new(controller))?;
    }

    if registry.is_empty() {
        tracing::warn!("no accessories configured");
    }
    tracing::info!(
        accessories = registry.len(),
        storage = %config.storage.path.display(),
        "dummysensord ready"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = console::run(&registry, events, stdin, stdout) => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("interrupted");
        }
    }

    registry.shutdown();
    Ok(())
}
