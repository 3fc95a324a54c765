//! Logging of configuration loading
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use container_config::{
    ArrayConfiguration, Bindings, Configuration, Container, FactoryContainer, MergedConfiguration,
    ParameterArray, ValueFactory,
};
use serde_json::json;
use std::sync::Arc;

fn main() {
    // Trace level shows every pass and resolution
    container_config::logging::builder()
        .trace()
        .config_only()
        .init();

    println!("=== Configuration Logging Demo ===\n");

    let bindings = Arc::new(Bindings::new());

    // Logs: "Configuration entry built"
    let merged = MergedConfiguration::default()
        .with(ArrayConfiguration::new(
            Arc::clone(&bindings),
            "services.json",
            json!({
                "aliases": { "database": "db.url" },
                "tags": { "urls": ["db.url", "cache.url"] }
            }),
        ))
        .with(ParameterArray::new(
            ValueFactory::default(),
            [
                ("db.url", json!("postgres://localhost/app")),
                ("cache.url", json!("redis://localhost")),
            ],
        ));

    // Logs: "Configuration sources merged", then "Applying processing passes"
    let entry = merged.entry().expect("valid configuration");
    let container = FactoryContainer::new(entry.factories());

    // Logs: "Invoking factory" for each entry, then cache hits
    println!("database: {:?}", container.get("database"));
    println!("urls: {:?}", container.get("urls"));
    println!("database again: {:?}", container.get("database"));

    // Missing entries fail with NotFound
    println!("missing: {:?}", container.get("missing"));

    println!("\n=== Demo Complete ===");
}
