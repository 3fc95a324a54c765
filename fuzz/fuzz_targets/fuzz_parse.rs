#![no_main]

//! Fuzz target for raw document input
//!
//! Feeds arbitrary bytes through JSON parsing and the configuration loader.

use container_config::{ArrayConfiguration, Bindings, Configuration, ConfigError};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    match ArrayConfiguration::new(Arc::new(Bindings::new()), "fuzz.json", document.clone()).entry() {
        Ok(entry) => {
            let _ = entry.factories();
            assert!(document.is_object());
        }
        Err(ConfigError::NotAnObject { .. }) => assert!(!document.is_object()),
        Err(error) => assert!(error.to_string().contains("fuzz.json")),
    }
});
