// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine
//
// Attributes a group's shared score stream to the individual actors whose
// timed scoring actions plausibly produced each increment.

pub mod types;
pub mod config;
pub mod adapter;
pub mod periods;
pub mod windows;
pub mod exclusivity;
pub mod aggregator;
pub mod fallback;
pub mod precise;
pub mod conservation;
pub mod strategy;
pub mod store;

pub use types::*;
pub use config::{ConfigError, DelayModel, EngineConfig, MatchClock};
pub use strategy::{attribute_match, select_method, AttributionReport};
pub use store::{calculate_match, FetchError, InMemoryStore, RecordStore};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser entry point. The front-end performs its own store reads and
/// hands the materialised records over as a `MatchInputs` object.
#[wasm_bindgen]
pub struct AttributionEngine {
    config: EngineConfig,
}

#[wasm_bindgen]
impl AttributionEngine {
    /// `config` may be `undefined`/`null` for the canonical defaults, or a
    /// partial object overriding individual fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AttributionEngine, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { config })
    }

    pub fn attribute(&self, inputs: JsValue) -> Result<JsValue, JsValue> {
        let inputs: MatchInputs = serde_wasm_bindgen::from_value(inputs)?;
        let report = attribute_match(&inputs, &self.config);
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    #[wasm_bindgen(js_name = config)]
    pub fn config_js(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.config).unwrap_or(JsValue::NULL)
    }
}

impl AttributionEngine {
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Native counterpart of [`attribute`](Self::attribute).
    pub fn attribute_inputs(&self, inputs: &MatchInputs) -> AttributionReport {
        attribute_match(inputs, &self.config)
    }
}
