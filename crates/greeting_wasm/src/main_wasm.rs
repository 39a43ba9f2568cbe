#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use confetti::ConfettiConfig;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::console;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Could not decode confetti config: {0}")]
    Decode(#[from] serde_wasm_bindgen::Error),
}

/// Defined in javascript

#[wasm_bindgen(module = "/config.js")]
extern "C" {
    // Bevy owns main, so the page hands over its configuration through this hook instead
    #[allow(unsafe_code, reason = "unsafe code is needed for wasm")]
    fn get_confetti_config() -> JsValue;
}

fn decode_config(value: JsValue) -> Result<ConfettiConfig, ConfigError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ConfettiConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    console::log_1(&"Starting birthday greeting".into());

    let config = decode_config(get_confetti_config()).unwrap_or_else(|error| {
        // Bevy's logger is not up yet
        console::error_1(&format!("{error}, using the default confetti").into());
        ConfettiConfig::default()
    });

    birthday_greeting::run_with(config);
    Ok(())
}
