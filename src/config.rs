// src/config.rs

use crate::error::ConfigError;
use crate::export::DEFAULT_FILENAME;
use crate::model::{InitialContext, WidgetIdentity};
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
const HANDLER_BASE_ENV: &str = "FREE_TEXT_RESPONSE_HANDLER_BASE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Labels {
    pub submit: String,
    pub submit_checking: String,
    pub save: String,
    pub save_checking: String,
    pub hide_responses: String,
    pub show_responses: String,
    pub export: String,
    pub no_responses: String,
    pub table_header: Vec<String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            submit: "Submit".into(),
            submit_checking: "Checking...".into(),
            save: "Save".into(),
            save_checking: "Saving...".into(),
            hide_responses: "Hide responses".into(),
            show_responses: "Show responses".into(),
            export: "Download responses".into(),
            no_responses: "No responses yet".into(),
            table_header: vec!["#".into(), "Email".into(), "Answer".into()],
        }
    }
}

/// Una pregunta dentro de la secuencia.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitConfig {
    pub usage_id: WidgetIdentity,
    pub display_name: String,
    pub prompt: String,
    #[serde(default)]
    pub initial: InitialContext,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageConfig {
    pub handler_base: String,
    #[serde(default = "default_filename")]
    pub export_filename: String,
    #[serde(default)]
    pub labels: Labels,
    pub units: Vec<UnitConfig>,
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

impl PageConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_yaml::from_str(text)?;
        if config.units.is_empty() {
            return Err(ConfigError::NoUnits);
        }
        Ok(config)
    }

    /// El host puede sobreescribir la base de los handlers.
    pub fn with_host_overrides(mut self) -> Self {
        if let Some(base) = handler_base_override() {
            log::info!("handler_base sobreescrito por el host: {base}");
            self.handler_base = base;
        }
        self
    }
}

/// Carga la página embebida en el binario.
pub fn read_page_embedded() -> Result<PageConfig, ConfigError> {
    let file_content = include_str!("data/widgets.yaml");
    PageConfig::from_yaml(file_content)
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn handler_base_override() -> Option<String> {
    std::env::var(HANDLER_BASE_ENV)
        .ok()
        .and_then(|v| normalize(&v))
}

#[cfg(target_arch = "wasm32")]
fn handler_base_override() -> Option<String> {
    option_env!("FREE_TEXT_RESPONSE_HANDLER_BASE")
        .and_then(normalize)
        .or_else(handler_base_from_querystring)
        .or_else(handler_base_from_meta)
}

#[cfg(target_arch = "wasm32")]
fn handler_base_from_querystring() -> Option<String> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    let query = search.strip_prefix('?').unwrap_or(search.as_str());

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "handler_base" {
            let decoded = js_sys::decode_uri_component(value).ok()?;
            return normalize(&decoded.as_string()?);
        }
    }
    None
}

#[cfg(target_arch = "wasm32")]
fn handler_base_from_meta() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document
        .query_selector("meta[name='free-text-response-handler-base']")
        .ok()??;
    meta.get_attribute("content").as_deref().and_then(normalize)
}
