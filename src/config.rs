use log::Level;
use serde::Deserialize;
use thiserror::Error;
use web_sys::Document;

/// Id of the inline `<script type="application/json">` island a page can
/// use to override any subset of the settings below.
pub const SETTINGS_ISLAND_ID: &str = "site-settings";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings island is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no document available")]
    MissingDocument,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub forms: FormSettings,
    pub reveal: RevealSettings,
    pub counters: CounterSettings,
    pub scroll_spy: SpySettings,
    pub chrome: ChromeSettings,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
    pub debounce_ms: u32,
    pub submit_delay_ms: u32,
    pub redirect_to: String,
    pub busy_label: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            submit_delay_ms: 1500,
            redirect_to: "thank_you.html".to_string(),
            busy_label: "Wird gesendet...".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealSettings {
    pub selectors: Vec<String>,
    pub threshold: f64,
    pub root_margin: String,
    pub stagger_secs: f64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            selectors: [
                ".benefit-card",
                ".category-card",
                ".card",
                ".c-service-card",
                ".c-location-card",
                ".c-quick-link",
                ".accordion-item",
                ".form-container",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            stagger_secs: 0.1,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterSettings {
    pub duration_ms: u32,
    pub frame_ms: u32,
    pub threshold: f64,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_ms: 16,
            threshold: 0.5,
        }
    }
}

/// How the scroll-spy picks the highlighted section when several
/// sections intersect at once.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpyStrategy {
    /// Highest intersection ratio wins, ties go to the earlier section.
    #[default]
    Ranked,
    /// Whatever intersecting entry came last in the callback batch wins.
    LastWins,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpySettings {
    pub threshold: f64,
    pub strategy: SpyStrategy,
}

impl Default for SpySettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            strategy: SpyStrategy::Ranked,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChromeSettings {
    pub scroll_top_after: f64,
    pub header_shrink_after: f64,
    pub scroll_throttle_ms: u32,
    pub resize_throttle_ms: u32,
    pub menu_breakpoint: f64,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            scroll_top_after: 300.0,
            header_shrink_after: 50.0,
            scroll_throttle_ms: 100,
            resize_throttle_ms: 200,
            menu_breakpoint: 768.0,
        }
    }
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the settings island from the page. A page without one gets
    /// the defaults.
    pub fn from_document(document: Option<&Document>) -> Result<Self, ConfigError> {
        let document = document.ok_or(ConfigError::MissingDocument)?;
        match document.get_element_by_id(SETTINGS_ISLAND_ID) {
            Some(island) => {
                let raw = island.text_content().unwrap_or_default();
                if raw.trim().is_empty() {
                    return Ok(Self::default());
                }
                Self::from_json(&raw)
            }
            None => Ok(Self::default()),
        }
    }
}
