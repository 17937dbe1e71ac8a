//! Configuration management for the Amnesia editor

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{EditorError, Result};
use crate::geometry::ViewportBudget;
use crate::raster::DEFAULT_MAX_SURFACE_PIXELS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub viewport: ViewportConfig,
    pub render_service: RenderServiceConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewportConfig {
    pub max_width: f64,
    pub max_height: f64,
    pub max_surface_pixels: u64,
}

impl ViewportConfig {
    pub fn budget(&self) -> ViewportBudget {
        ViewportBudget {
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderServiceConfig {
    pub base_url: String,
    pub edit_path: String,
    pub health_path: String,
    pub timeout_secs: u64,
    /// File name sent with the document part
    pub document_file_name: String,
}

impl RenderServiceConfig {
    pub fn edit_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.edit_path)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.health_path)
    }
}

/// What a page load does when the text stream cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionPolicy {
    /// Fail the whole load
    #[default]
    Fail,
    /// Publish the background with no editable objects
    BackgroundOnly,
}

impl FromStr for ExtractionPolicy {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(ExtractionPolicy::Fail),
            "background-only" | "background_only" => Ok(ExtractionPolicy::BackgroundOnly),
            other => Err(EditorError::Config(format!(
                "unknown extraction policy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionPolicy::Fail => write!(f, "fail"),
            ExtractionPolicy::BackgroundOnly => write!(f, "background-only"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub extraction_policy: ExtractionPolicy,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        let budget = ViewportBudget::default();
        ViewportConfig {
            max_width: budget.max_width,
            max_height: budget.max_height,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

impl Default for RenderServiceConfig {
    fn default() -> Self {
        RenderServiceConfig {
            base_url: "http://localhost:8080".to_string(),
            edit_path: "/api/pdf/edit".to_string(),
            health_path: "/api/pdf/health".to_string(),
            timeout_secs: 60,
            document_file_name: "document.pdf".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            viewport: ViewportConfig::default(),
            render_service: RenderServiceConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable numbers keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let number = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(default)
        };

        Ok(Config {
            viewport: ViewportConfig {
                max_width: number("EDITOR_VIEWPORT_MAX_WIDTH", defaults.viewport.max_width),
                max_height: number("EDITOR_VIEWPORT_MAX_HEIGHT", defaults.viewport.max_height),
                max_surface_pixels: lookup("EDITOR_MAX_SURFACE_PIXELS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.viewport.max_surface_pixels),
            },
            render_service: RenderServiceConfig {
                base_url: lookup("RENDER_SERVICE_URL")
                    .unwrap_or_else(|| defaults.render_service.base_url.clone()),
                timeout_secs: lookup("RENDER_SERVICE_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.render_service.timeout_secs),
                ..defaults.render_service
            },
            session: SessionConfig {
                extraction_policy: match lookup("EDITOR_EXTRACTION_POLICY") {
                    Some(v) => v.parse()?,
                    None => ExtractionPolicy::default(),
                },
            },
        })
    }
}
