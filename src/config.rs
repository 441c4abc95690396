use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Upstream sort order forwarded verbatim to the backend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Newest,
    Oldest,
    Best,
    Worst,
}

impl Sort {
    /// Parse an attribute value, falling back to the default on anything
    /// unrecognized; the embed must never refuse to mount over a typo.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "newest" => Sort::Newest,
            "oldest" => Sort::Oldest,
            "best" => Sort::Best,
            "worst" => Sort::Worst,
            _ => Sort::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Newest => "newest",
            Sort::Oldest => "oldest",
            Sort::Best => "best",
            Sort::Worst => "worst",
        }
    }
}

/// Requested theme; `System` defers to the host color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Light,
    #[default]
    Dark,
    System,
}

impl ThemeSetting {
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "light" => ThemeSetting::Light,
            "dark" => ThemeSetting::Dark,
            "system" => ThemeSetting::System,
            _ => ThemeSetting::default(),
        }
    }
}

/// Layout variant. Unrecognized values render as `Grid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Design {
    #[default]
    Grid,
    List,
    Carousel,
    Badge,
}

impl Design {
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "grid" => Design::Grid,
            "list" => Design::List,
            "carousel" => Design::Carousel,
            "badge" => Design::Badge,
            _ => Design::default(),
        }
    }
}

/// External configuration contract for one widget mount.
///
/// Comes from script-tag attributes in embed mode, component props in
/// dashboard-preview mode, or a YAML profile for the CLI. At most one of
/// `public_key`/`instance_id` is honored per fetch; with neither set the
/// widget runs in inert placeholder mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub api_base: String,
    pub public_key: Option<String>,
    pub instance_id: Option<String>,
    pub min_rating: f64,
    /// Upstream cap forwarded to the query; distinct from the local
    /// pagination window.
    pub max_reviews: u32,
    pub sort: Sort,
    pub locale: Option<String>,
    pub theme: ThemeSetting,
    pub design: Design,
    /// Host DOM anchor id the embed layer renders into.
    pub target: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            public_key: None,
            instance_id: None,
            min_rating: 4.0,
            max_reviews: 6,
            sort: Sort::default(),
            locale: None,
            theme: ThemeSetting::default(),
            design: Design::default(),
            target: "reviews-widget".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Build a config from script-tag attributes. Keys are accepted with or
    /// without the `data-` prefix; malformed numbers fall back to defaults.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Self {
        let get = |name: &str| -> Option<&str> {
            attrs
                .get(&format!("data-{}", name))
                .or_else(|| attrs.get(name))
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        Self {
            api_base: get("api-base").unwrap_or_default().to_string(),
            public_key: get("instance")
                .or_else(|| get("public-key"))
                .map(String::from),
            instance_id: get("instance-id").map(String::from),
            min_rating: get("min-rating")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_rating),
            max_reviews: get("max-reviews")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_reviews),
            sort: get("sort").map(Sort::parse_or_default).unwrap_or_default(),
            locale: get("locale").map(String::from),
            theme: get("theme")
                .map(ThemeSetting::parse_or_default)
                .unwrap_or_default(),
            design: get("design")
                .map(Design::parse_or_default)
                .unwrap_or_default(),
            target: get("target").unwrap_or(&defaults.target).to_string(),
        }
    }

    /// Load a widget profile from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Profile not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;

        let config: WidgetConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))?;

        info!(path = %path.display(), "Loaded widget profile");

        Ok(config)
    }
}
