//! Relax configuration system
//!
//! This crate provides centralized configuration for the relax engine,
//! loading settings from `relax.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for relax
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelaxConfig {
    /// Compilation and render policy
    pub engine: EngineConfig,
    /// Style properties supported by the target runtime
    pub capabilities: CapabilityConfig,
    /// Demo runner settings
    pub demo: DemoConfig,
}

/// What `render` does when the position sits exactly on a transition's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartBoundary {
    /// Apply the transition's literal start values.
    #[default]
    ApplyStart,
    /// Leave the transition untouched until the position moves past its start.
    Skip,
}

/// How the compiler treats start/end values with different numeric token counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenMismatch {
    /// Fail registration with a configuration error.
    #[default]
    Reject,
    /// Interpolate the common prefix; surplus start tokens render verbatim.
    Truncate,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Easing used when a registration supplies none (linear, ease_in, ease_out, ease_in_out)
    pub default_easing: String,
    /// Behaviour at `position == start`
    pub start_boundary: StartBoundary,
    /// Behaviour on mismatched numeric token counts
    pub token_mismatch: TokenMismatch,
    /// Comma separated diagnostics categories (compile, render, all)
    pub diagnostics: Option<String>,
}

/// Capability table configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CapabilityConfig {
    /// Camel-cased style property names the runtime supports, vendor
    /// prefixed variants included. Empty disables prefix rewriting.
    pub supported_properties: Vec<String>,
}

/// Demo runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Path to a JSON steps document; the built-in sample is used when unset
    pub steps: Option<PathBuf>,
    /// Distance between simulated scroll offsets
    pub sweep_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_easing: "linear".to_string(),
            start_boundary: StartBoundary::ApplyStart,
            token_mismatch: TokenMismatch::Reject,
            diagnostics: None,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            steps: None,
            sweep_step: 25.0,
        }
    }
}

impl EngineConfig {
    /// Whether a diagnostics category is switched on.
    pub fn diagnostics_enabled(&self, category: &str) -> bool {
        let Some(raw) = self.diagnostics.as_deref() else {
            return false;
        };
        raw.split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .any(|s| s == "all" || s == category.to_ascii_lowercase())
    }
}

impl RelaxConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the relax.toml configuration file
    ///
    /// # Returns
    /// * `Ok(RelaxConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (relax.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("relax.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the file value is kept.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Engine settings
        if let Some(easing) = lookup("RELAX_EASING") {
            self.engine.default_easing = easing;
        }
        if let Some(val) = lookup("RELAX_START_BOUNDARY") {
            match val.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                "apply_start" => self.engine.start_boundary = StartBoundary::ApplyStart,
                "skip" => self.engine.start_boundary = StartBoundary::Skip,
                _ => {}
            }
        }
        if let Some(val) = lookup("RELAX_TOKEN_MISMATCH") {
            match val.trim().to_ascii_lowercase().as_str() {
                "reject" => self.engine.token_mismatch = TokenMismatch::Reject,
                "truncate" => self.engine.token_mismatch = TokenMismatch::Truncate,
                _ => {}
            }
        }
        if let Some(diagnostics) = lookup("RELAX_DIAGNOSTICS") {
            self.engine.diagnostics = Some(diagnostics);
        }

        // Capabilities
        if let Some(list) = lookup("RELAX_SUPPORTED_PROPERTIES") {
            self.capabilities.supported_properties = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        // Demo settings
        if let Some(path) = lookup("RELAX_STEPS") {
            self.demo.steps = Some(PathBuf::from(path));
        }
        if let Some(val) = lookup("RELAX_SWEEP_STEP") {
            if let Ok(step) = val.parse::<f64>() {
                if step > 0.0 {
                    self.demo.sweep_step = step;
                }
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from relax.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RelaxConfig::default();
        assert_eq!(config.engine.default_easing, "linear");
        assert_eq!(config.engine.start_boundary, StartBoundary::ApplyStart);
        assert_eq!(config.engine.token_mismatch, TokenMismatch::Reject);
        assert!(config.capabilities.supported_properties.is_empty());
        assert_eq!(config.demo.sweep_step, 25.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = RelaxConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: RelaxConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine.default_easing, "linear");
        assert_eq!(parsed.engine.token_mismatch, TokenMismatch::Reject);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: RelaxConfig = toml::from_str(
            r#"
            [engine]
            start_boundary = "skip"

            [capabilities]
            supported_properties = ["opacity", "webkitTransform"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.engine.start_boundary, StartBoundary::Skip);
        assert_eq!(parsed.engine.default_easing, "linear");
        assert_eq!(parsed.capabilities.supported_properties.len(), 2);
        assert_eq!(parsed.demo.sweep_step, 25.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\ndefault_easing = \"ease_out\"\ntoken_mismatch = \"truncate\"").unwrap();

        let config = RelaxConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.engine.default_easing, "ease_out");
        assert_eq!(config.engine.token_mismatch, TokenMismatch::Truncate);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = RelaxConfig::load_from_file("does/not/exist/relax.toml").unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if relax.toml doesn't exist
        let config = RelaxConfig::load_or_default();
        assert!(!config.engine.default_easing.is_empty());
    }

    #[test]
    fn test_merge_with_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RELAX_EASING", "ease_in"),
            ("RELAX_START_BOUNDARY", "skip"),
            ("RELAX_TOKEN_MISMATCH", "truncate"),
            ("RELAX_SUPPORTED_PROPERTIES", "opacity, MozTransform,,"),
            ("RELAX_SWEEP_STEP", "-3"),
        ]
        .into_iter()
        .collect();

        let mut config = RelaxConfig::default();
        config.merge_with(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.engine.default_easing, "ease_in");
        assert_eq!(config.engine.start_boundary, StartBoundary::Skip);
        assert_eq!(config.engine.token_mismatch, TokenMismatch::Truncate);
        assert_eq!(
            config.capabilities.supported_properties,
            vec!["opacity".to_string(), "MozTransform".to_string()]
        );
        // Non-positive sweep steps are ignored
        assert_eq!(config.demo.sweep_step, 25.0);
    }

    #[test]
    fn test_diagnostics_categories() {
        let mut engine = EngineConfig::default();
        assert!(!engine.diagnostics_enabled("render"));

        engine.diagnostics = Some("compile, Render".to_string());
        assert!(engine.diagnostics_enabled("render"));
        assert!(engine.diagnostics_enabled("compile"));

        engine.diagnostics = Some("all".to_string());
        assert!(engine.diagnostics_enabled("anything"));
    }
}
