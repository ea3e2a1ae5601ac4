//! Configuration types for Trestle diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled and rendered. All types implement
//! [`serde::Deserialize`] for loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`StyleConfig`] - Colors, fonts and stroke width of SVG diagrams.
//! - [`LayoutConfig`] - Spacing and text measurement of SVG diagrams.
//! - [`RenderConfig`] - Backend selection and link generation.
//!
//! # Example
//!
//! ```
//! # use trestle::config::{AppConfig, BackendKind};
//! let config = AppConfig::from_toml_str(r#"
//!     [style]
//!     background_color = "white"
//!
//!     [render]
//!     backend = "ebnf"
//! "#).unwrap();
//!
//! assert!(config.style().background_color().unwrap().is_some());
//! assert_eq!(config.render().backend(), BackendKind::Ebnf);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use trestle_core::color::Color;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration combining style, layout and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, layout: LayoutConfig, render: RenderConfig) -> Self {
        Self {
            style,
            layout,
            render,
        }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown values and
    /// [`ConfigError::Validation`] for colors that are not valid CSS colors.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every configured color parses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first invalid color.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let style = &self.style;
        style.background_color().map_err(ConfigError::Validation)?;
        style.line_color().map_err(ConfigError::Validation)?;
        style.terminal_fill().map_err(ConfigError::Validation)?;
        style.non_terminal_fill().map_err(ConfigError::Validation)?;
        style.text_color().map_err(ConfigError::Validation)?;
        style.link_color().map_err(ConfigError::Validation)?;
        Ok(())
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing or validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    info!(path:? = path; "Loading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    AppConfig::from_toml_str(&content)
}

fn parse_color(value: Option<&String>, fallback: &str, field: &str) -> Result<Color, String> {
    Color::new(value.map_or(fallback, String::as_str))
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

/// Visual styling configuration for SVG diagrams.
///
/// Colors are CSS color strings. Fields that are not set fall back to the
/// renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    /// Color of rails, loops and box outlines.
    #[serde(default)]
    line_color: Option<String>,

    #[serde(default)]
    terminal_fill: Option<String>,

    #[serde(default)]
    non_terminal_fill: Option<String>,

    #[serde(default)]
    text_color: Option<String>,

    /// Text color of non-terminals that link to another diagram.
    #[serde(default)]
    link_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<u16>,

    #[serde(default)]
    line_width: Option<f32>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn line_color(&self) -> Result<Color, String> {
        parse_color(self.line_color.as_ref(), "black", "line color")
    }

    pub fn terminal_fill(&self) -> Result<Color, String> {
        parse_color(self.terminal_fill.as_ref(), "lightyellow", "terminal fill")
    }

    pub fn non_terminal_fill(&self) -> Result<Color, String> {
        parse_color(self.non_terminal_fill.as_ref(), "white", "non-terminal fill")
    }

    pub fn text_color(&self) -> Result<Color, String> {
        parse_color(self.text_color.as_ref(), "black", "text color")
    }

    pub fn link_color(&self) -> Result<Color, String> {
        parse_color(self.link_color.as_ref(), "navy", "link color")
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or("monospace")
    }

    pub fn font_size(&self) -> u16 {
        self.font_size.unwrap_or(14)
    }

    pub fn line_width(&self) -> f32 {
        self.line_width.unwrap_or(2.0)
    }
}

/// How label widths are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMeasure {
    /// Shape text with the system fonts.
    #[default]
    Shaped,
    /// Fixed advance per character; no font access.
    Estimate,
}

/// Spacing and measurement settings for railroad layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Space between sequence items and width of branch rails.
    horizontal_gap: f32,
    /// Space between stacked alternatives and around loops.
    vertical_gap: f32,
    /// Margin around the whole diagram.
    padding: f32,
    /// Space between a label and its box outline.
    label_padding: f32,
    text_measure: TextMeasure,
    /// Collapse single-child sequences into their child when building.
    flatten_sequences: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 10.0,
            vertical_gap: 10.0,
            padding: 20.0,
            label_padding: 8.0,
            text_measure: TextMeasure::default(),
            flatten_sequences: false,
        }
    }
}

impl LayoutConfig {
    pub fn horizontal_gap(&self) -> f32 {
        self.horizontal_gap
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn label_padding(&self) -> f32 {
        self.label_padding
    }

    pub fn text_measure(&self) -> TextMeasure {
        self.text_measure
    }

    pub fn flatten_sequences(&self) -> bool {
        self.flatten_sequences
    }

    /// Returns a copy using the given text measurement.
    pub fn with_text_measure(mut self, text_measure: TextMeasure) -> Self {
        self.text_measure = text_measure;
        self
    }

    /// Returns a copy with sequence flattening switched on or off.
    pub fn with_flatten_sequences(mut self, flatten: bool) -> Self {
        self.flatten_sequences = flatten;
        self
    }
}

/// Rendering backend used by [`Trestle::run`](crate::Trestle::run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Svg,
    Ebnf,
}

/// Backend selection and link generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    backend: BackendKind,
    /// Prepended to a target location to form a link.
    link_prefix: String,
    /// Write resolved references of text renderings as Markdown links.
    markdown_links: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            link_prefix: "#".to_string(),
            markdown_links: false,
        }
    }
}

impl RenderConfig {
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn link_prefix(&self) -> &str {
        &self.link_prefix
    }

    pub fn markdown_links(&self) -> bool {
        self.markdown_links
    }

    /// Returns a copy rendering through the given backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }
}
