//! Configuration types for logcloud.
//!
//! [`Config::load`] layers, in order: the embedded defaults,
//! `~/.config/logcloud/config.toml` (created with the defaults if it does not
//! yet exist), and `LOGCLOUD_<SECTION>__<KEY>` environment variables.
//! [`Config::load_from`] reads an explicit file instead of the user one.
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem or the environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
num_entries = 1000
order       = "timestamp desc"

[analysis]
mode             = "word"
ngram_size       = 2
extra_stop_words = []

[render]
format           = "svg"
output_file      = "wordcloud.svg"
width            = 800
height           = 400
max_words        = 200
background_color = "white"
contour_width    = 3
contour_color    = "steelblue"
theme            = "default"
"#;

const ENV_PREFIX: &str = "LOGCLOUD";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// Maximum number of entries fetched from the log source.
    #[serde(default = "default_num_entries")]
    pub num_entries: usize,
    /// `timestamp desc` or `timestamp asc`.
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_num_entries() -> usize { 1000 }
fn default_order() -> String { "timestamp desc".to_string() }

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            num_entries: default_num_entries(),
            order: default_order(),
        }
    }
}

/// `[analysis]` section. Validated into an
/// [`AnalysisConfig`](crate::analysis::AnalysisConfig) before use.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Signed so that a bad value reaches validation instead of failing
    /// deserialisation with a less helpful message.
    #[serde(default = "default_ngram_size")]
    pub ngram_size: i64,
    /// Replaces the built-in stop-word list when set.
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

fn default_mode() -> String { "word".to_string() }
fn default_ngram_size() -> i64 { crate::analysis::DEFAULT_NGRAM_SIZE as i64 }

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            ngram_size: default_ngram_size(),
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Output artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Terminal,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "terminal" | "term" | "tty" => Ok(OutputFormat::Terminal),
            other => Err(ConfigurationError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Border width in pixels; 0 disables the border.
    #[serde(default = "default_contour_width")]
    pub contour_width: u32,
    #[serde(default = "default_contour_color")]
    pub contour_color: String,
    /// `default` or `gruvbox_dark`.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_format() -> String { "svg".to_string() }
fn default_output_file() -> PathBuf { PathBuf::from("wordcloud.svg") }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 400 }
fn default_max_words() -> usize { 200 }
fn default_background_color() -> String { "white".to_string() }
fn default_contour_width() -> u32 { 3 }
fn default_contour_color() -> String { "steelblue".to_string() }
fn default_theme() -> String { "default".to_string() }

impl RenderSettings {
    pub fn output_format(&self) -> Result<OutputFormat, ConfigurationError> {
        self.format.parse()
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_file: default_output_file(),
            width: default_width(),
            height: default_height(),
            max_words: default_max_words(),
            background_color: default_background_color(),
            contour_width: default_contour_width(),
            contour_color: default_contour_color(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/logcloud/config.toml` and the environment,
    /// layered on top of the built-in defaults. Creates the file with
    /// defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(config::File::from(path.as_path()).required(false), environment())
    }

    /// Load from an explicit file, which must exist, plus the environment.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(config::File::from(path).required(true), environment())
    }

    /// Parse a TOML document layered on the defaults, ignoring the
    /// environment.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered<S>(file: S, env: config::Environment) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

/// `LOGCLOUD_<SECTION>__<KEY>` variables; list keys split on commas.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("analysis.stop_words")
        .with_list_parse_key("analysis.extra_stop_words")
        .try_parsing(true)
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logcloud")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.source.num_entries, 1000);
        assert_eq!(cfg.source.order, "timestamp desc");
        assert_eq!(cfg.analysis.mode, "word");
        assert_eq!(cfg.analysis.ngram_size, 2);
        assert!(cfg.analysis.stop_words.is_none());
        assert_eq!(cfg.render.width, 800);
        assert_eq!(cfg.render.max_words, 200);
        assert_eq!(cfg.render.output_format(), Ok(OutputFormat::Svg));
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [analysis]
            mode = "phrase"
            ngram_size = 3
            stop_words = ["pod"]

            [render]
            format = "terminal"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.mode, "phrase");
        assert_eq!(cfg.analysis.ngram_size, 3);
        assert_eq!(cfg.analysis.stop_words, Some(vec!["pod".to_string()]));
        assert_eq!(cfg.render.output_format(), Ok(OutputFormat::Terminal));
        // Untouched keys keep their defaults.
        assert_eq!(cfg.render.height, 400);
        assert_eq!(cfg.source.num_entries, 1000);
    }

    fn write_config(src: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, src.as_bytes()).unwrap();
        file
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn load_from_reads_explicit_file() {
        let file = write_config(
            r#"
            [source]
            num_entries = 25

            [render]
            theme = "gruvbox_dark"
            "#,
        );
        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.source.num_entries, 25);
        assert_eq!(cfg.render.theme, "gruvbox_dark");
        assert_eq!(cfg.render.width, 800);
    }

    #[test]
    fn load_from_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[analysis]\nmode = \"phrase\"\nngram_size = 2\n");
        let cfg = Config::layered(
            config::File::from(file.path()).required(true),
            env(&[
                ("LOGCLOUD_ANALYSIS__NGRAM_SIZE", "3"),
                ("LOGCLOUD_ANALYSIS__EXTRA_STOP_WORDS", "pod,node"),
                ("LOGCLOUD_RENDER__OUTPUT_FILE", "cloud.svg"),
                ("UNRELATED_ANALYSIS__MODE", "word"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.analysis.mode, "phrase");
        assert_eq!(cfg.analysis.ngram_size, 3);
        assert_eq!(cfg.analysis.extra_stop_words, ["pod", "node"]);
        assert_eq!(cfg.render.output_file, PathBuf::from("cloud.svg"));
    }

    #[test]
    fn negative_ngram_size_survives_deserialisation() {
        let cfg = Config::from_toml_str("[analysis]\nngram_size = -1\n").unwrap();
        assert_eq!(cfg.analysis.ngram_size, -1);
    }

    #[test]
    fn unknown_format_is_a_configuration_error() {
        let cfg = Config::from_toml_str("[render]\nformat = \"png\"\n").unwrap();
        assert_eq!(
            cfg.render.output_format(),
            Err(ConfigurationError::UnsupportedFormat("png".into()))
        );
    }
}
