use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub extraction: Option<ExtractionSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Regex matching the per-question marker; group 1 must capture the ordinal.
    pub question_marker: Option<String>,
    /// Regex matching the sub-label line that precedes each question body.
    pub topic_label: Option<String>,
    pub separator_min_dashes: Option<usize>,
    pub answer_token: Option<String>,
    pub fuzzy_prefix_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub pdftotext_path: Option<String>,
    pub layout: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    pub default_path: Option<String>,
    pub js_export_name: Option<String>,
}

/// Platform config directory path: `<config_dir>/examforge/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("examforge").join("config.toml"))
}

/// Load config by cascading CWD `.examforge.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".examforge.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Pick the overlay value when present, else the base value.
fn pick<S, T: Clone>(
    base: &Option<S>,
    overlay: &Option<S>,
    field: impl Fn(&S) -> &Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(|s| field(s).clone())
        .or_else(|| base.as_ref().and_then(|s| field(s).clone()))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        parsing: Some(ParsingSection {
            question_marker: pick(&base.parsing, &overlay.parsing, |p| &p.question_marker),
            topic_label: pick(&base.parsing, &overlay.parsing, |p| &p.topic_label),
            separator_min_dashes: pick(&base.parsing, &overlay.parsing, |p| {
                &p.separator_min_dashes
            }),
            answer_token: pick(&base.parsing, &overlay.parsing, |p| &p.answer_token),
            fuzzy_prefix_chars: pick(&base.parsing, &overlay.parsing, |p| &p.fuzzy_prefix_chars),
        }),
        extraction: Some(ExtractionSection {
            pdftotext_path: pick(&base.extraction, &overlay.extraction, |e| &e.pdftotext_path),
            layout: pick(&base.extraction, &overlay.extraction, |e| &e.layout),
        }),
        output: Some(OutputSection {
            default_path: pick(&base.output, &overlay.output, |o| &o.default_path),
            js_export_name: pick(&base.output, &overlay.output, |o| &o.js_export_name),
        }),
    }
}

impl ConfigFile {
    pub fn parsing(&self) -> ParsingSection {
        self.parsing.clone().unwrap_or_default()
    }

    pub fn extraction(&self) -> ExtractionSection {
        self.extraction.clone().unwrap_or_default()
    }

    pub fn output(&self) -> OutputSection {
        self.output.clone().unwrap_or_default()
    }
}
