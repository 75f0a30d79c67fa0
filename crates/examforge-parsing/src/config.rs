use regex::Regex;
use thiserror::Error;

use examforge_core::ReconcileConfig;
use examforge_core::config_file::ParsingSection;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("separator must be at least one dash")]
    EmptySeparator,
    #[error("answer token must not be empty")]
    EmptyAnswerToken,
}

/// Configuration for both source parsers and the reconciler.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── questions.rs ──
    /// Marker that starts each question segment; group 1 captures the ordinal.
    pub(crate) question_marker_re: Option<Regex>,
    /// Sub-label line between the marker and the question body.
    pub(crate) topic_label_re: Option<Regex>,

    // ── answers.rs ──
    /// Run of `-` characters that separates answer blocks; `None` means 20 or more.
    pub(crate) separator_re: Option<Regex>,
    /// Case-insensitive literal that introduces the answer statement; `None` means `ans-`.
    pub(crate) answer_token_re: Option<Regex>,

    // ── reconcile ──
    pub(crate) reconcile: ReconcileConfig,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            question_marker_re: None,
            topic_label_re: None,
            separator_re: None,
            answer_token_re: None,
            reconcile: ReconcileConfig::default(),
        }
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`ConfigError`] if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    question_marker_re: Option<String>,
    topic_label_re: Option<String>,
    separator_min_dashes: Option<usize>,
    answer_token: Option<String>,
    fuzzy_prefix_chars: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[parsing]` section of a config file.
    pub fn from_section(section: &ParsingSection) -> Self {
        Self {
            question_marker_re: section.question_marker.clone(),
            topic_label_re: section.topic_label.clone(),
            separator_min_dashes: section.separator_min_dashes,
            answer_token: section.answer_token.clone(),
            fuzzy_prefix_chars: section.fuzzy_prefix_chars,
        }
    }

    pub fn question_marker_regex(mut self, pattern: &str) -> Self {
        self.question_marker_re = Some(pattern.to_string());
        self
    }

    pub fn topic_label_regex(mut self, pattern: &str) -> Self {
        self.topic_label_re = Some(pattern.to_string());
        self
    }

    pub fn separator_min_dashes(mut self, n: usize) -> Self {
        self.separator_min_dashes = Some(n);
        self
    }

    pub fn answer_token(mut self, token: &str) -> Self {
        self.answer_token = Some(token.to_string());
        self
    }

    pub fn fuzzy_prefix_chars(mut self, n: usize) -> Self {
        self.fuzzy_prefix_chars = Some(n);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let defaults = ParsingConfig::default();

        if self.separator_min_dashes == Some(0) {
            return Err(ConfigError::EmptySeparator);
        }
        if self
            .answer_token
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            return Err(ConfigError::EmptyAnswerToken);
        }

        let separator_re = compile(self.separator_min_dashes.map(|n| format!("-{{{},}}", n)))?;
        let answer_token_re = compile(
            self.answer_token
                .as_ref()
                .map(|t| format!("(?i){}", regex::escape(t))),
        )?;

        Ok(ParsingConfig {
            question_marker_re: compile(self.question_marker_re)?,
            topic_label_re: compile(self.topic_label_re)?,
            separator_re,
            answer_token_re,
            reconcile: ReconcileConfig {
                fuzzy_prefix_chars: self
                    .fuzzy_prefix_chars
                    .unwrap_or(defaults.reconcile.fuzzy_prefix_chars),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.reconcile.fuzzy_prefix_chars, 50);
        assert!(config.question_marker_re.is_none());
        assert!(config.separator_re.is_none());
        assert!(config.answer_token_re.is_none());
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .separator_min_dashes(10)
            .answer_token("answer:")
            .fuzzy_prefix_chars(30)
            .build()
            .unwrap();
        let separator = config.separator_re.unwrap();
        assert!(separator.is_match("----------"));
        assert!(!separator.is_match("---------"));
        assert!(config.answer_token_re.unwrap().is_match("ANSWER: B"));
        assert_eq!(config.reconcile.fuzzy_prefix_chars, 30);
    }

    #[test]
    fn test_answer_token_is_literal() {
        let config = ParsingConfigBuilder::new().answer_token("a.s").build().unwrap();
        let token = config.answer_token_re.unwrap();
        assert!(token.is_match("A.S"));
        assert!(!token.is_match("abs"));
    }

    #[test]
    fn test_builder_custom_regex() {
        let config = ParsingConfigBuilder::new()
            .question_marker_regex(r"(?i)Frage\s+(\d+)")
            .build()
            .unwrap();
        assert!(config.question_marker_re.is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new()
            .topic_label_regex(r"[invalid")
            .build();
        assert!(matches!(result, Err(ConfigError::Pattern(_))));
    }

    #[test]
    fn test_builder_rejects_degenerate_values() {
        assert!(matches!(
            ParsingConfigBuilder::new().separator_min_dashes(0).build(),
            Err(ConfigError::EmptySeparator)
        ));
        assert!(matches!(
            ParsingConfigBuilder::new().answer_token("  ").build(),
            Err(ConfigError::EmptyAnswerToken)
        ));
    }

    #[test]
    fn test_from_section() {
        let section = ParsingSection {
            answer_token: Some("ANSWER:".to_string()),
            separator_min_dashes: Some(5),
            ..Default::default()
        };
        let config = ParsingConfigBuilder::from_section(&section).build().unwrap();
        assert!(config.answer_token_re.unwrap().is_match("answer:"));
        assert!(config.separator_re.unwrap().is_match("-----"));
        assert_eq!(config.reconcile.fuzzy_prefix_chars, 50);
    }
}
