use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use examforge_core::config_file::ExtractionSection;
use examforge_core::text_utils::expand_ligatures;
use examforge_core::{BackendError, TextExtractor};

/// [`TextExtractor`] that runs the poppler `pdftotext` utility.
///
/// Invokes `<program> -layout <path> -` and reads the text from stdout.
/// Layout mode keeps option labels at the start of their own lines, which
/// the question parser depends on.
pub struct PdftotextBackend {
    program: PathBuf,
    layout: bool,
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftotext"),
            layout: true,
        }
    }
}

impl PdftotextBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of `pdftotext` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Toggle `-layout`. On by default.
    pub fn with_layout(mut self, layout: bool) -> Self {
        self.layout = layout;
        self
    }
}

impl TextExtractor for PdftotextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let program = self.program.display().to_string();

        let mut command = Command::new(&self.program);
        if self.layout {
            command.arg("-layout");
        }
        command.arg(path).arg("-");

        tracing::debug!(program = %program, path = %path.display(), "running text extraction");
        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => BackendError::ToolMissing(program.clone()),
            _ => BackendError::Io(e),
        })?;

        if !output.status.success() {
            return Err(BackendError::ToolFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(expand_ligatures(&text))
    }
}

/// [`TextExtractor`] for question sources that were already converted to text.
#[derive(Debug, Default)]
pub struct PlainTextBackend;

impl TextExtractor for PlainTextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Pick a backend for `path`: plain text for `.txt`, pdftotext otherwise.
pub fn backend_for_path(path: &Path, config: &ExtractionSection) -> Box<dyn TextExtractor> {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_text {
        return Box::new(PlainTextBackend);
    }

    let mut backend = PdftotextBackend::new().with_layout(config.layout.unwrap_or(true));
    if let Some(program) = &config.pdftotext_path {
        backend = backend.with_program(program);
    }
    Box::new(backend)
}
