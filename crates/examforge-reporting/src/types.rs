use std::path::Path;

/// Output format for the record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    /// `export const <name> = [...];`
    JsModule,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::JsModule => "JavaScript module",
        }
    }

    /// Format implied by the output file's extension. Anything other than
    /// `.js` or `.mjs` is written as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("js" | "mjs") => Self::JsModule,
            _ => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out/questions.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("questions.js")), ExportFormat::JsModule);
        assert_eq!(ExportFormat::from_path(Path::new("questions.MJS")), ExportFormat::JsModule);
        assert_eq!(ExportFormat::from_path(Path::new("questions")), ExportFormat::Json);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExportFormat::Json.label(), "JSON");
        assert_eq!(ExportFormat::JsModule.label(), "JavaScript module");
    }
}
