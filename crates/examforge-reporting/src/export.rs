use std::io::Write;
use std::path::Path;

use examforge_core::Record;

use crate::ReportingError;
use crate::types::ExportFormat;

/// Constant name used for JS module output when none is configured.
pub const DEFAULT_EXPORT_NAME: &str = "questions";

/// Write `records` to `path` in the given format.
///
/// `export_name` is only used for [`ExportFormat::JsModule`]. Parent
/// directories are created as needed.
pub fn export_records(
    records: &[Record],
    format: ExportFormat,
    path: &Path,
    export_name: &str,
) -> Result<(), ReportingError> {
    let content = match format {
        ExportFormat::Json => export_json(records)?,
        ExportFormat::JsModule => export_js_module(records, export_name)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        format = format.label(),
        "wrote records"
    );
    Ok(())
}

/// Pretty-printed JSON array, two-space indent, non-ASCII kept as is.
pub fn export_json(records: &[Record]) -> Result<String, ReportingError> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

/// JavaScript module exporting the records as one constant.
pub fn export_js_module(records: &[Record], export_name: &str) -> Result<String, ReportingError> {
    let json = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "// Exam question bank\n// Auto-generated from question and answer sources\n\nexport const {} = {};\n",
        export_name, json
    ))
}
