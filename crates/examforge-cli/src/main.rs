use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use examforge_core::config_file::{self, ConfigFile, ExtractionSection};
use examforge_parsing::{
    ParsingConfigBuilder, QuestionBank, QuestionBankExtractor, extract_question_text,
};
use examforge_reporting::{DEFAULT_EXPORT_NAME, ExportFormat, TopicSummary, export_records};

mod output;

use output::ColorMode;

const DEFAULT_OUTPUT: &str = "questions.json";

/// Exam question bank builder - turn a question PDF and an answer document into structured records
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse both documents, reconcile them and write the record file
    Build {
        /// Path to the answer/explanation text document
        #[arg(long)]
        answers: PathBuf,

        /// Path to the question document (PDF, or already-extracted .txt)
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Output path; `.js`/`.mjs` writes a JavaScript module, anything else JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Constant name used for JavaScript module output
        #[arg(long)]
        export_name: Option<String>,
    },

    /// Dry run: print parsed blocks and how each answer was resolved
    Inspect {
        /// Path to the answer/explanation text document
        #[arg(long)]
        answers: PathBuf,

        /// Path to the question document (PDF, or already-extracted .txt)
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let file_config = config_file::load_config();

    match cli.command {
        Command::Build {
            answers,
            pdf,
            output,
            export_name,
        } => build(&answers, pdf.as_deref(), output, export_name, &file_config, color),
        Command::Inspect { answers, pdf } => {
            inspect(&answers, pdf.as_deref(), &file_config, color)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(
    answers: &Path,
    pdf: Option<&Path>,
    output: Option<PathBuf>,
    export_name: Option<String>,
    file_config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let output_section = file_config.output();
    let output_path = output
        .or_else(|| std::env::var("EXAMFORGE_OUTPUT").ok().map(PathBuf::from))
        .or_else(|| output_section.default_path.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let export_name = export_name
        .or(output_section.js_export_name)
        .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string());
    tracing::debug!(path = %output_path.display(), export_name = %export_name, "resolved output");

    let extractor = make_extractor(file_config)?;
    let mut writer = std::io::stdout();
    let bank = run_pipeline(&extractor, answers, pdf, file_config, &mut writer, color)?;

    let format = ExportFormat::from_path(&output_path);
    export_records(&bank.outcome.records, format, &output_path, &export_name)?;
    output::print_saved(
        &mut writer,
        &output_path,
        format,
        bank.outcome.records.len(),
        color,
    )?;

    output::print_review_flags(&mut writer, &bank.outcome.review_flags, color)?;
    output::print_topic_summary(
        &mut writer,
        &TopicSummary::from_counts(&bank.outcome.topic_counts),
        color,
    )?;
    Ok(())
}

fn inspect(
    answers: &Path,
    pdf: Option<&Path>,
    file_config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    let extractor = make_extractor(file_config)?;
    let mut writer = std::io::stdout();
    let bank = run_pipeline(&extractor, answers, pdf, file_config, &mut writer, color)?;

    writeln!(writer)?;
    output::print_inspection(&mut writer, &bank, color)?;
    output::print_review_flags(&mut writer, &bank.outcome.review_flags, color)?;
    output::print_topic_summary(
        &mut writer,
        &TopicSummary::from_counts(&bank.outcome.topic_counts),
        color,
    )?;
    Ok(())
}

fn make_extractor(file_config: &ConfigFile) -> anyhow::Result<QuestionBankExtractor> {
    let parsing_config = ParsingConfigBuilder::from_section(&file_config.parsing()).build()?;
    Ok(QuestionBankExtractor::with_config(parsing_config))
}

/// Extract, parse and reconcile. Prints the progress counts as it goes.
fn run_pipeline(
    extractor: &QuestionBankExtractor,
    answers: &Path,
    pdf: Option<&Path>,
    file_config: &ConfigFile,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<QuestionBank> {
    if !answers.exists() {
        anyhow::bail!("Answer file not found: {}", answers.display());
    }

    let mut extraction = file_config.extraction();
    if let Ok(program) = std::env::var("EXAMFORGE_PDFTOTEXT") {
        extraction.pdftotext_path = Some(program);
    }

    let question_text = load_question_text(pdf, &extraction, writer, color)?;
    let bank = extractor.build_from_answer_file(&question_text, answers)?;

    output::print_parse_summary(writer, &bank, color)?;
    Ok(bank)
}

/// Question-source text, or an empty string when there is nothing usable.
///
/// A missing path or a missing/failing extraction tool is reported and the
/// run continues with zero questions.
fn load_question_text(
    pdf: Option<&Path>,
    extraction: &ExtractionSection,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<String> {
    let Some(path) = pdf else {
        output::print_warning(writer, "No question document given; no records will be built", color)?;
        return Ok(String::new());
    };

    if !path.exists() {
        output::print_warning(
            writer,
            &format!("Question document not found: {} (skipped)", path.display()),
            color,
        )?;
        return Ok(String::new());
    }

    writeln!(writer, "Extracting text from {}...", path.display())?;
    let backend = examforge_pdftotext::backend_for_path(path, extraction);
    let extracted = extract_question_text(path, backend.as_ref())?;
    if let Some(err) = extracted.degraded {
        let hint = if err.is_tool_missing() {
            " (install poppler-utils or set EXAMFORGE_PDFTOTEXT)"
        } else {
            ""
        };
        output::print_warning(
            writer,
            &format!("Text extraction failed: {}{}", err, hint),
            color,
        )?;
    }
    Ok(extracted.text)
}
