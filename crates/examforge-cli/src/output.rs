use std::io::Write;
use std::path::Path;

use examforge_core::{OPTION_LABELS, ReviewFlag, ReviewKind};
use examforge_parsing::QuestionBank;
use examforge_reporting::{ExportFormat, TopicSummary};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

pub fn print_warning(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "WARNING:".yellow(), message)
    } else {
        writeln!(w, "WARNING: {}", message)
    }
}

/// Print block counts for both sources and the number of records built.
pub fn print_parse_summary(
    w: &mut dyn Write,
    bank: &QuestionBank,
    color: ColorMode,
) -> std::io::Result<()> {
    let q = &bank.questions.stats;
    let a = &bank.answers.stats;

    writeln!(w, "Parsed {} question blocks", bank.questions.blocks.len())?;
    let dropped_questions = q.missing_sub_label + q.missing_options;
    if dropped_questions > 0 {
        let line = format!(
            "(Dropped {} of {} segments: {} without sub-label, {} incomplete)",
            dropped_questions, q.segments, q.missing_sub_label, q.missing_options
        );
        print_dimmed(w, &line, color)?;
    }

    writeln!(w, "Parsed {} answer blocks", bank.answers.blocks.len())?;
    if a.no_ordinal > 0 || a.no_answer_statement > 0 {
        let line = format!(
            "({} blocks without ordinal, {} without answer statement)",
            a.no_ordinal, a.no_answer_statement
        );
        print_dimmed(w, &line, color)?;
    }

    writeln!(w, "Built {} records", bank.outcome.records.len())?;
    let r = &bank.outcome.stats;
    if !bank.outcome.records.is_empty() {
        let line = format!(
            "(Answers from: {} explanation override, {} statement letter, {} answer block phrase, {} fuzzy match, {} default; {} without answer block)",
            r.explanation_override,
            r.statement_letter,
            r.block_phrase,
            r.fuzzy_match,
            r.defaulted,
            r.missing_answer
        );
        print_dimmed(w, &line, color)?;
    }
    Ok(())
}

pub fn print_saved(
    w: &mut dyn Write,
    path: &Path,
    format: ExportFormat,
    count: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} records to {} ({})",
            "Saved".green(),
            count,
            path.display().bold(),
            format.label()
        )?;
    } else {
        writeln!(
            w,
            "Saved {} records to {} ({})",
            count,
            path.display(),
            format.label()
        )?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print how many records need manual review, grouped by reason.
pub fn print_review_flags(
    w: &mut dyn Write,
    flags: &[ReviewFlag],
    color: ColorMode,
) -> std::io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }

    let mut disagreements = Vec::new();
    let mut missing = Vec::new();
    let mut defaulted = Vec::new();
    for flag in flags {
        match flag.kind {
            ReviewKind::OverrideDisagreement {
                chain_index,
                override_index,
            } => disagreements.push(format!(
                "#{} ({}->{})",
                flag.ordinal, OPTION_LABELS[chain_index], OPTION_LABELS[override_index]
            )),
            ReviewKind::MissingAnswer => missing.push(format!("#{}", flag.ordinal)),
            ReviewKind::DefaultedIndex => defaulted.push(format!("#{}", flag.ordinal)),
        }
    }

    let header = format!("Needs review: {} records", flags.len());
    if color.enabled() {
        writeln!(w, "{}", header.yellow().bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    for (label, ordinals) in [
        ("explanation overrode answer", &disagreements),
        ("no answer block", &missing),
        ("defaulted to A", &defaulted),
    ] {
        if !ordinals.is_empty() {
            writeln!(w, "  {}: {}", label, ordinals.join(", "))?;
        }
    }
    writeln!(w)?;
    Ok(())
}

pub fn print_topic_summary(
    w: &mut dyn Write,
    summary: &TopicSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Topic distribution:".bold())?;
        for (topic, count) in &summary.entries {
            writeln!(w, "  {}: {}", topic, count)?;
        }
        Ok(())
    } else {
        write!(w, "{}", summary)
    }
}

/// Dry-run listing: one line per record with the chosen option and the
/// heuristic that chose it.
pub fn print_inspection(
    w: &mut dyn Write,
    bank: &QuestionBank,
    color: ColorMode,
) -> std::io::Result<()> {
    for (record, (_, resolution)) in bank.outcome.records.iter().zip(&bank.outcome.resolutions) {
        let question = truncate(&record.question, 70);
        let letter = OPTION_LABELS[record.correct_answer];
        if color.enabled() {
            writeln!(
                w,
                "[{}] {} {}",
                record.id.bold(),
                record.topic.cyan(),
                question
            )?;
            writeln!(
                w,
                "      -> {} {}",
                letter.green().bold(),
                format!("({})", resolution.source.as_str()).dimmed()
            )?;
        } else {
            writeln!(w, "[{}] {} {}", record.id, record.topic, question)?;
            writeln!(w, "      -> {} ({})", letter, resolution.source.as_str())?;
        }
    }

    let orphans: Vec<String> = bank
        .answers
        .blocks
        .keys()
        .filter(|ordinal| !bank.questions.blocks.contains_key(ordinal))
        .map(|ordinal| format!("#{}", ordinal))
        .collect();
    if !orphans.is_empty() {
        writeln!(w)?;
        print_dimmed(
            w,
            &format!("Answer blocks with no question: {}", orphans.join(", ")),
            color,
        )?;
    }
    writeln!(w)?;
    Ok(())
}

fn print_dimmed(w: &mut dyn Write, line: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

/// Shorten to `max` characters, adding `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}
