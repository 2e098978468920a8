//! Output formatting functionality
//!
//! This module provides the text, JSON and CSV renderings of analysis and
//! copy reports.

use crate::error::{Result, WalkerError};
use crate::models::analysis::{AnalysisReport, IssueKind, ReferenceEntry, TextureEntry};
use crate::models::package::{CopiedFile, CopyReport};
use crate::utils::canonical::canonical_string;
use ansi_term::Colour::{Blue, Cyan, Green, Purple, Red, Yellow};
use ansi_term::Style;

fn paint(use_colors: bool, style: Style, text: impl AsRef<str>) -> String {
    if use_colors {
        style.paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

fn display_path(path: Option<&std::path::Path>, raw: &str) -> String {
    path.map(canonical_string).unwrap_or_else(|| raw.to_string())
}

fn format_reference_line(reference: &ReferenceEntry, use_colors: bool, verbose: bool) -> String {
    let mut line = format!(
        "  {} {}\n",
        paint(use_colors, Purple.normal(), format!("[{}]", reference.kind)),
        display_path(reference.resolved_path.as_deref(), &reference.raw_token)
    );
    if verbose {
        line.push_str(&format!(
            "      token: {}\n",
            paint(use_colors, Style::new().dimmed(), &reference.raw_token)
        ));
    }
    line
}

fn format_texture_line(texture: &TextureEntry, use_colors: bool, verbose: bool) -> String {
    let count = if texture.is_tiled {
        paint(use_colors, Cyan.bold(), format!("{} tiles", texture.tile_count))
    } else {
        paint(use_colors, Style::new().dimmed(), format!("{} in folder", texture.tile_count))
    };
    let mut line = format!(
        "  {} ({}) {}\n",
        display_path(texture.resolved_path.as_deref(), &texture.raw_token),
        count,
        paint(use_colors, Style::new().dimmed(), &texture.source)
    );
    if verbose {
        line.push_str(&format!(
            "      token: {}\n",
            paint(use_colors, Style::new().dimmed(), &texture.raw_token)
        ));
    }
    line
}

/// Format an analysis report as text
pub fn format_report_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n",
        paint(use_colors, Blue.bold(), "Scene Dependency Analysis")
    ));
    output.push_str(&format!("Root: {}\n\n", canonical_string(&report.root)));

    output.push_str(&format!(
        "{}\n",
        paint(use_colors, Style::new().bold(), format!("References ({})", report.references.len()))
    ));
    if report.references.is_empty() {
        output.push_str("  none\n");
    }
    for reference in &report.references {
        output.push_str(&format_reference_line(reference, use_colors, verbose));
    }

    output.push_str(&format!(
        "\n{}\n",
        paint(use_colors, Style::new().bold(), format!("Textures ({})", report.textures.len()))
    ));
    if report.textures.is_empty() {
        output.push_str("  none\n");
    }
    for texture in &report.textures {
        output.push_str(&format_texture_line(texture, use_colors, verbose));
    }

    output.push_str(&format!(
        "\nTiled sets: {}, texture files: {}\n",
        report.tiled_textures().len(),
        report.texture_file_count()
    ));

    if !report.issues.is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            paint(use_colors, Yellow.bold(), format!("Issues encountered: {}", report.issues.len()))
        ));
        if verbose {
            for issue in &report.issues {
                let label = match issue.kind {
                    IssueKind::NotFound => paint(use_colors, Yellow.normal(), "NOT FOUND"),
                    IssueKind::UnreadableDocument => paint(use_colors, Red.normal(), "UNREADABLE"),
                    IssueKind::ProviderFailure => paint(use_colors, Red.normal(), "PROVIDER"),
                    IssueKind::DepthLimit => paint(use_colors, Yellow.normal(), "DEPTH LIMIT"),
                };
                output.push_str(&format!("  [{}] {}: {}\n", label, issue.path.display(), issue.message));
            }
        } else {
            output.push_str("  Run with --verbose to list them.\n");
        }
    }

    output
}

/// One-line summary used in quiet mode
pub fn format_report_summary(report: &AnalysisReport) -> String {
    format!(
        "References: {}, Textures: {}, Tiled sets: {}, Issues: {}\n",
        report.references.len(),
        report.textures.len(),
        report.tiled_textures().len(),
        report.issues.len()
    )
}

fn format_copied_line(file: &CopiedFile, use_colors: bool) -> String {
    format!(
        "  {} -> {}\n",
        paint(use_colors, Style::new().dimmed(), file.source.display().to_string()),
        file.target.display()
    )
}

/// Format a copy report as text
pub fn format_copy_report_text(report: &CopyReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    let status = if report.success {
        paint(use_colors, Green.bold(), &report.message)
    } else {
        paint(use_colors, Red.bold(), &report.message)
    };
    output.push_str(&format!("{}\n", status));

    if verbose {
        if let Some(main) = &report.copied.main {
            output.push_str("Main:\n");
            output.push_str(&format_copied_line(main, use_colors));
        }
        if !report.copied.references.is_empty() {
            output.push_str("References:\n");
            for file in &report.copied.references {
                output.push_str(&format_copied_line(file, use_colors));
            }
        }
        if !report.copied.textures.is_empty() {
            output.push_str("Textures:\n");
            for file in &report.copied.textures {
                output.push_str(&format_copied_line(file, use_colors));
            }
        }
    }

    if !report.skipped.is_empty() {
        output.push_str(&format!(
            "{}\n",
            paint(use_colors, Yellow.bold(), format!("Skipped ({})", report.skipped.len()))
        ));
        for skipped in &report.skipped {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                skipped.category,
                skipped.source.display(),
                skipped.reason
            ));
        }
    }

    output
}

/// Format an analysis report as JSON
pub fn format_report_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(&report.to_document()).map_err(|e| WalkerError::JsonSerialize { source: e })
}

/// Format a copy report as JSON
pub fn format_copy_report_json(report: &CopyReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| WalkerError::JsonSerialize { source: e })
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| WalkerError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| WalkerError::CsvSerialize { source: e })
}

/// Format an analysis report as CSV, one row per dependency
pub fn format_report_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["Category", "Path", "Kind", "Source", "Tiled", "Texture Count"])?;

    for reference in &report.references {
        writer.write_record([
            "reference",
            display_path(reference.resolved_path.as_deref(), &reference.raw_token).as_str(),
            reference.kind.to_string().as_str(),
            "",
            "",
            "",
        ])?;
    }

    for texture in &report.textures {
        writer.write_record([
            "texture",
            display_path(texture.resolved_path.as_deref(), &texture.raw_token).as_str(),
            "",
            texture.source.as_str(),
            texture.is_tiled.to_string().as_str(),
            texture.tile_count.to_string().as_str(),
        ])?;
    }

    for issue in &report.issues {
        writer.write_record([
            "issue",
            issue.path.display().to_string().as_str(),
            issue.kind.to_string().as_str(),
            issue.message.as_str(),
            "",
            "",
        ])?;
    }

    finish_csv(writer)
}

/// Format a copy report as CSV, one row per copied or skipped file
pub fn format_copy_report_csv(report: &CopyReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let status = if report.dry_run { "planned" } else { "copied" };

    writer.write_record(["Status", "Category", "Source", "Target", "Detail"])?;

    let copied = report
        .copied
        .main
        .iter()
        .chain(&report.copied.references)
        .chain(&report.copied.textures);
    for file in copied {
        writer.write_record([
            status,
            file.category.to_string().as_str(),
            file.source.display().to_string().as_str(),
            file.target.display().to_string().as_str(),
            file.source_info.as_str(),
        ])?;
    }

    for skipped in &report.skipped {
        writer.write_record([
            "skipped",
            skipped.category.to_string().as_str(),
            skipped.source.display().to_string().as_str(),
            "",
            skipped.reason.as_str(),
        ])?;
    }

    finish_csv(writer)
}
