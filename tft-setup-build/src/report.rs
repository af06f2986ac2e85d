//! Build output formatting

use tft_setup_core::Diagnostics;

use crate::SetupError;

const RULE: &str = "══════════════════════════════════════════════════════════════════";

/// Width of the text inside a box row
const TEXT_WIDTH: usize = 63;

/// Format error message lines with box drawing
pub fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| format!("║  {} ║", fit(line, TEXT_WIDTH)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a list of problems as bulleted box rows
fn format_bullets<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("║  • {} ║", fit(item.as_ref(), TEXT_WIDTH - 2)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pad or truncate to exactly `width` characters
fn fit(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let truncated: String = line.chars().take(width - 3).collect();
        format!("{}...", truncated)
    } else {
        format!("{:<width$}", line, width = width)
    }
}

/// Render a rejected setup as the message a build script panics with
pub fn render_error(file: &str, err: &SetupError) -> String {
    let (title, body) = match err {
        SetupError::Read(e) => (
            format!("ERROR: Failed to read {}", file),
            format_error_lines(&format!("Error: {}", e)),
        ),
        SetupError::Syntax(e) => (
            format!("ERROR: Invalid TOML syntax in {}", file),
            format_error_lines(e),
        ),
        SetupError::MissingSections(missing) => (
            format!("ERROR: Missing required sections in {}", file),
            format_bullets(missing.iter()),
        ),
        SetupError::Parse(e) => (
            format!("ERROR: Invalid value in {}", file),
            format_error_lines(&e.to_string()),
        ),
        SetupError::Invalid(errors) => (
            format!("ERROR: Invalid display setup in {}", file),
            format_bullets(errors.iter().map(|e| e.to_string())),
        ),
    };

    format!(
        "\n╔{rule}╗\n║  {title} ║\n╠{rule}╣\n{body}\n╚{rule}╝\n",
        rule = RULE,
        title = fit(&title, TEXT_WIDTH),
        body = body,
    )
}

/// One line per warning and bus risk, for `cargo:warning=`
pub fn warning_lines(diag: &Diagnostics) -> Vec<String> {
    diag.warnings
        .iter()
        .map(|w| w.to_string())
        .chain(diag.risks.iter().map(|r| r.to_string()))
        .collect()
}
