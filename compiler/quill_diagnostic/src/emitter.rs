//! Terminal rendering.
//!
//! Renders a [`Diagnostic`] with the offending source line underlined,
//! using `ariadne` for layout.

use std::io;
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::{Diagnostic, Severity};

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn byte_range(source: &str, offset: u32, width: u32) -> Range<usize> {
    let mut start = (offset as usize).min(source.len());
    if start == source.len() {
        // point at the last character rather than past the end
        start = source.char_indices().next_back().map_or(0, |(i, _)| i);
    }
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + width.max(1) as usize).min(source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    start..end
}

/// Write `diagnostic` against `source` to `out`.
pub fn emit<W: io::Write>(
    out: &mut W,
    diagnostic: &Diagnostic,
    source: &str,
    colors: bool,
) -> io::Result<()> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    };
    let primary = byte_range(source, diagnostic.position.offset, diagnostic.width);
    let mut report = Report::build(kind, (), primary.start)
        .with_code(diagnostic.code)
        .with_message(format!("{} at {}", diagnostic.message, diagnostic.position))
        .with_config(
            Config::default()
                .with_color(colors)
                .with_index_type(IndexType::Byte),
        )
        .with_label(
            Label::new(primary)
                .with_message(diagnostic.code.description())
                .with_color(Color::Red),
        );
    for label in &diagnostic.labels {
        report = report.with_label(
            Label::new(byte_range(source, label.position.offset, 1))
                .with_message(&label.message)
                .with_color(Color::Blue),
        );
    }
    for note in &diagnostic.notes {
        report = report.with_note(note);
    }
    report.finish().write(Source::from(source), out)
}

/// Render to a string without colors.
pub fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let mut buf = Vec::new();
    if emit(&mut buf, diagnostic, source, false).is_err() {
        return diagnostic.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
