//! Diagnostic rendering for template errors.

use std::io::Write;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use vnt_lexer::{DiagnosticSink, LexError, LexErrorKind, SinkError};

use crate::document::escape_html;

/// Render a lexer error with ariadne.
///
/// Returns a string containing the formatted error message with source context.
pub fn render(error: &LexError, filename: &str, source: &str) -> String {
    let mut output = Vec::new();
    match write_report(error, filename, source, &mut output) {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}

/// Write the error report to a writer.
pub fn write_report<W: Write>(
    error: &LexError,
    filename: &str,
    source: &str,
    writer: W,
) -> std::io::Result<()> {
    build_report(error, filename, source)
        .finish()
        .write((filename, Source::from(source)), writer)
}

fn build_report<'a>(
    error: &LexError,
    filename: &'a str,
    source: &str,
) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
    let range: std::ops::Range<usize> = error.span.into();
    let label = match &error.kind {
        LexErrorKind::ChildrenWithoutParent | LexErrorKind::ChildrenOnText => {
            "children opened here".to_string()
        }
        LexErrorKind::AttributesOnNull | LexErrorKind::AttributesOnText => {
            "attributes opened here".to_string()
        }
        LexErrorKind::DuplicateAttributes => "second attribute group".to_string(),
        LexErrorKind::UnknownCharacter(c) => format!("{c:?} is not allowed here"),
        LexErrorKind::UnterminatedQuote => "quote opened here".to_string(),
        LexErrorKind::UnterminatedAttributeList => "attribute group opened here".to_string(),
        LexErrorKind::MissingComma => format!("in `{}`", error.snippet(source)),
        LexErrorKind::InvalidAttributeKey => "not a valid key".to_string(),
        LexErrorKind::AttributeValueNotQuoted => "expected a quote".to_string(),
        LexErrorKind::UnmatchedCloseBracket => "nothing to close".to_string(),
        LexErrorKind::UnclosedChildren => "children opened here".to_string(),
        LexErrorKind::NestingTooDeep { limit } => format!("level {} opens here", limit + 1),
    };

    let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(format!("{} (line {})", error.kind, error.line))
        .with_label(
            Label::new((filename, range))
                .with_message(label)
                .with_color(Color::Red),
        );
    if let Some(help) = error.kind.help() {
        report = report.with_help(help);
    }
    report
}

/// A sink that writes an ariadne report for every error.
pub struct AriadneSink<W> {
    filename: String,
    writer: W,
}

impl<W: Write> AriadneSink<W> {
    /// Report errors in `filename` to `writer`.
    pub fn new(filename: impl Into<String>, writer: W) -> Self {
        Self {
            filename: filename.into(),
            writer,
        }
    }

    /// Take back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl AriadneSink<std::io::Stderr> {
    /// Report to standard error.
    pub fn stderr(filename: impl Into<String>) -> Self {
        Self::new(filename, std::io::stderr())
    }
}

impl<W: Write> DiagnosticSink for AriadneSink<W> {
    fn report_span(&mut self, source: &str, error: &LexError) -> Result<(), SinkError> {
        write_report(error, &self.filename, source, &mut self.writer)?;
        Ok(())
    }
}

/// A sink producing an HTML fragment of the template up to the error,
/// with the offending span highlighted.
#[derive(Debug, Default, Clone)]
pub struct HtmlSink {
    reports: Vec<String>,
}

impl HtmlSink {
    /// Create a sink with no reports.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent report.
    pub fn last(&self) -> Option<&str> {
        self.reports.last().map(String::as_str)
    }

    /// Every report, oldest first.
    pub fn reports(&self) -> &[String] {
        &self.reports
    }
}

impl DiagnosticSink for HtmlSink {
    fn report_span(&mut self, source: &str, error: &LexError) -> Result<(), SinkError> {
        let start = error.span.start as usize;
        let before = source.get(..start).ok_or("span outside of template")?;
        self.reports.push(format!(
            r#"<pre>{}<b style="color:orangered">{}</b></pre>"#,
            escape_html(before),
            escape_html(error.snippet(source)),
        ));
        Ok(())
    }
}
