//! Best-effort presentation of lexer errors.

use crate::LexError;

/// Error returned by a [`DiagnosticSink`] that could not present a report.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives every lexer error, with the full template, just before the
/// error is returned.
///
/// Reporting is best effort: a failing sink is logged and otherwise
/// ignored, and never changes which error the lexer returns.
pub trait DiagnosticSink {
    /// Present `error.span` within `source`.
    fn report_span(&mut self, source: &str, error: &LexError) -> Result<(), SinkError>;
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report_span(&mut self, source: &str, error: &LexError) -> Result<(), SinkError> {
        (**self).report_span(source, error)
    }
}

/// Collects reported errors in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub reports: Vec<LexError>,
}

impl DiagnosticSink for CollectingSink {
    fn report_span(&mut self, _source: &str, error: &LexError) -> Result<(), SinkError> {
        self.reports.push(error.clone());
        Ok(())
    }
}
