//! Span-tagged diagnostics produced by the parse/validate pass.
//!
//! Diagnostics never abort a pass. The parser and validator append to a
//! [`DiagnosticSet`] as they go, and the editor consumes the whole set once
//! the pass completes: the error list reads [`DiagnosticSet::sorted`], and
//! squiggle rendering uses each diagnostic's line/column/length span.
//!
//! One set exists per pass. A reparse replaces the set wholesale; sets are
//! never merged across passes.

use std::cmp::Ordering;
use std::fmt;

/// Unified numeric severity scale reported by the validator.
///
/// Severities at or above [`ERROR_SEVERITY_THRESHOLD`] classify as errors;
/// everything below is demoted to a warning, never dropped.
pub type Severity = u8;

/// Lowest severity that still classifies as an error.
pub const ERROR_SEVERITY_THRESHOLD: Severity = 5;

/// A single error or warning anchored to a source span.
///
/// Two diagnostics are considered equal when their `(line, column)` anchors
/// coincide, even if the messages differ. That rule is intentional: the
/// editor deduplicates squiggles by position, not by text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// One-based source line.
    pub line: u32,
    /// One-based source column.
    pub column: u32,
    /// Length of the offending span, in characters.
    pub length: u32,
    /// Whether this diagnostic is a warning rather than an error.
    pub is_warning: bool,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, line: u32, column: u32, length: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            length,
            is_warning: false,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, line: u32, column: u32, length: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            length,
            is_warning: true,
        }
    }

    /// The `(line, column)` key used for ordering and equality.
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for Diagnostic {}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_warning { "warning" } else { "error" };
        write!(
            f,
            "{}: {} ({}:{})",
            level, self.message, self.line, self.column
        )
    }
}

/// Insertion-ordered collection of diagnostics for a single pass.
///
/// Appends are immediately visible to subsequent reads within the pass.
/// Severity counts are maintained incrementally so `error_count` and
/// `warning_count` are O(1).
#[derive(Debug, Default)]
pub struct DiagnosticSet {
    items: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticSet {
    /// Create an empty set for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error diagnostic.
    pub fn add_error(&mut self, message: impl Into<String>, line: u32, column: u32, length: u32) {
        self.push(Diagnostic::error(message, line, column, length));
    }

    /// Append a warning diagnostic.
    pub fn add_warning(&mut self, message: impl Into<String>, line: u32, column: u32, length: u32) {
        self.push(Diagnostic::warning(message, line, column, length));
    }

    /// Append a diagnostic classified by numeric severity.
    ///
    /// Severities below [`ERROR_SEVERITY_THRESHOLD`] are recorded as
    /// warnings; at or above, as errors.
    pub fn add_with_severity(
        &mut self,
        message: impl Into<String>,
        line: u32,
        column: u32,
        length: u32,
        severity: Severity,
    ) {
        let diagnostic = if severity < ERROR_SEVERITY_THRESHOLD {
            Diagnostic::warning(message, line, column, length)
        } else {
            Diagnostic::error(message, line, column, length)
        };
        self.push(diagnostic);
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning {
            self.warning_count += 1;
        } else {
            self.error_count += 1;
        }
        self.items.push(diagnostic);
    }

    /// Diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// A new ordering by `(line, column)` ascending.
    ///
    /// The sort is stable: diagnostics anchored at the same position keep
    /// their relative insertion order. Insertion order in the set itself is
    /// left untouched. An empty set yields an empty vector.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut sorted = self.items.clone();
        sorted.sort_by_key(Diagnostic::position);
        sorted
    }

    /// Number of error diagnostics. O(1).
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warning diagnostics. O(1).
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Total number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set holds no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
