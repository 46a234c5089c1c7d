//! Types for standardized reports to the user about parsing and commands.
//!
//! Row-level problems found while parsing are never raised as errors: the
//! line is dropped, and a message is added to a [`Report`]. Callers should
//! inspect the report (or the dropped count) to detect data-quality issues.
//!

use crate::error::Rejection;

/// The [`CommandOutput<U>`] type output is generic over some data output
/// from a command, and a [`Report`] that reports information to the user.
pub struct CommandOutput<U> {
    pub value: U,
    pub report: Report,
}

impl<U> CommandOutput<U> {
    pub fn new(value: U, report: Report) -> Self {
        Self { value, report }
    }
}

/// A type to (semi) standardize reporting to the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    entries: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, message: String) {
        self.entries.push(message)
    }

    /// Record why a line was dropped.
    pub fn add_rejection(&mut self, line_number: usize, rejection: &Rejection) {
        self.entries
            .push(format!("Line {}: {}", line_number, rejection))
    }

    /// Put a message before all others, e.g. a summary.
    pub fn prepend(&mut self, message: String) {
        self.entries.insert(0, message)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages_and_summary() {
        let mut report = Report::new();
        report.add_rejection(4, &Rejection::InvalidLeft("abc".to_string()));
        report.add_rejection(9, &Rejection::MissingColumn("left", 1));
        report.prepend("2 Lines dropped".to_string());

        assert_eq!(report.len(), 3);
        assert_eq!(report.entries()[0], "2 Lines dropped");
        assert_eq!(report.entries()[1], "Line 4: invalid left position 'abc'");
        assert!(report.entries()[2].starts_with("Line 9: "));
    }
}
