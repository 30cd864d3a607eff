//! Threshold evaluation and plugin output.

use std::fmt;

/// Monitoring plugin service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning and critical levels. No ordering between them is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: i64,
    pub critical: i64,
}

impl Thresholds {
    pub fn new(warning: i64, critical: i64) -> Self {
        Self { warning, critical }
    }

    /// Critical is checked first, so `value == critical` is always CRITICAL
    /// even when `warning > critical`.
    pub fn classify(&self, value: i64) -> Severity {
        if value >= self.critical {
            Severity::Critical
        } else if value >= self.warning {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}

/// Outcome of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub severity: Severity,
    pub value: i64,
    pub thresholds: Thresholds,
    pub label: String,
}

impl Verdict {
    pub fn evaluate(value: i64, thresholds: Thresholds, label: impl Into<String>) -> Self {
        Self {
            severity: thresholds.classify(value),
            value,
            thresholds,
            label: label.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

/// `<SEVERITY>: <value> <label>|hits=<value>;<warn>;<crit>;;`
impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}|hits={};{};{};;",
            self.severity,
            self.value,
            self.label,
            self.value,
            self.thresholds.warning,
            self.thresholds.critical
        )
    }
}

/// Status line for an error that aborted the run, folded onto one line.
pub fn unknown_line(error: &dyn std::error::Error) -> String {
    let message = error.to_string();
    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}: {}", Severity::Unknown, message)
}
