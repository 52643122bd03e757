//! Error taxonomy for the interpreter, optimizer, and rewriter.
//!
//! Every fatal condition that can arise while stepping a program is a
//! `StepError` variant. All of them render as `[Line L] message`, matching
//! the format the driver and orchestrator print on failure.

use thiserror::Error;

/// A fatal error raised while interpreting, analyzing, or rewriting a program.
///
/// There is no local recovery: every variant aborts the current run (the
/// REPL session or the orchestrator's current pass).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    #[error("[Line {line}] {message}")]
    Parse { line: u32, message: String },

    #[error("[Line {line}] unknown variable '{name}'")]
    UnknownVariable { line: u32, name: String },

    #[error("[Line {line}] unknown function '{name}'")]
    UnknownFunction { line: u32, name: String },

    #[error("[Line {line}] arity mismatch calling '{name}': expected {expected}, got {found}")]
    ArityMismatch {
        line: u32,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("[Line {line}] void must be the lone parameter of '{name}'")]
    VoidParameterMisuse { line: u32, name: String },

    #[error("[Line {line}] array index did not resolve synchronously")]
    ArrayIndexUnresolved { line: u32 },

    #[error("[Line {line}] division by zero")]
    DivisionByZero { line: u32 },

    #[error("[Line {line}] invalid operator '{op}'")]
    InvalidOperator { line: u32, op: String },

    #[error("[Line {line}] invalid cast to '{ty}'")]
    InvalidCast { line: u32, ty: String },

    #[error("[Line {line}] invalid comparator '{cmp}'")]
    InvalidComparator { line: u32, cmp: String },

    #[error("[Line {line}] unassigned read of '{name}'")]
    UnassignedRead { line: u32, name: String },

    #[error("[Line {line}] array index {index} out of bounds for '{name}' (size {size})")]
    ArrayIndexOutOfBounds {
        line: u32,
        name: String,
        index: i64,
        size: usize,
    },
}

impl StepError {
    /// The line number the error is attached to, for display and for the
    /// REPL's "errors are printed, the optimizer run still proceeds" rule.
    pub fn line(&self) -> u32 {
        match self {
            StepError::Parse { line, .. }
            | StepError::UnknownVariable { line, .. }
            | StepError::UnknownFunction { line, .. }
            | StepError::ArityMismatch { line, .. }
            | StepError::VoidParameterMisuse { line, .. }
            | StepError::ArrayIndexUnresolved { line }
            | StepError::DivisionByZero { line }
            | StepError::InvalidOperator { line, .. }
            | StepError::InvalidCast { line, .. }
            | StepError::InvalidComparator { line, .. }
            | StepError::UnassignedRead { line, .. }
            | StepError::ArrayIndexOutOfBounds { line, .. } => *line,
        }
    }
}

pub type StepResult<T> = Result<T, StepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_as_bracketed_line_message() {
        let e = StepError::DivisionByZero { line: 4 };
        assert_eq!(e.to_string(), "[Line 4] division by zero");
    }

    #[test]
    fn line_accessor_matches_every_variant() {
        let e = StepError::UnknownVariable { line: 9, name: "x".into() };
        assert_eq!(e.line(), 9);
    }
}
