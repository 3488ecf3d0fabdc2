use crate::record::{FieldError, RecordError};
use crate::table::{CodePoint, InvariantViolation};

/// Why a single property family failed to compile.
///
/// Every variant is fatal for its family. The caller decides whether the
/// remaining families still get compiled.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{source_name}:{line}: malformed record: {reason}")]
    MalformedRecord {
        source_name: String,
        line: usize,
        #[source]
        reason: FieldError,
    },

    #[error("family `{family}`: no assignments left in `{source_name}` after filtering")]
    EmptyInput { family: String, source_name: String },

    #[error("family `{family}`: ambiguous input, conflicting assignments for U+{code_point:04X}")]
    OverlapViolation { family: String, code_point: CodePoint },

    #[error("family `{family}`: default policy names unknown value {tag:?}")]
    UnknownDefaultTag { family: String, tag: String },

    #[error("family `{family}`: source `{source_name}` is not part of the snapshot")]
    MissingSource { family: String, source_name: String },

    #[error("family `{family}`: compiled table breaks an ordering invariant: {violation}")]
    Invariant {
        family: String,
        #[source]
        violation: InvariantViolation,
    },
}

impl CompileError {
    pub fn malformed(source_name: &str, err: RecordError) -> Self {
        CompileError::MalformedRecord { source_name: source_name.to_string(), line: err.line, reason: err.error }
    }

    pub fn overlap(family: &str, code_point: CodePoint) -> Self {
        CompileError::OverlapViolation { family: family.to_string(), code_point }
    }

    pub fn empty(family: &str, source_name: &str) -> Self {
        CompileError::EmptyInput { family: family.to_string(), source_name: source_name.to_string() }
    }
}
