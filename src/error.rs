//! Error taxonomy for a generation run.
//!
//! Every failure is fatal: the run stops at the first error and produces no
//! partial output. Each variant carries the key path of the offending field so
//! the sample document can be fixed.

use std::fmt;

use thiserror::Error;

use crate::ir::{FieldPath, Primitive};
use crate::sample::ValueKind;

/// Where an unsupported value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSite {
    Document,
    Field,
    SequenceElement,
}

impl fmt::Display for ValueSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Document => "as the document root",
            Self::Field => "as a field value",
            Self::SequenceElement => "as a sequence element",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// A manufactured name does not survive the casing round trip, or is a reserved word.
    #[error("naming error at `{path}`: {message}")]
    Naming { path: FieldPath, message: String },
    /// Scope-name allocation or type ordering invariant violated.
    #[error("generation error at `{path}`: {message}")]
    Generation { path: FieldPath, message: String },
    #[error("empty sequence at `{path}`: cannot infer an element type from zero samples")]
    EmptySequence { path: FieldPath },
    #[error("unsupported element type at `{path}`: {kind} is not supported {site}")]
    UnsupportedElementType { path: FieldPath, kind: ValueKind, site: ValueSite },
    /// The accessor table has no entry for a primitive kind in use.
    #[error("no accessor registered for primitive kind `{kind}` (needed by `{path}`)")]
    UnregisteredAccessor { path: FieldPath, kind: Primitive },
}

impl GenError {
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Naming { path, .. }
            | Self::Generation { path, .. }
            | Self::EmptySequence { path }
            | Self::UnsupportedElementType { path, .. }
            | Self::UnregisteredAccessor { path, .. } => path,
        }
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
