use std::path::PathBuf;

use prodgen_metadata::{ClassKind, MetadataError};
use thiserror::Error;

use crate::accumulator::AccumulatorState;

pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Failures that end the processor's work for the whole invocation.
///
/// Per-declaration failures are not in here: they are reported as
/// diagnostics and the round carries on with the remaining declarations.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Why a single declaration produced no descriptor.
#[derive(Error, Debug)]
pub enum DeclarationError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DeclarationError {
    /// Name the offending declaration is reported under.
    pub fn declaration(&self) -> &str {
        match self {
            DeclarationError::Extraction(e) => e.declaration(),
            DeclarationError::Validation(e) => e.declaration(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Cannot use @product on {name}. It can only be used on product structs, found {kind}")]
    NotAProductType { name: String, kind: ClassKind },
    #[error("Cannot use @product on {name}. Field {field} has the generic type {parameter}")]
    GenericField {
        name: String,
        field: String,
        parameter: String,
    },
    #[error("Cannot read metadata of {name}: {source}")]
    MetadataUnavailable {
        name: String,
        #[source]
        source: MetadataError,
    },
}

impl ExtractionError {
    pub fn declaration(&self) -> &str {
        match self {
            ExtractionError::NotAProductType { name, .. } => name,
            ExtractionError::GenericField { name, .. } => name,
            ExtractionError::MetadataUnavailable { name, .. } => name,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{name} declares {actual} constructor parameters, up to max={max} are supported")]
    TooManyFields {
        name: String,
        actual: usize,
        max: usize,
    },
}

impl ValidationError {
    pub fn declaration(&self) -> &str {
        match self {
            ValidationError::TooManyFields { name, .. } => name,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Failed to render {name}: {reason}")]
    RenderFailure { name: String, reason: String },
    #[error("{first} and {second} both generate {}", .target.display())]
    DuplicateTarget {
        target: PathBuf,
        first: String,
        second: String,
    },
}

impl GenerationError {
    /// Declaration left without a file. For a duplicate target that is the
    /// later of the two.
    pub fn declaration(&self) -> &str {
        match self {
            GenerationError::RenderFailure { name, .. } => name,
            GenerationError::DuplicateTarget { second, .. } => second,
        }
    }
}

/// Misuse of the round protocol. These point at a bug in the host driver
/// or in the processor itself, never at user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Cannot record {name} while the accumulator is {state}")]
    RecordAfterFinalize {
        name: String,
        state: AccumulatorState,
    },
    #[error("Cannot forget a declaration while the accumulator is {state}")]
    ForgetAfterFinalize { state: AccumulatorState },
    #[error("Cannot finalize an accumulator that is already {state}")]
    AlreadyFinalized { state: AccumulatorState },
    #[error("Cannot finish an accumulator that is {state}")]
    FinishWithoutFinalize { state: AccumulatorState },
    #[error("A round was started after code generation completed")]
    RoundAfterDone,
    #[error("A round was started while a failed write was being finalized")]
    RoundDuringFinalize,
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Refusing to write different contents to {} twice", .path.display())]
    Conflict { path: PathBuf },
}
