//! Prelude module for convenient imports.
//!
//! Re-exports what a host needs to drive the processor, so a single import
//! is enough to get started.
//!
//! # Usage
//!
//! ```rust
//! use prodgen::prelude::*;
//!
//! let processor = ProductProcessor::new(
//!     MetadataRegistry::new(),
//!     MemoryWriter::new(),
//!     ProcessorConfig::default(),
//! );
//! assert_eq!(processor.state(), AccumulatorState::Collecting);
//! ```
//!
//! # What's Included
//!
//! ## Driving rounds
//!
//! - [`ProductProcessor`]: per-round entry point
//! - [`RoundOutcome`]: what one round recorded, rejected and generated
//! - [`ProcessorConfig`]: output location and rendered operations
//!
//! ## Collaborators
//!
//! - [`MetadataSource`] and the in-memory [`MetadataRegistry`]
//! - [`ArtifactWriter`] with [`FsWriter`] and [`MemoryWriter`]
//! - [`DiagnosticSink`] with the [`Diagnostics`] collector

pub use crate::accumulator::AccumulatorState;
pub use crate::codegen::DerivedOperation;
pub use crate::config::ProcessorConfig;
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
pub use crate::error::{ProcessorError, ProcessorResult};
pub use crate::processor::{ProductProcessor, RoundOutcome};
pub use crate::source::{DeclarationId, MetadataRegistry, MetadataSource};
pub use crate::writer::{ArtifactWriter, FsWriter, MemoryWriter};
