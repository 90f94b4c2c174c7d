//! # prodgen
//!
//! Round-based code generator for declarations annotated as `product`.
//!
//! A host build (a compiler plugin, a `build.rs`, a test harness) hands the
//! processor, round by round, the declarations it found carrying the
//! annotation. The processor reads each declaration's serialized metadata,
//! checks that it is a product type with at most [`MAX_ARITY`] constructor
//! parameters, and remembers it. When the host signals the final round,
//! one Rust source file is generated per remembered declaration, deriving
//! `PartialEq`, `Display` and [`prodgen_runtime::Product`] (and `Hash` on
//! request) from the declaration's fields in constructor order.
//!
//! ## Features
//!
//! - **Metadata driven**: reads the versioned binary format of
//!   [`prodgen_metadata`], never source text
//! - **Isolated failures**: a broken declaration becomes a fatal
//!   [`Diagnostic`] while its siblings are still generated
//! - **Deterministic output**: the same declaration always renders to the
//!   same bytes
//! - **Pluggable I/O**: metadata comes from a [`MetadataSource`], files go
//!   to an [`ArtifactWriter`]
//!
//! ## Quick Start
//!
//! ```rust
//! use prodgen::prelude::*;
//! use prodgen_metadata::{
//!     ClassFlags, ClassKind, ClassMetadata, Constructor, NameTableBuilder, TypeRef,
//!     ValueParameter,
//! };
//!
//! // Describe `geo::Point { x: Int, y: Int }`
//! let mut names = NameTableBuilder::new();
//! let name = names.class("geo::Point");
//! let int = names.class("Int");
//! let value_parameters = ["x", "y"]
//!     .iter()
//!     .map(|field| ValueParameter { name: names.string(field), ty: TypeRef::class(int) })
//!     .collect();
//! let point = ClassMetadata {
//!     name,
//!     kind: ClassKind::Struct,
//!     flags: ClassFlags::PRODUCT,
//!     constructors: vec![Constructor { is_primary: true, value_parameters }],
//!     names: names.finish(),
//! };
//!
//! let mut registry = MetadataRegistry::new();
//! let id = registry.register(&point)?;
//!
//! let mut processor =
//!     ProductProcessor::new(registry, MemoryWriter::new(), ProcessorConfig::default());
//! let mut diagnostics = Diagnostics::new();
//!
//! // A single, final round
//! let outcome = processor.on_round([id], true, &mut diagnostics)?;
//! assert!(outcome.is_success());
//!
//! let generated = processor.writer().get("geo/Point.rs").unwrap();
//! assert!(generated.contains("impl ::prodgen_runtime::Product for crate::geo::Point"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accumulator;
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod processor;
pub mod source;
pub mod validate;
pub mod writer;

pub use accumulator::{AccumulatorState, Recorded, RoundAccumulator};
pub use codegen::{DerivedOperation, GeneratedArtifact, Generation, TEMPLATE_VERSION};
pub use config::ProcessorConfig;
pub use descriptor::{DeclarationDescriptor, FieldDescriptor};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
pub use error::{
    DeclarationError, ExtractionError, GenerationError, InvariantViolation, ProcessorError,
    ProcessorResult, ValidationError, WriteError,
};
pub use processor::{PRODUCT_ANNOTATION, ProductProcessor, RoundOutcome};
pub use source::{DeclarationId, MetadataRegistry, MetadataSource};
pub use validate::MAX_ARITY;
pub use writer::{ArtifactWriter, FsWriter, MemoryWriter};
