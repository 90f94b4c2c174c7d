//! Processor configuration.
//!
//! Built with `typed-builder`. Every option has a default, so
//! `ProcessorConfig::default()` is a working configuration.

use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::codegen::DerivedOperation;

/// Directory generated files land in when no output root is given.
pub const DEFAULT_OUTPUT_ROOT: &str = "target/prodgen";

/// Configuration for a [`ProductProcessor`](crate::ProductProcessor).
///
/// # Examples
///
/// ```
/// use prodgen::config::ProcessorConfig;
/// use prodgen::codegen::DerivedOperation;
///
/// // Create with defaults
/// let config = ProcessorConfig::default();
/// assert!(config.derives(DerivedOperation::Display));
/// assert!(!config.derives(DerivedOperation::Hash));
///
/// // Customize options
/// let config = ProcessorConfig::builder()
///     .output_root("out/generated")
///     .root_path("my_crate")
///     .operations(vec![DerivedOperation::PartialEq, DerivedOperation::Product])
///     .build();
/// assert!(!config.derives(DerivedOperation::Display));
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct ProcessorConfig {
    /// Directory the filesystem writer places generated files under
    #[builder(default = PathBuf::from(DEFAULT_OUTPUT_ROOT), setter(into))]
    pub output_root: PathBuf,

    /// Path generated code uses to reach the runtime crate
    #[builder(default = String::from("::prodgen_runtime"), setter(into))]
    pub runtime_path: String,

    /// Prefix joined in front of qualified declaration names in generated impls
    #[builder(default = String::from("crate"), setter(into))]
    pub root_path: String,

    /// Operations rendered for every declaration
    #[builder(default = DerivedOperation::DEFAULTS.to_vec())]
    pub operations: Vec<DerivedOperation>,

    /// Emit the `@generated` header comment
    #[builder(default = true)]
    pub header: bool,
}

impl ProcessorConfig {
    /// Create a default configuration writing under `output_root`
    pub fn new<P: Into<PathBuf>>(output_root: P) -> Self {
        Self::builder().output_root(output_root).build()
    }

    pub fn derives(&self, operation: DerivedOperation) -> bool {
        self.operations.contains(&operation)
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
