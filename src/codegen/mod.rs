//! Turns validated descriptors into generated Rust source.
//!
//! Rendering is a pure function of a descriptor and the configuration:
//! the same input always yields byte-identical output, and every
//! descriptor yields exactly one [`GeneratedArtifact`] or one
//! [`GenerationError`]. Writing the artifact somewhere is left to an
//! [`ArtifactWriter`](crate::writer::ArtifactWriter).

pub mod naming;
pub mod operations;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use log::trace;
use strum::IntoEnumIterator;
use syn::Type;

pub use operations::{DerivedOperation, RenderContext};

use crate::config::ProcessorConfig;
use crate::descriptor::DeclarationDescriptor;
use crate::error::GenerationError;

/// Version of the rendering template. Bumped whenever generated output
/// changes for an unchanged descriptor.
pub const TEMPLATE_VERSION: u32 = 1;

/// A generated file: where it goes and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Path relative to the output root.
    pub target: PathBuf,
    pub contents: String,
}

/// Result of rendering a batch of descriptors.
///
/// A descriptor that cannot be rendered, or whose target is already taken
/// by an earlier descriptor, lands in `failures` and the rest are rendered
/// regardless.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Generation {
    /// Rendered artifacts, in descriptor order.
    pub artifacts: Vec<GeneratedArtifact>,
    pub failures: Vec<GenerationError>,
}

impl Generation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders one artifact per descriptor, in order.
pub fn generate<H>(
    descriptors: &[DeclarationDescriptor<H>],
    config: &ProcessorConfig,
) -> Generation {
    let mut owners: HashMap<PathBuf, &str> = HashMap::new();
    let mut generation = Generation::default();

    for descriptor in descriptors {
        let artifact = match render(descriptor, config) {
            Ok(artifact) => artifact,
            Err(e) => {
                generation.failures.push(e);
                continue;
            }
        };
        match owners.entry(artifact.target.clone()) {
            Entry::Occupied(first) => {
                generation.failures.push(GenerationError::DuplicateTarget {
                    target: artifact.target,
                    first: first.get().to_string(),
                    second: descriptor.qualified_name().to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(descriptor.qualified_name());
                generation.artifacts.push(artifact);
            }
        }
    }

    generation
}

/// Renders the artifact for a single descriptor.
pub fn render<H>(
    descriptor: &DeclarationDescriptor<H>,
    config: &ProcessorConfig,
) -> Result<GeneratedArtifact, GenerationError> {
    let failure = |reason: String| GenerationError::RenderFailure {
        name: descriptor.qualified_name().to_string(),
        reason,
    };

    let cx = context(descriptor, config).map_err(failure)?;

    let mut tokens = proc_macro2::TokenStream::new();
    for operation in DerivedOperation::iter().filter(|op| config.derives(*op)) {
        tokens.extend(operation.render(&cx));
    }

    let file = syn::parse2::<syn::File>(tokens)
        .map_err(|e| failure(format!("generated code does not parse: {}", e)))?;

    let mut contents = String::new();
    if config.header {
        contents.push_str(&header(descriptor));
    }
    contents.push_str(&prettyplease::unparse(&file));

    let target = naming::target_path(descriptor).map_err(failure)?;
    trace!(
        "Rendered {} into {} ({} bytes)",
        descriptor.qualified_name(),
        target.display(),
        contents.len()
    );

    Ok(GeneratedArtifact { target, contents })
}

fn header<H>(descriptor: &DeclarationDescriptor<H>) -> String {
    let fields = descriptor
        .fields()
        .iter()
        .map(|f| format!("{}: {}", f.name(), f.type_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "// @generated by prodgen (template v{}). Do not edit.\n\
         // Source: {} {{ {} }}\n\n",
        TEMPLATE_VERSION,
        descriptor.qualified_name(),
        fields
    )
}

fn context<H>(
    descriptor: &DeclarationDescriptor<H>,
    config: &ProcessorConfig,
) -> Result<RenderContext, String> {
    let ty = naming::declaration_path(&config.root_path, descriptor)?;
    let runtime = syn::parse_str::<syn::Path>(&config.runtime_path)
        .map_err(|e| format!("invalid runtime path `{}`: {}", config.runtime_path, e))?;

    let mut members = Vec::with_capacity(descriptor.arity());
    let mut field_names = Vec::with_capacity(descriptor.arity());
    let mut field_types = Vec::with_capacity(descriptor.arity());
    for field in descriptor.fields() {
        members.push(naming::member(field)?);
        field_names.push(field.name().to_string());
        field_types.push(
            syn::parse_str::<Type>(field.type_name()).map_err(|e| {
                format!(
                    "type `{}` of field `{}` does not parse: {}",
                    field.type_name(),
                    field.name(),
                    e
                )
            })?,
        );
    }

    let display_name = descriptor
        .simple_name()
        .rsplit("::")
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(RenderContext {
        ty,
        runtime,
        qualified_name: descriptor.qualified_name().to_string(),
        display_name,
        members,
        field_names,
        field_types,
    })
}
