// Common test utilities and helpers

#![allow(dead_code)]

use prodgen::{DeclarationId, MetadataRegistry};
use prodgen_metadata::{
    ClassFlags, ClassKind, ClassMetadata, Constructor, NameTableBuilder, TypeRef, ValueParameter,
};

/// Install a logger once per test binary; later calls are ignored
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Metadata for a product struct whose fields all have simple class types
pub fn product(qualified: &str, fields: &[(&str, &str)]) -> ClassMetadata {
    declaration(qualified, ClassKind::Struct, ClassFlags::PRODUCT, fields)
}

pub fn declaration(
    qualified: &str,
    kind: ClassKind,
    flags: ClassFlags,
    fields: &[(&str, &str)],
) -> ClassMetadata {
    let mut names = NameTableBuilder::new();
    let name = names.class(qualified);
    let value_parameters = fields
        .iter()
        .map(|(field, ty)| ValueParameter {
            name: names.string(field),
            ty: TypeRef::class(names.class(ty)),
        })
        .collect();

    ClassMetadata {
        name,
        kind,
        flags,
        constructors: vec![Constructor {
            is_primary: true,
            value_parameters,
        }],
        names: names.finish(),
    }
}

/// `Point { x: Int, y: Int }`
pub fn point() -> ClassMetadata {
    product("Point", &[("x", "Int"), ("y", "Int")])
}

/// A product with no constructor parameters
pub fn empty() -> ClassMetadata {
    product("Empty", &[])
}

/// A product with one parameter more than the supported maximum
pub fn too_big() -> ClassMetadata {
    let names: Vec<String> = (0..=prodgen::MAX_ARITY).map(|i| format!("f{i}")).collect();
    let fields: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "Int")).collect();
    product("TooBig", &fields)
}

/// Register every class, returning ids in the same order
pub fn register_all(
    registry: &mut MetadataRegistry,
    classes: &[ClassMetadata],
) -> Vec<DeclarationId> {
    classes
        .iter()
        .map(|class| registry.register(class).expect("fixture metadata encodes"))
        .collect()
}
