//! Reads a declaration's fields out of its decoded metadata.

use log::trace;
use prodgen_metadata::MetadataError;

use crate::descriptor::{DeclarationDescriptor, FieldDescriptor};
use crate::error::ExtractionError;
use crate::source::MetadataSource;

/// Builds a descriptor from the primary constructor of the declaration
/// behind `handle`, one field per constructor parameter, in order.
pub fn extract<S: MetadataSource>(
    source: &S,
    handle: &S::Handle,
) -> Result<DeclarationDescriptor<S::Handle>, ExtractionError> {
    let unavailable = |source_error: MetadataError| ExtractionError::MetadataUnavailable {
        name: source.describe(handle),
        source: source_error,
    };

    let class = source.class_metadata(handle).map_err(unavailable)?;
    let names = &class.names;
    let qualified_name = names.qualified(class.name).map_err(unavailable)?;

    let not_product = || ExtractionError::NotAProductType {
        name: qualified_name.clone(),
        kind: class.kind,
    };

    if !class.is_product() {
        return Err(not_product());
    }
    let constructor = class.primary_constructor().ok_or_else(not_product)?;

    let mut fields = Vec::with_capacity(constructor.value_parameters.len());
    for param in &constructor.value_parameters {
        let field = names.string(param.name).map_err(unavailable)?;
        if let Some(parameter) = param.ty.find_parameter() {
            return Err(ExtractionError::GenericField {
                name: qualified_name,
                field: field.to_string(),
                parameter: names.string(parameter).map_err(unavailable)?.to_string(),
            });
        }
        let type_name = names.type_name(&param.ty).map_err(unavailable)?;
        fields.push(FieldDescriptor::new(field, type_name));
    }

    let package = names.package_of(class.name).map_err(unavailable)?;
    let simple_name = names.class_path(class.name).map_err(unavailable)?;

    trace!(
        "Extracted {} with {} fields from metadata",
        qualified_name,
        fields.len()
    );

    Ok(DeclarationDescriptor::new(
        handle.clone(),
        package,
        simple_name,
        fields,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MetadataRegistry;
    use prodgen_metadata::{
        ClassFlags, ClassKind, ClassMetadata, Constructor, NameTableBuilder, TypeRef,
        ValueParameter,
    };

    fn class_with(
        name: &str,
        kind: ClassKind,
        flags: ClassFlags,
        fields: &[(&str, &str)],
    ) -> ClassMetadata {
        let mut names = NameTableBuilder::new();
        let class_name = names.class(name);
        let value_parameters = fields
            .iter()
            .map(|(field, ty)| ValueParameter {
                name: names.string(field),
                ty: TypeRef::class(names.class(ty)),
            })
            .collect();
        ClassMetadata {
            name: class_name,
            kind,
            flags,
            constructors: vec![Constructor {
                is_primary: true,
                value_parameters,
            }],
            names: names.finish(),
        }
    }

    #[test]
    fn test_extracts_fields_in_constructor_order() {
        let mut registry = MetadataRegistry::new();
        let id = registry
            .register(&class_with(
                "geo::Point",
                ClassKind::Struct,
                ClassFlags::PRODUCT,
                &[("y", "Int"), ("x", "Int"), ("label", "alloc::string::String")],
            ))
            .unwrap();

        let descriptor = extract(&registry, &id).unwrap();
        assert_eq!(descriptor.qualified_name(), "geo::Point");
        assert_eq!(descriptor.package(), "geo");
        assert_eq!(descriptor.simple_name(), "Point");
        assert_eq!(
            descriptor.fields(),
            &[
                FieldDescriptor::new("y", "Int"),
                FieldDescriptor::new("x", "Int"),
                FieldDescriptor::new("label", "alloc::string::String"),
            ]
        );
        assert_eq!(descriptor.handle(), &id);
    }

    #[test]
    fn test_resolves_generic_and_nullable_types() {
        let mut names = NameTableBuilder::new();
        let class_name = names.class("store::Entry");
        let vec = names.class("std::vec::Vec");
        let u8_ty = names.class("u8");
        let tags = names.string("tags");
        let class = ClassMetadata {
            name: class_name,
            kind: ClassKind::Struct,
            flags: ClassFlags::PRODUCT,
            constructors: vec![Constructor {
                is_primary: true,
                value_parameters: vec![ValueParameter {
                    name: tags,
                    ty: TypeRef::Class {
                        name: vec,
                        arguments: vec![TypeRef::class(u8_ty)],
                        nullable: true,
                    },
                }],
            }],
            names: names.finish(),
        };
        let mut registry = MetadataRegistry::new();
        let id = registry.register(&class).unwrap();

        let descriptor = extract(&registry, &id).unwrap();
        assert_eq!(
            descriptor.fields()[0].type_name(),
            "Option<std::vec::Vec<u8>>"
        );
    }

    #[test]
    fn test_zero_parameters_is_a_product() {
        let mut registry = MetadataRegistry::new();
        let id = registry
            .register(&class_with(
                "Empty",
                ClassKind::UnitStruct,
                ClassFlags::PRODUCT,
                &[],
            ))
            .unwrap();

        let descriptor = extract(&registry, &id).unwrap();
        assert_eq!(descriptor.arity(), 0);
        assert_eq!(descriptor.package(), "");
    }

    #[test]
    fn test_rejects_non_product_kinds() {
        let mut registry = MetadataRegistry::new();
        let id = registry
            .register(&class_with(
                "geo::Shape",
                ClassKind::Enum,
                ClassFlags::PRODUCT,
                &[],
            ))
            .unwrap();

        match extract(&registry, &id) {
            Err(ExtractionError::NotAProductType { name, kind }) => {
                assert_eq!(name, "geo::Shape");
                assert_eq!(kind, ClassKind::Enum);
            }
            other => panic!("expected NotAProductType, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unflagged_struct() {
        let mut registry = MetadataRegistry::new();
        let id = registry
            .register(&class_with(
                "geo::Handle",
                ClassKind::Struct,
                ClassFlags::EMPTY,
                &[("raw", "u64")],
            ))
            .unwrap();

        assert!(matches!(
            extract(&registry, &id),
            Err(ExtractionError::NotAProductType { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_constructor() {
        let mut class = class_with("geo::Opaque", ClassKind::Struct, ClassFlags::PRODUCT, &[]);
        class.constructors.clear();
        let mut registry = MetadataRegistry::new();
        let id = registry.register(&class).unwrap();

        let err = extract(&registry, &id).unwrap_err();
        assert_eq!(err.declaration(), "geo::Opaque");
        assert!(err.to_string().contains("Cannot use @product on geo::Opaque"));
    }

    #[test]
    fn test_rejects_generic_fields() {
        let mut names = NameTableBuilder::new();
        let class_name = names.class("boxes::Boxed");
        let vec = names.class("std::vec::Vec");
        let value = names.string("value");
        let t = names.string("T");
        let class = ClassMetadata {
            name: class_name,
            kind: ClassKind::Struct,
            flags: ClassFlags::PRODUCT,
            constructors: vec![Constructor {
                is_primary: true,
                value_parameters: vec![ValueParameter {
                    name: value,
                    ty: TypeRef::Class {
                        name: vec,
                        arguments: vec![TypeRef::Parameter { name: t }],
                        nullable: false,
                    },
                }],
            }],
            names: names.finish(),
        };
        let mut registry = MetadataRegistry::new();
        let id = registry.register(&class).unwrap();

        match extract(&registry, &id) {
            Err(err @ ExtractionError::GenericField { .. }) => {
                assert_eq!(err.declaration(), "boxes::Boxed");
                let message = err.to_string();
                assert!(message.contains("Field value has the generic type T"));
            }
            other => panic!("expected GenericField, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_unavailable_is_propagated() {
        let mut registry = MetadataRegistry::new();
        let id = registry.insert_missing("geo::Ghost");

        match extract(&registry, &id) {
            Err(ExtractionError::MetadataUnavailable { name, source }) => {
                assert_eq!(name, "geo::Ghost");
                assert!(matches!(source, MetadataError::Missing(_)));
            }
            other => panic!("expected MetadataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_name_index_is_unavailable() {
        let mut class = class_with("geo::Bad", ClassKind::Struct, ClassFlags::PRODUCT, &[]);
        class.constructors[0].value_parameters.push(ValueParameter {
            name: 999,
            ty: TypeRef::class(0),
        });
        let mut registry = MetadataRegistry::new();
        let id = registry.register(&class).unwrap();

        assert!(matches!(
            extract(&registry, &id),
            Err(ExtractionError::MetadataUnavailable { .. })
        ));
    }
}
