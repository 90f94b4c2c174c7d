use std::path::PathBuf;

use proc_macro2::{Ident, Span};
use syn::{Index, Member, Path};

use crate::descriptor::{DeclarationDescriptor, FieldDescriptor};

/// Generated files use this extension.
pub const GENERATED_EXTENSION: &str = "rs";

/// Separator between nested declaration names in a file stem. It can never
/// appear inside an identifier, so distinct names give distinct stems.
pub const NESTED_SEPARATOR: &str = ".";

/// Relative location of the file generated for a declaration.
///
/// Package segments become directories and the declaration's own name
/// becomes the file stem, all spelled exactly as declared. Nested
/// segments are joined with [`NESTED_SEPARATOR`].
/// (e.g., geo::shapes::Point -> geo/shapes/Point.rs,
/// net::Outer::Header -> net/Outer.Header.rs)
pub fn target_path<H>(descriptor: &DeclarationDescriptor<H>) -> Result<PathBuf, String> {
    let mut path = PathBuf::new();
    for segment in segments(descriptor.package()) {
        path.push(checked_segment(segment)?);
    }

    let stem = segments(descriptor.simple_name())
        .map(checked_segment)
        .collect::<Result<Vec<_>, _>>()?
        .join(NESTED_SEPARATOR);
    if stem.is_empty() {
        return Err(format!(
            "`{}` has no name to derive a file from",
            descriptor.qualified_name()
        ));
    }
    path.push(format!("{}.{}", stem, GENERATED_EXTENSION));
    Ok(path)
}

fn checked_segment(segment: &str) -> Result<&str, String> {
    if is_identifier(segment) {
        Ok(segment)
    } else {
        Err(format!("`{}` cannot be used as a path segment", segment))
    }
}

/// Member expression for a field: `self.x` for named fields, `self.0` for
/// positional ones.
pub fn member(field: &FieldDescriptor) -> Result<Member, String> {
    if field.is_positional() {
        let index = field
            .name()
            .parse::<u32>()
            .map_err(|e| format!("invalid positional field `{}`: {}", field.name(), e))?;
        return Ok(Member::Unnamed(Index {
            index,
            span: Span::call_site(),
        }));
    }
    field_ident(field.name()).map(Member::Named)
}

/// Identifier for a field name, escaped as a raw identifier when it is a
/// keyword.
pub fn field_ident(name: &str) -> Result<Ident, String> {
    if !is_identifier(name) {
        return Err(format!("`{}` is not a valid field name", name));
    }
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }
    match name {
        // Keywords that cannot be raw identifiers either
        "_" | "self" | "Self" | "super" | "crate" => {
            Err(format!("`{}` cannot be used as a field name", name))
        }
        _ => Ok(Ident::new_raw(name, Span::call_site())),
    }
}

/// Path of the declaration as seen from the generated file.
pub fn declaration_path<H>(
    root: &str,
    descriptor: &DeclarationDescriptor<H>,
) -> Result<Path, String> {
    let full = if root.is_empty() {
        descriptor.qualified_name().to_string()
    } else {
        format!("{}::{}", root, descriptor.qualified_name())
    };
    syn::parse_str::<Path>(&full).map_err(|e| format!("invalid declaration path `{}`: {}", full, e))
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split("::").filter(|s| !s.is_empty())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}
