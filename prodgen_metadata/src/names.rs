//! Name table shipped alongside every class description.
//!
//! The class description never stores names inline. Parameter names point
//! into the string table and type references point into the qualified-name
//! table, whose entries chain to their parent segment. This keeps a
//! package prefix shared between every type that lives in it.

use std::collections::HashMap;

use bincode::{Decode, Encode};

use crate::error::{MetadataError, MetadataResult};
use crate::schema::{MAX_TYPE_DEPTH, TypeRef};

/// Separator used when joining qualified-name segments.
pub const PATH_SEPARATOR: &str = "::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum NameKind {
    Package,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct QualifiedName {
    /// Index of the enclosing segment, `None` at the root.
    pub parent: Option<u32>,
    /// Index into the string table.
    pub short: u32,
    pub kind: NameKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct NameTable {
    pub strings: Vec<String>,
    pub qualified: Vec<QualifiedName>,
}

impl NameTable {
    pub fn string(&self, index: u32) -> MetadataResult<&str> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(MetadataError::UnknownName { index })
    }

    /// Segments of a qualified name, outermost first.
    pub fn segments(&self, index: u32) -> MetadataResult<Vec<(NameKind, &str)>> {
        let mut segments = Vec::new();
        let mut cursor = Some(index);

        while let Some(current) = cursor {
            if segments.len() > self.qualified.len() {
                return Err(MetadataError::CyclicName { index });
            }
            let entry = self
                .qualified
                .get(current as usize)
                .ok_or(MetadataError::UnknownName { index: current })?;
            segments.push((entry.kind, self.string(entry.short)?));
            cursor = entry.parent;
        }

        segments.reverse();
        Ok(segments)
    }

    pub fn qualified(&self, index: u32) -> MetadataResult<String> {
        Ok(join(self.segments(index)?.into_iter().map(|(_, s)| s)))
    }

    /// Package part of a qualified name, empty for the root package.
    pub fn package_of(&self, index: u32) -> MetadataResult<String> {
        Ok(join(
            self.segments(index)?
                .into_iter()
                .filter(|(kind, _)| *kind == NameKind::Package)
                .map(|(_, s)| s),
        ))
    }

    /// Class part of a qualified name (`Outer::Inner` for nested classes).
    pub fn class_path(&self, index: u32) -> MetadataResult<String> {
        Ok(join(
            self.segments(index)?
                .into_iter()
                .filter(|(kind, _)| *kind == NameKind::Class)
                .map(|(_, s)| s),
        ))
    }

    /// Renders a type reference as a fully-qualified Rust type.
    pub fn type_name(&self, ty: &TypeRef) -> MetadataResult<String> {
        self.type_name_at(ty, 0)
    }

    fn type_name_at(&self, ty: &TypeRef, depth: usize) -> MetadataResult<String> {
        if depth >= MAX_TYPE_DEPTH {
            return Err(MetadataError::TypeTooDeep {
                limit: MAX_TYPE_DEPTH,
            });
        }
        let list = |types: &[TypeRef]| {
            types
                .iter()
                .map(|t| self.type_name_at(t, depth + 1))
                .collect::<MetadataResult<Vec<_>>>()
        };

        let rendered = match ty {
            TypeRef::Class {
                name,
                arguments,
                nullable,
            } => {
                let mut base = self.qualified(*name)?;
                if !arguments.is_empty() {
                    base = format!("{}<{}>", base, list(arguments)?.join(", "));
                }
                if *nullable {
                    format!("Option<{}>", base)
                } else {
                    base
                }
            }
            TypeRef::Parameter { name } => self.string(*name)?.to_string(),
            TypeRef::Tuple(elements) => {
                let elements = list(elements)?;
                match elements.as_slice() {
                    [single] => format!("({},)", single),
                    _ => format!("({})", elements.join(", ")),
                }
            }
            TypeRef::Array { element, len } => {
                format!("[{}; {}]", self.type_name_at(element, depth + 1)?, len)
            }
        };
        Ok(rendered)
    }
}

fn join<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments.collect::<Vec<_>>().join(PATH_SEPARATOR)
}

/// Interns strings and qualified names while a class description is built.
#[derive(Debug, Default)]
pub struct NameTableBuilder {
    table: NameTable,
    strings: HashMap<String, u32>,
    qualified: HashMap<(Option<u32>, u32, NameKind), u32>,
}

impl NameTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(&mut self, value: &str) -> u32 {
        if let Some(index) = self.strings.get(value) {
            return *index;
        }
        let index = self.table.strings.len() as u32;
        self.table.strings.push(value.to_string());
        self.strings.insert(value.to_string(), index);
        index
    }

    fn segment(&mut self, parent: Option<u32>, short: &str, kind: NameKind) -> u32 {
        let short = self.string(short);
        if let Some(index) = self.qualified.get(&(parent, short, kind)) {
            return *index;
        }
        let index = self.table.qualified.len() as u32;
        self.table.qualified.push(QualifiedName {
            parent,
            short,
            kind,
        });
        self.qualified.insert((parent, short, kind), index);
        index
    }

    /// Interns a class living in `package` (`::`-separated, may be empty).
    /// `class_path` may name a nested class as `Outer::Inner`.
    pub fn class_in(&mut self, package: &str, class_path: &str) -> u32 {
        let mut parent = None;
        for segment in split(package) {
            parent = Some(self.segment(parent, segment, NameKind::Package));
        }
        for segment in split(class_path) {
            parent = Some(self.segment(parent, segment, NameKind::Class));
        }
        // An empty class path still needs an entry to point at.
        parent.unwrap_or_else(|| self.segment(None, "", NameKind::Class))
    }

    /// Interns `a::b::Name`, treating every segment but the last as a package.
    pub fn class(&mut self, qualified: &str) -> u32 {
        match qualified.rsplit_once(PATH_SEPARATOR) {
            Some((package, name)) => self.class_in(package, name),
            None => self.class_in("", qualified),
        }
    }

    pub fn finish(self) -> NameTable {
        self.table
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_resolution() {
        let mut builder = NameTableBuilder::new();
        let point = builder.class("geo::shapes::Point");
        let table = builder.finish();

        assert_eq!(table.qualified(point).unwrap(), "geo::shapes::Point");
        assert_eq!(table.package_of(point).unwrap(), "geo::shapes");
        assert_eq!(table.class_path(point).unwrap(), "Point");
    }

    #[test]
    fn test_nested_class() {
        let mut builder = NameTableBuilder::new();
        let inner = builder.class_in("geo", "Outer::Inner");
        let table = builder.finish();

        assert_eq!(table.qualified(inner).unwrap(), "geo::Outer::Inner");
        assert_eq!(table.package_of(inner).unwrap(), "geo");
        assert_eq!(table.class_path(inner).unwrap(), "Outer::Inner");
    }

    #[test]
    fn test_interning_shares_prefixes() {
        let mut builder = NameTableBuilder::new();
        let a = builder.class("geo::Point");
        let b = builder.class("geo::Line");
        let again = builder.class("geo::Point");
        let table = builder.finish();

        assert_eq!(a, again);
        assert_ne!(a, b);
        // geo, Point, Line
        assert_eq!(table.qualified.len(), 3);
    }

    #[test]
    fn test_type_name_rendering() {
        let mut builder = NameTableBuilder::new();
        let vec = builder.class("std::vec::Vec");
        let string = builder.class("String");
        let t = builder.string("T");
        let table = builder.finish();

        let ty = TypeRef::Class {
            name: vec,
            arguments: vec![TypeRef::class(string)],
            nullable: true,
        };
        assert_eq!(table.type_name(&ty).unwrap(), "Option<std::vec::Vec<String>>");

        let tuple = TypeRef::Tuple(vec![TypeRef::Parameter { name: t }]);
        assert_eq!(table.type_name(&tuple).unwrap(), "(T,)");

        let unit = TypeRef::Tuple(vec![]);
        assert_eq!(table.type_name(&unit).unwrap(), "()");

        let array = TypeRef::Array {
            element: Box::new(TypeRef::class(string)),
            len: 4,
        };
        assert_eq!(table.type_name(&array).unwrap(), "[String; 4]");
    }

    #[test]
    fn test_type_name_depth_is_capped() {
        let mut builder = NameTableBuilder::new();
        let u8_ty = builder.class("u8");
        let table = builder.finish();

        let nested = |depth: usize| {
            (0..depth).fold(TypeRef::class(u8_ty), |inner, _| TypeRef::Tuple(vec![inner]))
        };
        assert!(table.type_name(&nested(MAX_TYPE_DEPTH - 1)).is_ok());
        assert!(matches!(
            table.type_name(&nested(10 * MAX_TYPE_DEPTH)),
            Err(MetadataError::TypeTooDeep { limit: MAX_TYPE_DEPTH })
        ));
    }

    #[test]
    fn test_unknown_index() {
        let table = NameTable::default();
        assert!(matches!(
            table.qualified(3),
            Err(MetadataError::UnknownName { index: 3 })
        ));
    }

    #[test]
    fn test_cyclic_parent_chain() {
        let table = NameTable {
            strings: vec!["a".into(), "b".into()],
            qualified: vec![
                QualifiedName {
                    parent: Some(1),
                    short: 0,
                    kind: NameKind::Class,
                },
                QualifiedName {
                    parent: Some(0),
                    short: 1,
                    kind: NameKind::Package,
                },
            ],
        };
        assert!(matches!(
            table.qualified(0),
            Err(MetadataError::CyclicName { index: 0 })
        ));
    }
}
