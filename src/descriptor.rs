//! Normalized description of an annotated declaration.

use prodgen_metadata::names::PATH_SEPARATOR;

/// One constructor parameter: its name and fully-qualified type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    name: String,
    type_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Tuple-struct fields are named by their position (`0`, `1`, ...).
    pub fn is_positional(&self) -> bool {
        !self.name.is_empty() && self.name.bytes().all(|b| b.is_ascii_digit())
    }
}

/// A validated declaration, as the accumulator stores it.
///
/// `fields` keeps constructor parameter order; generated members follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationDescriptor<H> {
    handle: H,
    qualified_name: String,
    package: String,
    simple_name: String,
    fields: Vec<FieldDescriptor>,
}

impl<H> DeclarationDescriptor<H> {
    /// `package` is `::`-separated and may be empty; `simple_name` may name a
    /// nested declaration as `Outer::Inner`.
    pub fn new(
        handle: H,
        package: impl Into<String>,
        simple_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        let package = package.into();
        let simple_name = simple_name.into();
        let qualified_name = if package.is_empty() {
            simple_name.clone()
        } else {
            format!("{}{}{}", package, PATH_SEPARATOR, simple_name)
        };

        Self {
            handle,
            qualified_name,
            package,
            simple_name,
            fields,
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Same name and same ordered fields, regardless of handle.
    pub fn same_structure<O>(&self, other: &DeclarationDescriptor<O>) -> bool {
        self.qualified_name == other.qualified_name && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let d = DeclarationDescriptor::new(1u32, "geo::shapes", "Point", vec![]);
        assert_eq!(d.qualified_name(), "geo::shapes::Point");

        let root = DeclarationDescriptor::new(2u32, "", "Point", vec![]);
        assert_eq!(root.qualified_name(), "Point");
        assert_eq!(root.package(), "");
    }

    #[test]
    fn test_positional_fields() {
        assert!(FieldDescriptor::new("0", "u8").is_positional());
        assert!(FieldDescriptor::new("12", "u8").is_positional());
        assert!(!FieldDescriptor::new("x0", "u8").is_positional());
        assert!(!FieldDescriptor::new("", "u8").is_positional());
    }

    #[test]
    fn test_same_structure_ignores_handle() {
        let fields = vec![FieldDescriptor::new("x", "i32")];
        let a = DeclarationDescriptor::new(1u32, "geo", "Point", fields.clone());
        let b = DeclarationDescriptor::new("other", "geo", "Point", fields);
        let c = DeclarationDescriptor::new(1u32, "geo", "Point", vec![]);

        assert!(a.same_structure(&b));
        assert!(!a.same_structure(&c));
    }
}
