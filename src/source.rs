//! Where declaration metadata comes from.
//!
//! The processor never looks inside a declaration handle. It only compares
//! handles and asks a [`MetadataSource`] for the class description behind
//! one.

use std::fmt::Debug;
use std::hash::Hash;

use derive_more::{Display, From};
use prodgen_metadata::{ClassMetadata, MetadataError, MetadataResult};

/// Capability to decode the metadata behind a declaration handle.
pub trait MetadataSource {
    /// Host-supplied declaration identity.
    type Handle: Clone + Eq + Hash + Debug;

    fn class_metadata(&self, handle: &Self::Handle) -> MetadataResult<ClassMetadata>;

    /// Name used in diagnostics when the metadata itself cannot be read.
    fn describe(&self, handle: &Self::Handle) -> String {
        format!("{:?}", handle)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for &S {
    type Handle = S::Handle;

    fn class_metadata(&self, handle: &Self::Handle) -> MetadataResult<ClassMetadata> {
        (**self).class_metadata(handle)
    }

    fn describe(&self, handle: &Self::Handle) -> String {
        (**self).describe(handle)
    }
}

/// Handle issued by [`MetadataRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Display)]
#[display("#{_0}")]
pub struct DeclarationId(u32);

#[derive(Debug, Clone)]
struct RegistryEntry {
    label: String,
    bytes: Option<Vec<u8>>,
}

/// In-memory source holding encoded metadata per declaration.
///
/// Hosts that collect metadata up front (a `build.rs`, tests) register
/// each declaration here and pass the returned ids to the processor.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    entries: Vec<RegistryEntry>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `class` and registers it under its qualified name.
    pub fn register(&mut self, class: &ClassMetadata) -> MetadataResult<DeclarationId> {
        let label = class.names.qualified(class.name)?;
        let bytes = prodgen_metadata::encode(class)?;
        Ok(self.push(label, Some(bytes)))
    }

    /// Registers already-encoded bytes; they are only checked when read.
    pub fn insert_raw(&mut self, label: impl Into<String>, bytes: Vec<u8>) -> DeclarationId {
        self.push(label.into(), Some(bytes))
    }

    /// Registers a declaration the host saw but has no metadata for.
    pub fn insert_missing(&mut self, label: impl Into<String>) -> DeclarationId {
        self.push(label.into(), None)
    }

    /// Replaces the metadata behind `id`, as an incremental rebuild does
    /// when a declaration changes between rounds.
    pub fn update(&mut self, id: DeclarationId, class: &ClassMetadata) -> MetadataResult<()> {
        let bytes = prodgen_metadata::encode(class)?;
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or_else(|| MetadataError::Missing(id.to_string()))?;
        entry.label = class.names.qualified(class.name)?;
        entry.bytes = Some(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, label: String, bytes: Option<Vec<u8>>) -> DeclarationId {
        let id = DeclarationId(self.entries.len() as u32);
        self.entries.push(RegistryEntry { label, bytes });
        id
    }
}

impl MetadataSource for MetadataRegistry {
    type Handle = DeclarationId;

    fn class_metadata(&self, handle: &DeclarationId) -> MetadataResult<ClassMetadata> {
        let entry = self
            .entries
            .get(handle.0 as usize)
            .ok_or_else(|| MetadataError::Missing(handle.to_string()))?;
        match &entry.bytes {
            Some(bytes) => prodgen_metadata::decode(bytes),
            None => Err(MetadataError::Missing(entry.label.clone())),
        }
    }

    fn describe(&self, handle: &DeclarationId) -> String {
        self.entries
            .get(handle.0 as usize)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| handle.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodgen_metadata::{ClassFlags, ClassKind, NameTableBuilder};

    fn unit(name: &str) -> ClassMetadata {
        let mut names = NameTableBuilder::new();
        let name = names.class(name);
        ClassMetadata {
            name,
            kind: ClassKind::UnitStruct,
            flags: ClassFlags::PRODUCT,
            constructors: vec![Default::default()],
            names: names.finish(),
        }
    }

    #[test]
    fn test_register_and_read_back() {
        let mut registry = MetadataRegistry::new();
        let class = unit("geo::Origin");
        let id = registry.register(&class).unwrap();

        assert_eq!(registry.class_metadata(&id).unwrap(), class);
        assert_eq!(registry.describe(&id), "geo::Origin");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_metadata() {
        let mut registry = MetadataRegistry::new();
        let id = registry.insert_missing("geo::Ghost");

        match registry.class_metadata(&id) {
            Err(MetadataError::Missing(label)) => assert_eq!(label, "geo::Ghost"),
            other => panic!("expected missing metadata, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_handle() {
        let registry = MetadataRegistry::new();
        let id = DeclarationId::from(7);
        assert!(registry.class_metadata(&id).is_err());
        assert_eq!(registry.describe(&id), "#7");
    }

    #[test]
    fn test_update_replaces_metadata() {
        let mut registry = MetadataRegistry::new();
        let id = registry.register(&unit("geo::A")).unwrap();
        let replacement = unit("geo::B");

        registry.update(id, &replacement).unwrap();
        assert_eq!(registry.class_metadata(&id).unwrap(), replacement);
        assert_eq!(registry.describe(&id), "geo::B");
    }

    #[test]
    fn test_raw_bytes_are_checked_on_read() {
        let mut registry = MetadataRegistry::new();
        let id = registry.insert_raw("junk", vec![1, 2, 3]);
        assert!(registry.class_metadata(&id).is_err());
    }
}
