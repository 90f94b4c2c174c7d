//! # prodgen metadata
//!
//! The serialized, versioned description of a declaration that the
//! `prodgen` processor reads instead of source text.
//!
//! A host that knows a declaration's structure (a compiler plugin, a
//! `build.rs`, a test) produces a [`ClassMetadata`] with the help of a
//! [`NameTableBuilder`] and stores the bytes returned by [`encode`]. The
//! processor later turns those bytes back into a [`ClassMetadata`] with
//! [`decode`].
//!
//! ```
//! use prodgen_metadata::{
//!     ClassFlags, ClassKind, ClassMetadata, Constructor, NameTableBuilder, TypeRef,
//!     ValueParameter, decode, encode,
//! };
//!
//! let mut names = NameTableBuilder::new();
//! let name = names.class("geo::Point");
//! let int = names.class("i32");
//! let x = names.string("x");
//!
//! let class = ClassMetadata {
//!     name,
//!     kind: ClassKind::Struct,
//!     flags: ClassFlags::PRODUCT,
//!     constructors: vec![Constructor {
//!         is_primary: true,
//!         value_parameters: vec![ValueParameter { name: x, ty: TypeRef::class(int) }],
//!     }],
//!     names: names.finish(),
//! };
//!
//! let bytes = encode(&class).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), class);
//! ```

pub mod envelope;
pub mod error;
pub mod names;
pub mod schema;
pub mod version;

pub use envelope::{MetadataEnvelope, decode, encode, encode_with_version};
pub use error::{MetadataError, MetadataResult};
pub use names::{NameKind, NameTable, NameTableBuilder, QualifiedName};
pub use schema::{
    ClassFlags, ClassKind, ClassMetadata, Constructor, MAX_TYPE_DEPTH, TypeRef, ValueParameter,
};
pub use version::MetadataVersion;
