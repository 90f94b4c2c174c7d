//! Two-layer binary encoding.
//!
//! The outer [`MetadataEnvelope`] is kept stable across every format
//! version: magic bytes, the version the payload was written with and the
//! payload itself. The payload is the bincode encoding of a
//! [`ClassMetadata`] and is only decoded once the version check passes.

use bincode::{Decode, Encode};

use crate::error::{MetadataError, MetadataResult};
use crate::schema::ClassMetadata;
use crate::version::MetadataVersion;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MetadataEnvelope {
    pub magic: [u8; 8],
    pub version: MetadataVersion,
    pub payload: Vec<u8>,
}

impl MetadataEnvelope {
    /// Magic bytes identifying declaration metadata.
    pub const MAGIC_BYTES: [u8; 8] = *b"\0PRODMD\0";
}

/// Upper bound on bytes a single decode may claim.
const DECODE_LIMIT: usize = 16 * 1024 * 1024;

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_limit::<DECODE_LIMIT>()
}

/// Encodes a class description at the current format version.
pub fn encode(class: &ClassMetadata) -> MetadataResult<Vec<u8>> {
    encode_with_version(class, MetadataVersion::CURRENT)
}

/// Encodes a class description, stamping the envelope with `version`.
pub fn encode_with_version(
    class: &ClassMetadata,
    version: MetadataVersion,
) -> MetadataResult<Vec<u8>> {
    let payload = bincode::encode_to_vec(class, config())?;
    let envelope = MetadataEnvelope {
        magic: MetadataEnvelope::MAGIC_BYTES,
        version,
        payload,
    };
    Ok(bincode::encode_to_vec(&envelope, config())?)
}

/// Decodes a class description, rejecting foreign data and versions this
/// reader does not understand.
pub fn decode(bytes: &[u8]) -> MetadataResult<ClassMetadata> {
    let envelope: MetadataEnvelope = decode_exact(bytes)?;

    if envelope.magic != MetadataEnvelope::MAGIC_BYTES {
        return Err(MetadataError::BadMagic);
    }

    if !envelope.version.is_readable_by(&MetadataVersion::CURRENT) {
        return Err(MetadataError::IncompatibleVersion {
            found: envelope.version,
            supported: MetadataVersion::CURRENT,
        });
    }

    decode_exact(&envelope.payload)
}

fn decode_exact<T: Decode<()>>(bytes: &[u8]) -> MetadataResult<T> {
    let (value, read) = bincode::decode_from_slice(bytes, config())?;
    if read != bytes.len() {
        return Err(MetadataError::TrailingBytes {
            extra: bytes.len() - read,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameTableBuilder;
    use crate::schema::{ClassFlags, ClassKind, Constructor, TypeRef, ValueParameter};

    fn point() -> ClassMetadata {
        let mut names = NameTableBuilder::new();
        let name = names.class("geo::Point");
        let int = names.class("i32");
        let x = names.string("x");
        let y = names.string("y");
        ClassMetadata {
            name,
            kind: ClassKind::Struct,
            flags: ClassFlags::PRODUCT,
            constructors: vec![Constructor {
                is_primary: true,
                value_parameters: vec![
                    ValueParameter {
                        name: x,
                        ty: TypeRef::class(int),
                    },
                    ValueParameter {
                        name: y,
                        ty: TypeRef::class(int),
                    },
                ],
            }],
            names: names.finish(),
        }
    }

    #[test]
    fn test_decode_restores_class() {
        let class = point();
        let bytes = encode(&class).unwrap();
        assert_eq!(decode(&bytes).unwrap(), class);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let envelope = MetadataEnvelope {
            magic: *b"NOTMETA!",
            version: MetadataVersion::CURRENT,
            payload: Vec::new(),
        };
        let bytes = bincode::encode_to_vec(&envelope, config()).unwrap();
        assert!(matches!(decode(&bytes), Err(MetadataError::BadMagic)));
    }

    #[test]
    fn test_rejects_newer_minor_version() {
        let newer = MetadataVersion::new(1, MetadataVersion::CURRENT.minor + 1, 0);
        let bytes = encode_with_version(&point(), newer).unwrap();
        match decode(&bytes) {
            Err(MetadataError::IncompatibleVersion { found, supported }) => {
                assert_eq!(found, newer);
                assert_eq!(supported, MetadataVersion::CURRENT);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_older_minor_version() {
        let older = MetadataVersion::new(1, 0, 3);
        let bytes = encode_with_version(&point(), older).unwrap();
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn test_rejects_truncated_and_padded_input() {
        let bytes = encode(&point()).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() / 2]),
            Err(MetadataError::Decode(_))
        ));

        let mut padded = bytes.clone();
        padded.extend_from_slice(&[0, 0]);
        assert!(matches!(
            decode(&padded),
            Err(MetadataError::TrailingBytes { extra: 2 })
        ));
    }

    #[test]
    fn test_garbage_is_an_error_not_a_panic() {
        fn prop(bytes: Vec<u8>) -> bool {
            bytes.starts_with(&MetadataEnvelope::MAGIC_BYTES) || decode(&bytes).is_err()
        }
        quickcheck::quickcheck(prop as fn(Vec<u8>) -> bool);
    }
}
