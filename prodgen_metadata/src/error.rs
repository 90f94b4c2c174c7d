use thiserror::Error;

use crate::version::MetadataVersion;

pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to encode declaration metadata: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode declaration metadata: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Invalid magic bytes in declaration metadata")]
    BadMagic,
    #[error("{extra} trailing bytes after declaration metadata")]
    TrailingBytes { extra: usize },
    #[error("Incompatible metadata version: found {found}, supported {supported}")]
    IncompatibleVersion {
        found: MetadataVersion,
        supported: MetadataVersion,
    },
    #[error("Name index {index} is not present in the name table")]
    UnknownName { index: u32 },
    #[error("Qualified name {index} has a cyclic parent chain")]
    CyclicName { index: u32 },
    #[error("Type reference nested deeper than {limit} levels")]
    TypeTooDeep { limit: usize },
    #[error("No metadata recorded for {0}")]
    Missing(String),
}
