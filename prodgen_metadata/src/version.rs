use bincode::{Decode, Encode};
use derive_more::Display;

/// Version of the metadata format written into every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Display)]
#[display("{major}.{minor}.{patch}")]
pub struct MetadataVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl MetadataVersion {
    /// The version this crate writes and the newest one it reads.
    pub const CURRENT: MetadataVersion = MetadataVersion::new(1, 2, 0);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// A reader at `supported` understands metadata at `self` when the major
    /// versions agree and `self` is not from a newer minor release.
    pub fn is_readable_by(&self, supported: &MetadataVersion) -> bool {
        self.major == supported.major && self.minor <= supported.minor
    }
}
