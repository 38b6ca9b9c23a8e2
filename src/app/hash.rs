//! Unique tokens for temporary archive names
//!
//! Concurrent installer runs on the same host must never pick the same
//! archive name, so the token mixes the wall clock, the process id and a
//! random value before hashing them down to a fixed-width hex string.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// MD5 digest used as a file-name token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveToken(md5::Digest);

impl ArchiveToken {
    /// Generate a fresh token from time, pid and a random value
    pub fn generate() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let seed = format!("{}{}{:016x}", nanos, std::process::id(), fastrand::u64(..));
        Self::from_seed(seed.as_bytes())
    }

    /// Token for an explicit seed
    pub fn from_seed(seed: &[u8]) -> Self {
        Self(md5::compute(seed))
    }

    /// Lowercase 32-character hex representation
    pub fn to_hex(&self) -> String {
        format!("{:x}", self.0)
    }
}

impl fmt::Display for ArchiveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
