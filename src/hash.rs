//! Hash primitive identifiers and the `H(·)` dispatch used throughout sign/verify.
//!
//! Mirrors the CDSS dispatch in [`crate::signature`]: a small tagged enum plus
//! thin wrappers around the real digest crates. No hashing logic lives here
//! beyond picking the right crate and returning raw digest bytes.

use crate::error::ParamError;
use sha2::{Digest, Sha256, Sha512};
use sha3::{Sha3_256, Sha3_512};
use std::fmt;
use std::str::FromStr;

/// Recognised hash primitive identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HashId {
    Sha2256,
    Sha2512,
    Sha3256,
    Sha3512,
}

impl HashId {
    pub fn as_str(self) -> &'static str {
        match self {
            HashId::Sha2256 => "sha2256",
            HashId::Sha2512 => "sha2512",
            HashId::Sha3256 => "sha3256",
            HashId::Sha3512 => "sha3512",
        }
    }

    /// Hash `data` and return the raw digest bytes for this algorithm.
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashId::Sha2256 => Sha256::digest(data).to_vec(),
            HashId::Sha2512 => Sha512::digest(data).to_vec(),
            HashId::Sha3256 => Sha3_256::digest(data).to_vec(),
            HashId::Sha3512 => Sha3_512::digest(data).to_vec(),
        }
    }

    /// Hash the concatenation of `parts` without allocating an intermediate
    /// joined buffer, by feeding the digest incrementally.
    pub fn hash_concat<'a, I: IntoIterator<Item = &'a [u8]>>(self, parts: I) -> Vec<u8> {
        match self {
            HashId::Sha2256 => {
                let mut h = Sha256::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize().to_vec()
            }
            HashId::Sha2512 => {
                let mut h = Sha512::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize().to_vec()
            }
            HashId::Sha3256 => {
                let mut h = Sha3_256::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize().to_vec()
            }
            HashId::Sha3512 => {
                let mut h = Sha3_512::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize().to_vec()
            }
        }
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashId {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha2256" => Ok(HashId::Sha2256),
            "sha2512" => Ok(HashId::Sha2512),
            "sha3256" => Ok(HashId::Sha3256),
            "sha3512" => Ok(HashId::Sha3512),
            other => Err(ParamError::UnknownHash(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for h in [HashId::Sha2256, HashId::Sha2512, HashId::Sha3256, HashId::Sha3512] {
            assert_eq!(h.to_string().parse::<HashId>().unwrap(), h);
        }
    }

    #[test]
    fn hash_concat_matches_hash_of_joined_bytes() {
        let a: &[u8] = b"foo";
        let b: &[u8] = b"bar";
        let mut joined = Vec::new();
        joined.extend_from_slice(a);
        joined.extend_from_slice(b);
        assert_eq!(HashId::Sha2256.hash_concat([a, b]), HashId::Sha2256.hash(&joined));
    }

    #[test]
    fn unknown_identifier_is_a_param_error() {
        assert!("md5".parse::<HashId>().is_err());
    }
}
