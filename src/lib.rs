//! Modification-tolerant signature core: a conventional signature primitive
//! augmented with cover-free-family group testing, so that a verifier who
//! rejects byte-identical re-verification can still locate which blocks of
//! the original message changed.
//!
//! The crate is organised the way the protocol itself is: [`blocks`] splits
//! a message, [`cff`] builds and decodes the group-testing matrix,
//! [`hash`] and [`signature`] wrap the external primitives, [`canonical`]
//! and [`payload`] define the signed byte sequence and its text encoding,
//! and [`protocol`] ties sign/verify together.

pub mod blocks;
pub mod canonical;
pub mod cff;
pub mod error;
pub mod hash;
pub mod payload;
pub mod protocol;
pub mod signature;

pub use error::{DecodeError, InputError, MtssError, ParamError, Result};
pub use payload::{Metadata, MtssSignature};
pub use protocol::{sign, verify, Decoder, SignParams, VerifyOutcome, VerifyParams};
