//! The MTSS sign/verify protocol: orchestrates block splitting, CFF
//! row hashing, canonical serialisation, and the underlying signature
//! primitive into a sign operation and a verify state machine that
//! escalates from "invalid" through "unchanged" to "changed, located".

use crate::blocks::{BlockedMessage, FileType};
use crate::canonical::build_canonical;
use crate::cff::{Cff, DecodeOutcome};
use crate::error::MtssError;
use crate::hash::HashId;
use crate::payload::{Metadata, MtssSignature};
use crate::signature::{self, CdssId, PublicKey, SecretKey};
use subtle::ConstantTimeEq;

/// Inputs to [`sign`]: the blocked message, its CFF, and the chosen
/// hash/signature primitives.
pub struct SignParams<'a> {
    pub blocked: &'a BlockedMessage,
    pub cff: &'a Cff,
    pub hash: HashId,
    pub cdss: CdssId,
    pub sk: &'a SecretKey,
}

/// Inputs to [`verify`]: the message re-split the same way, the CFF rebuilt
/// from the payload's own metadata, and a decoder choice.
pub struct VerifyParams<'a> {
    pub blocked: &'a BlockedMessage,
    pub cff: &'a Cff,
    pub decoder: Decoder,
    pub pk: &'a PublicKey,
}

/// Which decoder `verify` runs once block-level hash differences surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decoder {
    General,
    Specific,
}

/// Terminal states of the verify state machine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyOutcome {
    /// `START -> CRYPTO_INVALID`.
    CryptoInvalid,
    /// `CRYPTO_OK -> UNCHANGED`, `I = ∅`.
    Unchanged,
    /// `CRYPTO_OK -> CHANGED -> DECODED`. `found` is `false` when the
    /// decoder could only narrow the candidates rather than confirm them;
    /// `modified` still carries whatever it found.
    Changed { found: bool, modified: Vec<usize> },
}

/// Constant-time byte equality, used for the hash comparisons in `verify`:
/// these guard the same "does this digest match" decision a MAC check does.
fn digest_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}

/// Hash every row's block group: row `i` hashes the concatenation of `B_j`
/// for every `j` in that row's 1-based column list.
fn row_hashes(blocked: &BlockedMessage, cff: &Cff, hash: HashId) -> Vec<Vec<u8>> {
    (0..cff.t)
        .map(|i| {
            let cols = cff.matrix.get_row(i);
            let parts: Vec<&[u8]> = cols.iter().map(|&c| blocked.blocks[c - 1].as_slice()).collect();
            hash.hash_concat(parts)
        })
        .collect()
}

fn metadata_for(cdss: CdssId, hash: HashId, file_type: FileType, cff: &Cff, blocked: &BlockedMessage) -> Metadata {
    Metadata {
        cdss_name: cdss,
        hash_name: hash,
        file_type,
        cff_method: cff.method,
        cff_matrix_type: cff.matrix.matrix_type(),
        block_size: blocked.block_size,
        n: cff.n,
        d: cff.d,
        t: cff.t,
    }
}

/// Produce a complete `MtssSignature` over `params.blocked`.
pub fn sign(params: &SignParams, file_type: FileType) -> Result<MtssSignature, MtssError> {
    let hstar = params.hash.hash(&params.blocked.original_bytes);
    let hash_tuple = row_hashes(params.blocked, params.cff, params.hash);
    let meta = metadata_for(params.cdss, params.hash, file_type, params.cff, params.blocked);
    let canonical = build_canonical(&meta, &hash_tuple, &hstar);
    let sig = signature::sign(params.sk, canonical.as_bytes())?;
    Ok(MtssSignature { meta, hash_tuple, hstar, sig })
}

/// Run the verify state machine against `received`.
pub fn verify(params: &VerifyParams, received: &MtssSignature) -> Result<VerifyOutcome, MtssError> {
    let canonical = build_canonical(&received.meta, &received.hash_tuple, &received.hstar);
    if !signature::verify(params.pk, canonical.as_bytes(), &received.sig) {
        return Ok(VerifyOutcome::CryptoInvalid);
    }

    let hstar_new = received.meta.hash_name.hash(&params.blocked.original_bytes);
    if digest_eq(&hstar_new, &received.hstar) {
        return Ok(VerifyOutcome::Unchanged);
    }

    let fresh = row_hashes(params.blocked, params.cff, received.meta.hash_name);
    let y: Vec<bool> = received
        .hash_tuple
        .iter()
        .zip(fresh.iter())
        .map(|(original, current)| !digest_eq(original, current))
        .collect();

    match params.decoder {
        Decoder::General => {
            let (found, modified) = params.cff.matrix.find_defectives_general(&y, params.cff.d);
            Ok(VerifyOutcome::Changed { found, modified })
        }
        Decoder::Specific => match crate::cff::decode_specific(params.cff, &y)? {
            DecodeOutcome::Located(cols) => Ok(VerifyOutcome::Changed { found: true, modified: cols }),
            DecodeOutcome::Ambiguous(cols) => Ok(VerifyOutcome::Changed { found: false, modified: cols }),
        },
    }
}
