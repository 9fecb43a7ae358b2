//! Canonical serialisation of the bytes that are signed and re-verified: the
//! exact byte sequence must be reproducible bit-for-bit at both sign and
//! verify time. Modelled on a `CanonicalHeader::serialize`/
//! `verify_deterministic` pair: one function builds the exact byte sequence,
//! and both sides of the protocol call that same function so they can never
//! drift apart.

use crate::payload::Metadata;

/// Build the canonical `S`: the nine metadata/parameter fields followed by
/// the hash tuple and `hstar`, all decimal/uppercase-hex ASCII joined by
/// single spaces, in the exact order of payload lines 1-10.
pub fn build_canonical(meta: &Metadata, hash_tuple: &[Vec<u8>], hstar: &[u8]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(9 + hash_tuple.len() + 1);
    parts.push(meta.cdss_name.to_string());
    parts.push(meta.hash_name.to_string());
    parts.push(meta.file_type.to_string());
    parts.push(meta.cff_method.to_string());
    parts.push(meta.cff_matrix_type.to_string());
    parts.push(meta.block_size.to_string());
    parts.push(meta.n.to_string());
    parts.push(meta.d.to_string());
    parts.push(meta.t.to_string());
    for h in hash_tuple {
        parts.push(hex::encode_upper(h));
    }
    parts.push(hex::encode_upper(hstar));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashId;
    use crate::signature::CdssId;
    use crate::cff::{CffMethod, MatrixType};
    use crate::blocks::FileType;

    fn sample_meta() -> Metadata {
        Metadata {
            cdss_name: CdssId::Ecdsa,
            hash_name: HashId::Sha2256,
            file_type: FileType::Text,
            cff_method: CffMethod::Sperner,
            cff_matrix_type: MatrixType::List,
            block_size: 1,
            n: 4,
            d: 1,
            t: 4,
        }
    }

    #[test]
    fn canonical_serialisation_is_deterministic() {
        let meta = sample_meta();
        let tuple = vec![vec![1u8, 2], vec![3u8, 4], vec![5u8, 6], vec![7u8, 8]];
        let hstar = vec![9u8, 10];
        let a = build_canonical(&meta, &tuple, &hstar);
        let b = build_canonical(&meta, &tuple, &hstar);
        assert_eq!(a, b);
        assert_eq!(a, "ecdsa sha2256 text sperner list 1 4 1 4 0102 0304 0506 0708 090A");
    }

    #[test]
    fn single_byte_change_changes_canonical_s() {
        let meta = sample_meta();
        let tuple = vec![vec![1u8, 2], vec![3u8, 4], vec![5u8, 6], vec![7u8, 8]];
        let a = build_canonical(&meta, &tuple, &[9, 10]);
        let b = build_canonical(&meta, &tuple, &[9, 11]);
        assert_ne!(a, b);
    }
}
