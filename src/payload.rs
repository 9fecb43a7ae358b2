//! Text-based signature payload: an 11-line, line-separated format
//! carrying metadata, the CFF parameters, the per-row hash tuple plus
//! `hstar`, and the underlying signature. [`MtssSignature::read`] treats the
//! payload as valid iff it has exactly 11 non-empty fields, rather than an
//! inverted line-count check that would silently accept and truncate a
//! 12-field payload.

use crate::blocks::FileType;
use crate::cff::{CffMethod, MatrixType};
use crate::error::InputError;
use crate::hash::HashId;
use crate::signature::CdssId;

/// Lines 1-9 of the payload: everything [`crate::canonical::build_canonical`]
/// needs besides the hash tuple and `hstar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub cdss_name: CdssId,
    pub hash_name: HashId,
    pub file_type: FileType,
    pub cff_method: CffMethod,
    pub cff_matrix_type: MatrixType,
    pub block_size: u64,
    pub n: usize,
    pub d: u32,
    pub t: usize,
}

/// A complete MTSS signature object: metadata, the hash tuple, `hstar`, and
/// the underlying signature bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MtssSignature {
    pub meta: Metadata,
    pub hash_tuple: Vec<Vec<u8>>,
    pub hstar: Vec<u8>,
    pub sig: Vec<u8>,
}

fn decode_hex(s: &str) -> Result<Vec<u8>, InputError> {
    if s.len() % 2 != 0 {
        return Err(InputError::OddHexLength(s.to_string()));
    }
    Ok(hex::decode(s)?)
}

fn parse_u64(field: &'static str, s: &str) -> Result<u64, InputError> {
    s.parse().map_err(|_| InputError::InvalidInteger { field, value: s.to_string() })
}

impl MtssSignature {
    /// Serialise to the exact 11-line text format; `T` (line 10) is the
    /// space-joined uppercase hex of the hash tuple followed by `hstar`.
    pub fn write(&self) -> String {
        let mut t_fields: Vec<String> =
            self.hash_tuple.iter().map(|h| hex::encode_upper(h)).collect();
        t_fields.push(hex::encode_upper(&self.hstar));

        let lines = [
            self.meta.cdss_name.to_string(),
            self.meta.hash_name.to_string(),
            self.meta.file_type.to_string(),
            self.meta.cff_method.to_string(),
            self.meta.cff_matrix_type.to_string(),
            self.meta.block_size.to_string(),
            self.meta.n.to_string(),
            self.meta.d.to_string(),
            self.meta.t.to_string(),
            t_fields.join(" "),
            hex::encode(&self.sig),
        ];
        lines.join("\n")
    }

    /// Parse the 11-line text format. A payload is valid iff it has exactly
    /// 11 non-empty lines; anything else is [`InputError::WrongLineCount`].
    pub fn read(text: &str) -> Result<Self, InputError> {
        let fields: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        if fields.len() != 11 {
            return Err(InputError::WrongLineCount(fields.len()));
        }

        let cdss_name: CdssId = fields[0].parse()?;
        let hash_name: HashId = fields[1].parse()?;
        let file_type: FileType = fields[2].parse()?;
        let cff_method: CffMethod = fields[3].parse()?;
        let cff_matrix_type: MatrixType = fields[4].parse()?;
        let block_size = parse_u64("block_size", fields[5])?;
        let n = parse_u64("number_of_blocks", fields[6])? as usize;
        let d = parse_u64("d", fields[7])? as u32;
        let t = parse_u64("t", fields[8])? as usize;

        let t_fields: Vec<&str> = fields[9].split_whitespace().collect();
        if t_fields.len() != t + 1 {
            return Err(InputError::WrongTupleLength { expected: t + 1, actual: t_fields.len() });
        }
        let mut hash_tuple = Vec::with_capacity(t);
        for h in &t_fields[..t] {
            hash_tuple.push(decode_hex(h)?);
        }
        let hstar = decode_hex(t_fields[t])?;
        let sig = decode_hex(fields[10])?;

        Ok(MtssSignature {
            meta: Metadata {
                cdss_name,
                hash_name,
                file_type,
                cff_method,
                cff_matrix_type,
                block_size,
                n,
                d,
                t,
            },
            hash_tuple,
            hstar,
            sig,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MtssSignature {
        MtssSignature {
            meta: Metadata {
                cdss_name: CdssId::Ecdsa,
                hash_name: HashId::Sha2256,
                file_type: FileType::Text,
                cff_method: CffMethod::Sperner,
                cff_matrix_type: MatrixType::List,
                block_size: 1,
                n: 2,
                d: 1,
                t: 2,
            },
            hash_tuple: vec![vec![0xAB, 0xCD], vec![0x01, 0x02]],
            hstar: vec![0xFF, 0x00],
            sig: vec![0xDE, 0xAD, 0xBE, 0xEF],
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let sig = sample();
        let text = sig.write();
        assert_eq!(text.lines().count(), 11);
        let parsed = MtssSignature::read(&text).unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn wrong_line_count_is_rejected() {
        let text = "ecdsa\nsha2256\n";
        assert!(matches!(MtssSignature::read(text), Err(InputError::WrongLineCount(2))));
    }

    #[test]
    fn unknown_algorithm_identifier_is_a_param_error() {
        let mut sig = sample();
        sig.meta.cdss_name = CdssId::Rsa;
        let mut text = sig.write();
        text = text.replacen("rsa", "not-an-algorithm", 1);
        assert!(matches!(MtssSignature::read(&text), Err(InputError::Param(_))));
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        let sig = sample();
        let mut text = sig.write();
        text = text.replacen("ABCD", "ABC", 1);
        assert!(matches!(MtssSignature::read(&text), Err(InputError::OddHexLength(_))));
    }
}
