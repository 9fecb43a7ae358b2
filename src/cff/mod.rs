//! Cover-free family construction and decoding: three constructions
//! (Sperner subsets, Steiner Triple Systems, Reed-Solomon codes), each
//! exposed through the common matrix representation plus a construction-
//! specific fast decoder.
//!
//! Columns and the "element" labels used by the Sperner/STS/RS constructions
//! are 1-based throughout this module, matching the mathematical objects in
//! the design notes (subsets of `[1,t]`, points of a Steiner system on
//! `[1,v]`). `Cff::matrix` stores them in a 0-based array of width `n`;
//! column `c` (1-based) lives at array index `c - 1`.

mod rs;
mod sperner;
mod sts;

use crate::error::{DecodeError, ParamError};
use std::fmt;
use std::str::FromStr;

/// Which combinatorial object produced the matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CffMethod {
    Sperner,
    Sts,
    Rs,
}

impl CffMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CffMethod::Sperner => "sperner",
            CffMethod::Sts => "sts",
            CffMethod::Rs => "rs",
        }
    }
}

impl fmt::Display for CffMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CffMethod {
    type Err = ParamError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sperner" => Ok(CffMethod::Sperner),
            "sts" => Ok(CffMethod::Sts),
            "rs" => Ok(CffMethod::Rs),
            other => Err(ParamError::UnknownCffMethod(other.to_string())),
        }
    }
}

/// Which in-memory shape the matrix rows use.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MatrixType {
    List,
    Compact,
}

impl MatrixType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixType::List => "list",
            MatrixType::Compact => "compact",
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixType {
    type Err = ParamError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(MatrixType::List),
            "compact" => Ok(MatrixType::Compact),
            other => Err(ParamError::UnknownMatrixType(other.to_string())),
        }
    }
}

/// Sorted-list representation: row `i` holds the 1-based column indices
/// where `M[i, ·] = 1`, in ascending order.
#[derive(Clone, Debug)]
pub struct ListMatrix {
    t: usize,
    n: usize,
    rows: Vec<Vec<usize>>,
}

impl ListMatrix {
    fn new(t: usize, n: usize) -> Self {
        ListMatrix { t, n, rows: vec![Vec::new(); t] }
    }

    fn set(&mut self, row: usize, col_1based: usize) {
        let r = &mut self.rows[row];
        if r.last().copied() != Some(col_1based) {
            r.push(col_1based);
        }
    }

    fn get_row(&self, i: usize) -> Vec<usize> {
        self.rows[i].clone()
    }
}

/// Bit-packed representation: row `i` holds `⌈n/64⌉` words; bit `j` of word
/// `j/64` at offset `j%64` stores `M[i, j+1]` (0-based bit position `j` for
/// 1-based column `j+1`).
#[derive(Clone, Debug)]
pub struct CompactMatrix {
    t: usize,
    n: usize,
    words_per_row: usize,
    rows: Vec<Vec<u64>>,
}

impl CompactMatrix {
    fn new(t: usize, n: usize) -> Self {
        let words_per_row = n.div_ceil(64).max(1);
        CompactMatrix { t, n, words_per_row, rows: vec![vec![0u64; words_per_row]; t] }
    }

    fn set(&mut self, row: usize, col_1based: usize) {
        let j = col_1based - 1;
        self.rows[row][j / 64] |= 1u64 << (j % 64);
    }

    fn get_row(&self, i: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for j in 0..self.n {
            if (self.rows[i][j / 64] >> (j % 64)) & 1 == 1 {
                out.push(j + 1);
            }
        }
        out
    }
}

/// The matrix `M`, in either supported representation.
#[derive(Clone, Debug)]
pub enum Matrix {
    List(ListMatrix),
    Compact(CompactMatrix),
}

impl Matrix {
    pub fn t(&self) -> usize {
        match self {
            Matrix::List(m) => m.t,
            Matrix::Compact(m) => m.t,
        }
    }

    pub fn n(&self) -> usize {
        match self {
            Matrix::List(m) => m.n,
            Matrix::Compact(m) => m.n,
        }
    }

    pub fn matrix_type(&self) -> MatrixType {
        match self {
            Matrix::List(_) => MatrixType::List,
            Matrix::Compact(_) => MatrixType::Compact,
        }
    }

    /// Ordered list of 1-based column indices where row `i` is 1.
    pub fn get_row(&self, i: usize) -> Vec<usize> {
        match self {
            Matrix::List(m) => m.get_row(i),
            Matrix::Compact(m) => m.get_row(i),
        }
    }

    fn set(&mut self, row: usize, col_1based: usize) {
        match self {
            Matrix::List(m) => m.set(row, col_1based),
            Matrix::Compact(m) => m.set(row, col_1based),
        }
    }

    /// General decoder, usable against any CFF: union the 1-columns of
    /// every negative row, the defective set is the complement in `[1, n]`.
    /// Returns `(|I| <= d, I)` with `I` sorted ascending, 1-based.
    pub fn find_defectives_general(&self, y: &[bool], d: u32) -> (bool, Vec<usize>) {
        match self {
            Matrix::List(m) => {
                let mut covered = vec![false; m.n + 1];
                for (i, positive) in y.iter().enumerate() {
                    if !positive {
                        for &c in &m.rows[i] {
                            covered[c] = true;
                        }
                    }
                }
                let defectives: Vec<usize> =
                    (1..=m.n).filter(|&c| !covered[c]).collect();
                (defectives.len() as u32 <= d, defectives)
            }
            Matrix::Compact(m) => {
                let mut union = vec![0u64; m.words_per_row];
                for (i, positive) in y.iter().enumerate() {
                    if !positive {
                        for (w, word) in union.iter_mut().enumerate() {
                            *word |= m.rows[i][w];
                        }
                    }
                }
                // Pad the tail bits of the last word so columns >= n never
                // read as defective.
                let valid_bits_in_last_word = m.n - (m.words_per_row - 1) * 64;
                if let Some(last) = union.last_mut() {
                    if valid_bits_in_last_word < 64 {
                        *last |= !0u64 << valid_bits_in_last_word;
                    }
                }
                let mut defectives = Vec::new();
                for j in 0..m.n {
                    let bit = (union[j / 64] >> (j % 64)) & 1;
                    if bit == 0 {
                        defectives.push(j + 1);
                    }
                }
                (defectives.len() as u32 <= d, defectives)
            }
        }
    }
}

/// Construction-specific bookkeeping needed only by the specialised
/// decoders; the general decoder never touches this.
#[derive(Clone, Debug)]
pub enum Specific {
    Sperner { half_t: usize },
    Sts(sts::StsTables),
    Rs { k: usize, big_n: usize, q: u64 },
}

/// A fully built cover-free family: the matrix plus whatever the
/// construction-specific decoder needs to run faster than the general one.
#[derive(Clone, Debug)]
pub struct Cff {
    pub method: CffMethod,
    pub d: u32,
    pub n: usize,
    pub t: usize,
    pub matrix: Matrix,
    pub specific: Specific,
}

/// Build a `d`-CFF covering `n` columns using `method`, stored as `matrix_type`.
pub fn build(method: CffMethod, d: u32, n: usize, matrix_type: MatrixType) -> Result<Cff, ParamError> {
    if d < 1 {
        return Err(ParamError::InvalidD(d));
    }
    match method {
        CffMethod::Sperner => sperner::build(d, n, matrix_type),
        CffMethod::Sts => sts::build(d, n, matrix_type),
        CffMethod::Rs => rs::build(d, n, matrix_type),
    }
}

/// Outcome of a specific (construction-tailored) decode: either a confident
/// locate, or an ambiguous "more than one coherent reading" carrying every
/// candidate the decoder produced along the way.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeOutcome {
    Located(Vec<usize>),
    Ambiguous(Vec<usize>),
}

/// Run the construction-specific decoder over defective test vector `y`.
pub fn decode_specific(cff: &Cff, y: &[bool]) -> Result<DecodeOutcome, DecodeError> {
    match &cff.specific {
        Specific::Sperner { half_t } => sperner::decode(cff, y, *half_t),
        Specific::Sts(tables) => sts::decode(cff, y, tables),
        Specific::Rs { k, big_n, q } => rs::decode(cff, y, *k, *big_n, *q),
    }
}

/// `n choose k`, computed with `u128` to delay overflow; callers keep `n`
/// small enough (CFF parameters, not cryptographic exponents) for this to
/// never truncate in practice.
pub(crate) fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute-force check of the universal CFF property for small (d, n):
    /// for every column and every d-subset of the other columns, some row
    /// separates them.
    pub(crate) fn assert_is_cover_free(matrix: &Matrix, d: u32, n: usize) {
        use std::collections::HashSet;
        let rows_by_col: Vec<HashSet<usize>> = (1..=n)
            .map(|c| {
                (0..matrix.t())
                    .filter(|&i| matrix.get_row(i).contains(&c))
                    .collect()
            })
            .collect();

        fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
            if k == 0 {
                return vec![Vec::new()];
            }
            if items.is_empty() {
                return Vec::new();
            }
            let mut out = Vec::new();
            let (first, rest) = items.split_first().unwrap();
            for mut combo in combinations(rest, k - 1) {
                combo.insert(0, *first);
                out.push(combo);
            }
            out.extend(combinations(rest, k));
            out
        }

        let all_cols: Vec<usize> = (1..=n).collect();
        for &c in &all_cols {
            let others: Vec<usize> = all_cols.iter().copied().filter(|&x| x != c).collect();
            for subset in combinations(&others, d as usize) {
                let union_of_subset: HashSet<usize> =
                    subset.iter().flat_map(|&s| rows_by_col[s - 1].iter().copied()).collect();
                let separating_row = rows_by_col[c - 1].iter().any(|r| !union_of_subset.contains(r));
                assert!(
                    separating_row,
                    "column {c} is covered by subset {subset:?} — not cover-free for d={d}"
                );
            }
        }
    }

    #[test]
    fn list_and_compact_matrix_types_are_just_string_ids() {
        assert_eq!("list".parse::<MatrixType>().unwrap(), MatrixType::List);
        assert_eq!("compact".parse::<MatrixType>().unwrap(), MatrixType::Compact);
    }

    #[test]
    fn binomial_matches_known_values() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(6, 3), 20);
        assert_eq!(binomial(5, 0), 1);
    }
}
