//! Steiner Triple System construction and decoder, `d = 2`.
//!
//! Rows are points `[1,v]`, columns are the first `n` triples of an STS(v).
//! Two point-indexed lookup tables drive the specific decoder: `third[a][b]`
//! completes a pair to its unique triple, `rank[a][b]` gives that triple's
//! 1-based column id.

use super::{Cff, CffMethod, CompactMatrix, DecodeOutcome, ListMatrix, Matrix, MatrixType, Specific};
use crate::error::{DecodeError, ParamError};

/// `third`/`rank` lookup tables plus the order `v`, built once alongside the
/// matrix and reused only by [`decode`].
#[derive(Clone, Debug)]
pub struct StsTables {
    v: usize,
    third: Vec<Vec<usize>>,
    rank: Vec<Vec<usize>>,
}

fn smallest_admissible_v(n: usize) -> usize {
    let mut v = 7usize;
    loop {
        if v % 6 == 1 || v % 6 == 3 {
            let max_blocks = v * (v - 1) / 6;
            if max_blocks >= n {
                return v;
            }
        }
        v += 1;
    }
}

fn sorted_triple(a: usize, b: usize, c: usize) -> [usize; 3] {
    let mut t = [a, b, c];
    t.sort_unstable();
    t
}

/// Bose construction (v ≡ 3 mod 6): symmetric idempotent quasigroup of
/// order `Q = v/3`, points `(x, g)` for `x ∈ [0,Q)`, `g ∈ {0,1,2}`.
fn build_bose_blocks(v: usize) -> Vec<[usize; 3]> {
    let q = v / 3;
    let point = |x: usize, g: usize| x * 3 + g + 1;
    let latin = |x: usize, y: usize| -> usize { (((q + 1) / 2) * (x + y)) % q };

    let mut blocks = Vec::with_capacity(v * (v - 1) / 6);
    for x in 0..q {
        blocks.push(sorted_triple(point(x, 0), point(x, 1), point(x, 2)));
    }
    for x in 0..q {
        for y in (x + 1)..q {
            for i in 0..3 {
                let j = (i + 1) % 3;
                let z = latin(x, y);
                blocks.push(sorted_triple(point(x, i), point(y, i), point(z, j)));
            }
        }
    }
    blocks
}

/// Deterministic backtracking Steiner-triple packer, used for `v ≡ 1 mod 6`
/// (see DESIGN.md for why this stands in for a literal Skolem-sequence
/// construction). Kirkman's theorem guarantees a complete packing exists for
/// every admissible `v`, so the search always terminates successfully.
fn pack_sts(v: usize) -> Vec<[usize; 3]> {
    let mut covered = vec![vec![false; v + 1]; v + 1];
    let mut blocks = Vec::with_capacity(v * (v - 1) / 6);
    let ok = backtrack(&mut covered, &mut blocks, v);
    assert!(ok, "Steiner triple system must exist for admissible v={v} (Kirkman 1847)");
    blocks
}

fn first_uncovered(covered: &[Vec<bool>], v: usize) -> Option<(usize, usize)> {
    for a in 1..v {
        for b in (a + 1)..=v {
            if !covered[a][b] {
                return Some((a, b));
            }
        }
    }
    None
}

fn backtrack(covered: &mut Vec<Vec<bool>>, blocks: &mut Vec<[usize; 3]>, v: usize) -> bool {
    let (a, b) = match first_uncovered(covered, v) {
        None => return true,
        Some(p) => p,
    };
    for c in 1..=v {
        if c == a || c == b || covered[a][c] || covered[b][c] {
            continue;
        }
        covered[a][b] = true;
        covered[b][a] = true;
        covered[a][c] = true;
        covered[c][a] = true;
        covered[b][c] = true;
        covered[c][b] = true;
        blocks.push(sorted_triple(a, b, c));

        if backtrack(covered, blocks, v) {
            return true;
        }

        blocks.pop();
        covered[a][b] = false;
        covered[b][a] = false;
        covered[a][c] = false;
        covered[c][a] = false;
        covered[b][c] = false;
        covered[c][b] = false;
    }
    false
}

pub fn build(d: u32, n: usize, matrix_type: MatrixType) -> Result<Cff, ParamError> {
    if d != 2 {
        return Err(ParamError::StsRequiresDTwo(d));
    }
    if n < 7 {
        return Err(ParamError::StsRequiresNAtLeastSeven(n as u32));
    }

    let v = smallest_admissible_v(n);
    let blocks = if v % 6 == 3 { build_bose_blocks(v) } else { pack_sts(v) };

    let t = v;
    let mut matrix = match matrix_type {
        MatrixType::List => Matrix::List(ListMatrix::new(t, n)),
        MatrixType::Compact => Matrix::Compact(CompactMatrix::new(t, n)),
    };
    let mut third = vec![vec![0usize; v + 1]; v + 1];
    let mut rank = vec![vec![0usize; v + 1]; v + 1];

    for (idx, &[a, b, c]) in blocks.iter().enumerate() {
        let r = idx + 1;
        third[a][b] = c;
        third[b][a] = c;
        third[a][c] = b;
        third[c][a] = b;
        third[b][c] = a;
        third[c][b] = a;
        rank[a][b] = r;
        rank[b][a] = r;
        rank[a][c] = r;
        rank[c][a] = r;
        rank[b][c] = r;
        rank[c][b] = r;
        if r <= n {
            matrix.set(a - 1, r);
            matrix.set(b - 1, r);
            matrix.set(c - 1, r);
        }
    }

    Ok(Cff {
        method: CffMethod::Sts,
        d,
        n,
        t,
        matrix,
        specific: Specific::Sts(StsTables { v, third, rank }),
    })
}

/// For every pair of positive points whose completing third point is also
/// positive, record the completed triple's rank.
fn complete_triples(positives: &[usize], tables: &StsTables) -> Vec<usize> {
    let pos_set: std::collections::HashSet<usize> = positives.iter().copied().collect();
    let mut found: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
    for i in 0..positives.len() {
        for j in (i + 1)..positives.len() {
            let (a, b) = (positives[i], positives[j]);
            let c = tables.third[a][b];
            if c != 0 && pos_set.contains(&c) {
                found.insert(tables.rank[a][b]);
            }
        }
    }
    found.into_iter().collect()
}

pub fn decode(_cff: &Cff, y: &[bool], tables: &StsTables) -> Result<DecodeOutcome, DecodeError> {
    let positives: Vec<usize> = y
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p)
        .map(|(i, _)| i + 1)
        .collect();
    let s = positives.len();
    match s {
        0 => Ok(DecodeOutcome::Located(Vec::new())),
        4 => Err(DecodeError::ImpossiblePositiveCount),
        3 | 5 | 6 => Ok(DecodeOutcome::Located(complete_triples(&positives, tables))),
        s if s > 6 => Ok(DecodeOutcome::Ambiguous(complete_triples(&positives, tables))),
        _ => Ok(DecodeOutcome::Ambiguous(Vec::new())),
    }
}
