//! Sperner-system construction and decoder, `d = 1`.
//!
//! Rows are the `t` elements of `[1,t]`; columns are the first `n` subsets of
//! size `⌊t/2⌋`, enumerated in lexicographic order via the standard
//! next-combination successor (Stinson's Algorithm 2.6). A single defective
//! column is recovered by ranking the positive rows back to a combination
//! index (Algorithm 2.7); more rows than that means more than one column is
//! implicated and the column set is reported but not confirmed unique.

use super::{binomial, Cff, CffMethod, CompactMatrix, DecodeOutcome, ListMatrix, Matrix, MatrixType, Specific};
use crate::error::{DecodeError, ParamError};

fn smallest_t(n: usize) -> usize {
    let mut t = 1usize;
    loop {
        let k = t / 2;
        if binomial(t as u64, k as u64) >= n as u128 {
            return t;
        }
        t += 1;
    }
}

/// Algorithm 2.6: advance `a` (a strictly increasing `k`-subset of `[1,t]`)
/// to its lexicographic successor. Returns `false` once `a` is the last
/// combination.
fn next_combination(a: &mut [usize], t: usize) -> bool {
    let k = a.len();
    if k == 0 {
        return false;
    }
    let mut i = k - 1;
    loop {
        let max_val = t - k + i + 1;
        if a[i] < max_val {
            a[i] += 1;
            for j in (i + 1)..k {
                a[j] = a[j - 1] + 1;
            }
            return true;
        }
        if i == 0 {
            return false;
        }
        i -= 1;
    }
}

fn first_n_subsets(t: usize, k: usize, n: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::with_capacity(n);
    if k == 0 {
        out.push(Vec::new());
        return out;
    }
    let mut current: Vec<usize> = (1..=k).collect();
    out.push(current.clone());
    while out.len() < n {
        if !next_combination(&mut current, t) {
            break;
        }
        out.push(current.clone());
    }
    out
}

/// Algorithm 2.7: rank a strictly increasing `k`-subset of `[1, universe]`
/// among all `k`-subsets in lexicographic order, 1-based.
fn rank_subset(a: &[usize], universe: usize, k: usize) -> u128 {
    let mut rank: u128 = 1;
    let mut prev = 0usize;
    for i in 1..=k {
        let ai = a[i - 1];
        for j in (prev + 1)..ai {
            rank += binomial((universe - j) as u64, (k - i) as u64);
        }
        prev = ai;
    }
    rank
}

fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
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

pub fn build(d: u32, n: usize, matrix_type: MatrixType) -> Result<Cff, ParamError> {
    if d != 1 {
        return Err(ParamError::SpernerRequiresDOne(d));
    }
    let t = smallest_t(n);
    let half_t = t / 2;
    let subsets = first_n_subsets(t, half_t, n);

    let mut matrix = match matrix_type {
        MatrixType::List => Matrix::List(ListMatrix::new(t, n)),
        MatrixType::Compact => Matrix::Compact(CompactMatrix::new(t, n)),
    };
    for (col_idx, subset) in subsets.iter().enumerate() {
        let col = col_idx + 1;
        for &x in subset {
            matrix.set(x - 1, col);
        }
    }

    Ok(Cff { method: CffMethod::Sperner, d, n, t, matrix, specific: Specific::Sperner { half_t } })
}

/// Run the Sperner-specific decoder. A single defective ranks uniquely;
/// more positives than expected means the column set is ambiguous and every
/// coherent candidate is reported rather than just one.
pub fn decode(cff: &Cff, y: &[bool], half_t: usize) -> Result<DecodeOutcome, DecodeError> {
    let positives: Vec<usize> = y
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p)
        .map(|(i, _)| i + 1)
        .collect();

    if positives.is_empty() {
        return Ok(DecodeOutcome::Located(Vec::new()));
    }
    if positives.len() == half_t {
        let col = rank_subset(&positives, cff.t, half_t);
        return Ok(DecodeOutcome::Located(vec![col as usize]));
    }
    if positives.len() > half_t {
        let mut candidates: Vec<usize> = combinations(&positives, half_t)
            .iter()
            .map(|subset| rank_subset(subset, cff.t, half_t) as usize)
            .filter(|&c| c >= 1 && c <= cff.n)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        return Ok(DecodeOutcome::Ambiguous(candidates));
    }
    // Fewer than half_t positive rows can't pin down any column under this
    // construction's single-defective model.
    Ok(DecodeOutcome::Ambiguous(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cff::tests::assert_is_cover_free;

    #[test]
    fn rejects_d_other_than_one() {
        assert!(build(2, 4, MatrixType::List).is_err());
    }

    #[test]
    fn small_instance_is_cover_free() {
        for n in [2usize, 3, 4, 5, 8, 10] {
            let cff = build(1, n, MatrixType::List).unwrap();
            assert_is_cover_free(&cff.matrix, 1, n);
            let compact = build(1, n, MatrixType::Compact).unwrap();
            for i in 0..cff.t {
                assert_eq!(cff.matrix.get_row(i), compact.matrix.get_row(i));
            }
        }
    }

    #[test]
    fn locates_the_single_modified_column() {
        let cff = build(1, 4, MatrixType::List).unwrap();
        let half_t = match cff.specific {
            Specific::Sperner { half_t } => half_t,
            _ => unreachable!(),
        };
        // Column 3's membership rows, found by re-deriving which rows contain it.
        let mut y = vec![false; cff.t];
        for i in 0..cff.t {
            if cff.matrix.get_row(i).contains(&3) {
                y[i] = true;
            }
        }
        let outcome = decode(&cff, &y, half_t).unwrap();
        assert_eq!(outcome, DecodeOutcome::Located(vec![3]));
    }

    #[test]
    fn next_combination_enumerates_in_lex_order() {
        let mut a = vec![1, 2];
        let mut all = vec![a.clone()];
        while next_combination(&mut a, 4) {
            all.push(a.clone());
        }
        assert_eq!(all, vec![vec![1, 2], vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4], vec![3, 4]]);
    }
}
