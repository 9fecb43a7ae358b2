//! Reed-Solomon construction and decoder, `d >= 2`. The hardest
//! decoder in the system: it recovers up to `d` degree-`<k` polynomials over
//! `F_q` from a vector of per-position "which symbols were seen" sets, using
//! the finite-difference identity of a low-degree polynomial to extend a
//! `k`-window guess across every evaluation position, then a modular
//! Vandermonde solve to read off the polynomial's coefficients.

use super::{binomial, Cff, CffMethod, CompactMatrix, DecodeOutcome, ListMatrix, Matrix, MatrixType, Specific};
use crate::error::{DecodeError, ParamError};
use std::collections::BTreeSet;

fn is_prime(v: u128) -> bool {
    if v < 2 {
        return false;
    }
    if v < 4 {
        return true;
    }
    if v % 2 == 0 {
        return false;
    }
    let mut i: u128 = 3;
    while i * i <= v {
        if v % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// `true` iff `q^k >= n`, computed without risking `u128` overflow for large
/// `k` by bailing out as soon as the running product clears `n`.
fn pow_at_least(q: u128, k: u32, n: u128) -> bool {
    let mut acc: u128 = 1;
    for _ in 0..k {
        acc = match acc.checked_mul(q) {
            Some(v) => v,
            None => return true,
        };
        if acc >= n {
            return true;
        }
    }
    acc >= n
}

/// Smallest prime `q` such that `q^k >= n` and `N <= q + 1` (the `q+1` slack
/// is the classical "point at infinity" extension of an `[N,k]` RS code).
fn smallest_valid_q(big_n: usize, n: usize, k: usize) -> u64 {
    let mut q: u128 = big_n.saturating_sub(1).max(2) as u128;
    loop {
        if q + 1 >= big_n as u128 && is_prime(q) && pow_at_least(q, k as u32, n as u128) {
            return q as u64;
        }
        q += 1;
    }
}

/// Find `(k, N, q)` minimising `N*q` subject to `N = d(k-1)+1`, `q` prime,
/// `N <= q+1`, `q^k >= n`. `k=2` always yields a candidate, so the search
/// seeds `best` from it directly rather than threading an `Option`.
fn find_params(d: u32, n: usize) -> (usize, usize, u64) {
    let d = d as u128;
    let seed_big_n = (d + 1) as usize;
    let seed_q = smallest_valid_q(seed_big_n, n, 2);
    let mut best = (2usize, seed_big_n, seed_q, seed_big_n as u128 * seed_q as u128);
    for k in 3..=32usize {
        let big_n = (d * (k as u128 - 1) + 1) as usize;
        let q = smallest_valid_q(big_n, n, k);
        let cost = big_n as u128 * q as u128;
        if cost < best.3 {
            best = (k, big_n, q, cost);
        }
    }
    (best.0, best.1, best.2)
}

/// Evaluate the degree-`<k` polynomial with coefficients `coeffs` (ascending
/// degree) at `x = 0..N` via Horner; when `N = q+1` the last position holds
/// the leading coefficient directly (the "point at infinity").
fn codeword_for(coeffs: &[u64], big_n: usize, q: u64) -> Vec<u64> {
    let k = coeffs.len();
    let extended = big_n == q as usize + 1;
    let eval_count = if extended { big_n - 1 } else { big_n };
    let mut word = Vec::with_capacity(big_n);
    for x in 0..eval_count {
        let mut acc = 0u64;
        for &c in coeffs.iter().rev() {
            acc = (acc * x as u64 + c) % q;
        }
        word.push(acc);
    }
    if extended {
        word.push(coeffs[k - 1]);
    }
    word
}

fn coeffs_for_index(idx: u128, k: usize, q: u64) -> Vec<u64> {
    let mut coeffs = vec![0u64; k];
    let mut rem = idx;
    for c in coeffs.iter_mut() {
        *c = (rem % q as u128) as u64;
        rem /= q as u128;
    }
    coeffs
}

pub fn build(d: u32, n: usize, matrix_type: MatrixType) -> Result<Cff, ParamError> {
    if d < 2 {
        return Err(ParamError::RsRequiresDAtLeastTwo(d));
    }
    let (k, big_n, q) = find_params(d, n);
    let t = big_n * q as usize;

    let mut matrix = match matrix_type {
        MatrixType::List => Matrix::List(ListMatrix::new(t, n)),
        MatrixType::Compact => Matrix::Compact(CompactMatrix::new(t, n)),
    };
    for col in 1..=n {
        let coeffs = coeffs_for_index((col - 1) as u128, k, q);
        let word = codeword_for(&coeffs, big_n, q);
        for (j, &alpha) in word.iter().enumerate() {
            let row = j * q as usize + alpha as usize;
            matrix.set(row, col);
        }
    }

    Ok(Cff { method: CffMethod::Rs, d, n, t, matrix, specific: Specific::Rs { k, big_n, q } })
}

fn mod_pow(base: u64, mut exp: u64, q: u64) -> u64 {
    let mut result = 1u64 % q;
    let mut base = base % q;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % q;
        }
        base = base * base % q;
        exp >>= 1;
    }
    result
}

fn fermat_inverse(a: u64, q: u64) -> u64 {
    mod_pow(a % q, q - 2, q)
}

fn mod_q(v: i64, q: i64) -> u64 {
    (((v % q) + q) % q) as u64
}

/// `codeword[i] = Σ_{j=1..k} (-1)^{j+1} C(k,j) codeword[i-j] mod q`: the
/// vanishing `k`-th finite difference of a degree-`<k` polynomial, solved
/// for its leading term (e.g. `k=2` gives the familiar linear extrapolation
/// `codeword[i] = 2·codeword[i-1] - codeword[i-2]`).
fn forward_extend(codeword: &[u64], i: usize, k: usize, q: u64) -> u64 {
    let mut acc: i64 = 0;
    for j in 1..=k {
        let sign: i64 = if (j - 1) % 2 == 0 { 1 } else { -1 };
        let binom = binomial(k as u64, j as u64) as i64;
        acc += sign * binom * codeword[i - j] as i64;
    }
    mod_q(acc, q as i64)
}

/// Symmetric backward extension, reading the next `k` values instead of the
/// previous `k`.
fn backward_extend(codeword: &[u64], i: usize, k: usize, q: u64) -> u64 {
    let mut acc: i64 = 0;
    for j in 1..=k {
        let sign: i64 = if (j + 1) % 2 == 0 { 1 } else { -1 };
        let binom = binomial(k as u64, j as u64) as i64;
        acc += sign * binom * codeword[i + j] as i64;
    }
    mod_q(acc, q as i64)
}

/// Try to extend a tentative window assignment to a full length-`big_n`
/// codeword consistent with every position's observed symbol set.
fn extend_and_check(
    combo: &[u64],
    start: usize,
    k: usize,
    big_n: usize,
    q: u64,
    positive_sets: &[Vec<u64>],
) -> Option<Vec<u64>> {
    let mut codeword = vec![0u64; big_n];
    for (off, &v) in combo.iter().enumerate() {
        codeword[start + off] = v;
    }
    for i in (start + k)..big_n {
        let v = forward_extend(&codeword, i, k, q);
        if !positive_sets[i].contains(&v) {
            return None;
        }
        codeword[i] = v;
    }
    for i in (0..start).rev() {
        let v = backward_extend(&codeword, i, k, q);
        if !positive_sets[i].contains(&v) {
            return None;
        }
        codeword[i] = v;
    }
    Some(codeword)
}

/// Cartesian product of per-position candidate symbols in the window: the
/// driving position `p` is pinned to `driver`, every other position tries
/// every symbol ever observed positive there (see DESIGN.md for why the full
/// `S[i]` set is used rather than the multiplicity-tracking refinement).
fn window_combos(positive_sets: &[Vec<u64>], start: usize, k: usize, p: usize, driver: u64) -> Vec<Vec<u64>> {
    let mut per_position: Vec<&[u64]> = Vec::with_capacity(k);
    let singleton = [driver];
    for off in 0..k {
        let pos = start + off;
        per_position.push(if pos == p { &singleton } else { &positive_sets[pos] });
    }
    let mut results: Vec<Vec<u64>> = vec![Vec::new()];
    for candidates in per_position {
        let mut next = Vec::with_capacity(results.len() * candidates.len().max(1));
        for r in &results {
            for &c in candidates {
                let mut nr = r.clone();
                nr.push(c);
                next.push(nr);
            }
        }
        results = next;
    }
    results
}

/// Solve `A x = values` over `F_q` where `A[i][j] = i^j mod q` (Vandermonde
/// on `x = 0..k-1`), via modular Gauss-Jordan elimination with partial
/// pivoting and Fermat inverses. Returns the ascending-degree
/// coefficients, or [`DecodeError::SingularVandermonde`] if a pivot column
/// turns out to be all-zero (which would mean the window's `x`-values
/// weren't actually distinct mod `q`).
fn solve_vandermonde(values: &[u64], q: u64) -> Result<Vec<u64>, DecodeError> {
    let k = values.len();
    let mut a: Vec<Vec<u64>> =
        (0..k).map(|i| (0..k).map(|j| mod_pow(i as u64, j as u64, q)).collect()).collect();
    let mut b: Vec<u64> = values.to_vec();

    for col in 0..k {
        let pivot_row = (col..k)
            .find(|&r| a[r][col] != 0)
            .ok_or(DecodeError::SingularVandermonde)?;
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);
        let inv = fermat_inverse(a[col][col], q);
        for j in 0..k {
            a[col][j] = a[col][j] * inv % q;
        }
        b[col] = b[col] * inv % q;
        for r in 0..k {
            if r == col {
                continue;
            }
            let factor = a[r][col];
            if factor == 0 {
                continue;
            }
            for j in 0..k {
                a[r][j] = (a[r][j] + q - factor * a[col][j] % q) % q;
            }
            b[r] = (b[r] + q - factor * b[col] % q) % q;
        }
    }
    Ok(b)
}

fn column_index(coeffs: &[u64], q: u64) -> usize {
    let mut idx: u128 = 0;
    for (i, &c) in coeffs.iter().enumerate() {
        idx += c as u128 * (q as u128).pow(i as u32);
    }
    idx as usize + 1
}

pub fn decode(cff: &Cff, y: &[bool], k: usize, big_n: usize, q: u64) -> Result<DecodeOutcome, DecodeError> {
    let mut positive_sets: Vec<Vec<u64>> = vec![Vec::new(); big_n];
    for j in 0..big_n {
        for alpha in 0..q {
            let row = j * q as usize + alpha as usize;
            if y[row] {
                positive_sets[j].push(alpha);
            }
        }
    }

    let d = cff.d as usize;
    if positive_sets.iter().any(|s| s.len() > d) {
        return Ok(DecodeOutcome::Ambiguous(Vec::new()));
    }

    let mut unused: Vec<BTreeSet<u64>> =
        positive_sets.iter().map(|s| s.iter().copied().collect()).collect();
    let mut found_cols: Vec<usize> = Vec::new();

    // `p` and `driver` are drawn from the same `find_map` so the existence of
    // an unused symbol at `p` is structural, not re-checked after the fact.
    while let Some((p, driver)) =
        unused.iter().enumerate().find_map(|(j, u)| u.iter().next().map(|&v| (j, v)))
    {
        let start = p.saturating_sub(k.saturating_sub(1)).min(big_n.saturating_sub(k));

        let resolved = window_combos(&positive_sets, start, k, p, driver)
            .into_iter()
            .find_map(|combo| extend_and_check(&combo, start, k, big_n, q, &positive_sets));

        match resolved {
            Some(codeword) => {
                let coeffs = solve_vandermonde(&codeword[0..k], q)?;
                let col = column_index(&coeffs, q);
                for (j, slot) in unused.iter_mut().enumerate() {
                    slot.remove(&codeword[j]);
                }
                found_cols.push(col);
            }
            None => return Err(DecodeError::NoPolynomialFound),
        }
    }

    found_cols.sort_unstable();
    found_cols.dedup();
    if found_cols.len() as u32 <= cff.d {
        Ok(DecodeOutcome::Located(found_cols))
    } else {
        Ok(DecodeOutcome::Ambiguous(found_cols))
    }
}
