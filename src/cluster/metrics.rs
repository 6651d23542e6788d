//! Partition agreement metrics
//!
//! Adjusted Rand Index and Normalized Mutual Information between two label
//! assignments over the same elements, computed from the joint contingency
//! table with the standard pair-counting formulas (Hubert & Arabie 1985;
//! Strehl & Ghosh 2002).

use std::collections::HashMap;

/// Adjusted Rand Index between two label assignments.
///
/// Ranges over [-1, 1]: 0 is chance-level agreement, 1 is identical
/// partitions up to relabeling. Symmetric in its arguments.
pub fn ari(a: &[usize], b: &[usize]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (joint, n) = contingency_table(a, b);

    let mut row_sums: HashMap<usize, usize> = HashMap::new();
    let mut col_sums: HashMap<usize, usize> = HashMap::new();
    for (&(ca, cb), &count) in &joint {
        *row_sums.entry(ca).or_insert(0) += count;
        *col_sums.entry(cb).or_insert(0) += count;
    }

    let sum_comb_ij: f64 = joint.values().map(|&c| comb2(c)).sum();
    let sum_comb_a: f64 = row_sums.values().map(|&c| comb2(c)).sum();
    let sum_comb_b: f64 = col_sums.values().map(|&c| comb2(c)).sum();
    let comb_n = comb2(n);

    // ARI = (index - expected) / (max - expected)
    let expected = sum_comb_a * sum_comb_b / comb_n;
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;

    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        // Degenerate case: both partitions trivial and identical
        return 1.0;
    }

    (sum_comb_ij - expected) / denom
}

/// Normalized Mutual Information between two label assignments.
///
/// 2 * I(A; B) / (H(A) + H(B)), in [0, 1]. Returns 1.0 when both
/// assignments are constant (zero entropy on both sides).
pub fn nmi(a: &[usize], b: &[usize]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (joint, n) = contingency_table(a, b);
    let n_f = n as f64;

    let mut count_a: HashMap<usize, usize> = HashMap::new();
    let mut count_b: HashMap<usize, usize> = HashMap::new();
    for (&(ca, cb), &count) in &joint {
        *count_a.entry(ca).or_insert(0) += count;
        *count_b.entry(cb).or_insert(0) += count;
    }

    let h_a = entropy(count_a.values().copied(), n_f);
    let h_b = entropy(count_b.values().copied(), n_f);

    let mut mi = 0.0;
    for (&(ca, cb), &count) in &joint {
        let p_joint = count as f64 / n_f;
        let p_a = count_a[&ca] as f64 / n_f;
        let p_b = count_b[&cb] as f64 / n_f;
        if p_joint > 0.0 {
            mi += p_joint * (p_joint / (p_a * p_b)).ln();
        }
    }

    let denom = h_a + h_b;
    if denom > 0.0 {
        // Clamp tiny float overshoot
        (2.0 * mi / denom).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn contingency_table(a: &[usize], b: &[usize]) -> (HashMap<(usize, usize), usize>, usize) {
    let mut table = HashMap::new();
    for (&ca, &cb) in a.iter().zip(b.iter()) {
        *table.entry((ca, cb)).or_insert(0) += 1;
    }
    (table, a.len())
}

/// n choose 2 as f64 (counts can exceed what usize multiplication tolerates)
fn comb2(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

fn entropy(counts: impl Iterator<Item = usize>, n: f64) -> f64 {
    counts
        .map(|c| {
            let p = c as f64 / n;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ari_identical() {
        let labels = [0, 0, 1, 1, 2, 2];
        assert!((ari(&labels, &labels) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ari_permuted_labels() {
        let a = [0, 0, 1, 1, 2, 2];
        let b = [2, 2, 0, 0, 1, 1];
        assert!((ari(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ari_symmetric() {
        let a = [0, 0, 1, 1, 2, 2];
        let b = [0, 1, 1, 1, 2, 2];
        assert!((ari(&a, &b) - ari(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_ari_disagreement_below_one() {
        let a = [0, 0, 1, 1];
        let b = [0, 1, 0, 1];
        assert!(ari(&a, &b) < 0.5);
    }

    #[test]
    fn test_ari_known_value() {
        // sklearn: adjusted_rand_score([0,0,1,1,1], [0,0,1,1,0]) ~ 0.1666...
        let a = [0, 0, 1, 1, 1];
        let b = [0, 0, 1, 1, 0];
        assert!((ari(&a, &b) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ari_empty_and_mismatched() {
        assert_eq!(ari(&[], &[]), 0.0);
        assert_eq!(ari(&[0, 1], &[0]), 0.0);
    }

    #[test]
    fn test_nmi_identical() {
        let labels = [0, 0, 1, 1];
        assert!((nmi(&labels, &labels) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nmi_permuted_labels() {
        let a = [1, 1, 0, 0, 2, 2];
        let b = [0, 0, 1, 1, 2, 2];
        assert!((nmi(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nmi_independent_is_low() {
        let a = [0, 1, 0, 1];
        let b = [0, 0, 1, 1];
        assert!(nmi(&a, &b) < 0.01);
    }

    #[test]
    fn test_nmi_bounds() {
        let a = [0, 0, 1, 2, 2, 1];
        let b = [0, 1, 1, 2, 0, 1];
        let score = nmi(&a, &b);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_both_constant() {
        let a = [0, 0, 0];
        let b = [5, 5, 5];
        assert!((ari(&a, &b) - 1.0).abs() < 1e-9);
        assert!((nmi(&a, &b) - 1.0).abs() < 1e-9);
    }
}
