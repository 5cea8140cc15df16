//
// fingerprint.rs
// plagscan
//
// Rolling-hash fingerprints with winnowing.
//
// Each window of k tokens is hashed with a polynomial rolling hash; then for
// every window of w consecutive hashes the minimum is kept. Two documents that
// share a run of at least w + k - 1 tokens are guaranteed to share at least
// one selected fingerprint, while the fingerprint set stays much smaller than
// the full n-gram set.
//
use std::collections::HashSet;

use sha2::{Digest, Sha256};

const BASE: u64 = 1_000_003;

/// Stable 64-bit hash of a token (first 8 bytes of its SHA-256 digest).
pub fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn window_hash(hashes: &[u64]) -> u64 {
    hashes
        .iter()
        .fold(0u64, |acc, &h| acc.wrapping_mul(BASE).wrapping_add(h))
}

/// Polynomial hash of every window of `k` token hashes, computed in O(n).
pub fn rolling_hashes(token_hashes: &[u64], k: usize) -> Vec<u64> {
    if k == 0 || token_hashes.len() < k {
        return Vec::new();
    }

    // BASE^(k-1), the weight of the token leaving the window
    let high = (1..k).fold(1u64, |acc, _| acc.wrapping_mul(BASE));

    let mut out = Vec::with_capacity(token_hashes.len() - k + 1);
    let mut current = window_hash(&token_hashes[..k]);
    out.push(current);

    for i in k..token_hashes.len() {
        let leaving = token_hashes[i - k];
        current = current
            .wrapping_sub(leaving.wrapping_mul(high))
            .wrapping_mul(BASE)
            .wrapping_add(token_hashes[i]);
        out.push(current);
    }
    out
}

/// Select the minimum hash of every window of `w` hashes (rightmost on ties),
/// recording each selected position once.
pub fn winnow(hashes: &[u64], w: usize) -> Vec<(usize, u64)> {
    if hashes.is_empty() || w == 0 {
        return Vec::new();
    }
    let w = w.min(hashes.len());

    let mut selected: Vec<(usize, u64)> = Vec::new();
    for start in 0..=hashes.len() - w {
        let window = &hashes[start..start + w];
        let mut min_idx = 0;
        for (i, &h) in window.iter().enumerate() {
            if h <= window[min_idx] {
                min_idx = i;
            }
        }
        let pos = start + min_idx;
        if selected.last().map(|&(p, _)| p) != Some(pos) {
            selected.push((pos, hashes[pos]));
        }
    }
    selected
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    hashes: HashSet<u64>,
}

impl Fingerprint {
    pub fn of<S: AsRef<str>>(tokens: &[S], k: usize, w: usize) -> Self {
        let token_hashes: Vec<u64> = tokens.iter().map(|t| token_hash(t.as_ref())).collect();
        let rolled = rolling_hashes(&token_hashes, k);
        Self {
            hashes: winnow(&rolled, w).into_iter().map(|(_, h)| h).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Share of this fingerprint's hashes also present in `other`.
    pub fn containment(&self, other: &Fingerprint) -> f64 {
        if self.hashes.is_empty() {
            return 0.0;
        }
        let shared = self.hashes.intersection(&other.hashes).count();
        shared as f64 / self.hashes.len() as f64
    }
}
