use rand::Rng;

/// Unbiased in-place shuffle (Durstenfeld's Fisher–Yates).
///
/// Walks `i` from the last index down to 1 and swaps `items[i]` with a
/// uniformly chosen `items[j]`, `j ∈ [0, i]`. Slices of length 0 or 1 are
/// left untouched and consume no randomness.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
