//! Clamp

use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x` - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Clamps a signed grid index into `[0, n-1]` and returns it as an unsigned
/// index. `n` must be at least 1.
///
/// * `i` - The signed index.
/// * `n` - Number of entries along the axis.
pub fn clamp_index(i: isize, n: usize) -> usize {
    debug_assert!(n > 0);
    let hi = n.saturating_sub(1).min(isize::MAX as usize) as isize;
    clamp(i, 0, hi) as usize
}
