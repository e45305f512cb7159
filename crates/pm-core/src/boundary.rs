//! Reflection padding for kernel taps and sampler windows.
//!
//! A coordinate `c` outside `[0, bound)` is mirrored back inside: `t = |c|`,
//! then while `t >= bound`, `t = t - 2(t - bound) - 1`. The lower edge
//! mirrors without repeating pixel 0 (`-1 → 1`), the upper edge repeats the
//! last pixel (`bound → bound - 1`).

/// Mirror `c` into `[0, bound)`.
///
/// Reflections that overshoot below zero are folded back through `|t|`, so
/// offsets larger than the image (small images, wide kernels) still land in
/// range.
///
/// # Panics
/// Panics if `bound == 0`.
///
/// # Example
/// ```
/// use pm_core::boundary::reflect;
/// assert_eq!(reflect(-1, 5), 1);
/// assert_eq!(reflect(5, 5), 4);
/// assert_eq!(reflect(6, 5), 3);
/// assert_eq!(reflect(2, 5), 2);
/// ```
#[inline]
#[must_use]
pub fn reflect(c: i64, bound: u32) -> u32 {
    assert!(bound > 0, "reflect on an empty axis");
    let b = i64::from(bound);
    let mut t = c.abs();
    while t >= b {
        t = (t - 2 * (t - b) - 1).abs();
    }
    t as u32
}
