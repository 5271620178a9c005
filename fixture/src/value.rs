//! The mixed-radix element function.
//!
//! Axis `j` of an index contributes `i[j] * 10^j`: the first axis gives
//! units, the second tens, and so on, independent of the axis extents.

use std::num::NonZeroU64;

/// Exact `Σ i[j] · 10^j`, or `None` if it does not fit `u128`.
#[must_use]
pub fn mixed_radix_value(index: &[usize]) -> Option<u128> {
    let mut total: u128 = 0;
    // `None` once 10^j itself overflows; only matters for non-zero digits.
    let mut weight: Option<u128> = Some(1);
    for &i in index {
        if i != 0 {
            let term = weight?.checked_mul(i as u128)?;
            total = total.checked_add(term)?;
        }
        weight = weight.and_then(|w| w.checked_mul(10));
    }
    Some(total)
}

/// `mixed_radix_value(index) mod modulus`, computed without overflow.
#[must_use]
pub fn element_value(index: &[usize], modulus: NonZeroU64) -> u64 {
    let m = u128::from(modulus.get());
    let mut acc: u128 = 0;
    let mut weight: u128 = 1 % m;
    for &i in index {
        acc = (acc + (i as u128 % m) * weight) % m;
        weight = weight * 10 % m;
    }
    acc as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(value: u64) -> NonZeroU64 {
        NonZeroU64::new(value).unwrap()
    }

    #[test]
    fn first_axis_is_units() {
        assert_eq!(mixed_radix_value(&[3]), Some(3));
        assert_eq!(mixed_radix_value(&[3, 2]), Some(23));
        assert_eq!(mixed_radix_value(&[6, 4, 2, 0, 8]), Some(80_246));
    }

    #[test]
    fn second_axis_is_tens() {
        assert_eq!(mixed_radix_value(&[0, 1]), Some(10));
        assert_eq!(mixed_radix_value(&[1, 0]), Some(1));
        assert_eq!(element_value(&[0, 1], m(10)), 0);
        assert_eq!(element_value(&[1, 0], m(10)), 1);
    }

    #[test]
    fn empty_index_is_zero() {
        assert_eq!(mixed_radix_value(&[]), Some(0));
        assert_eq!(element_value(&[], m(7)), 0);
    }

    #[test]
    fn extents_do_not_change_weights() {
        // digits beyond 9 carry into the next decade
        assert_eq!(mixed_radix_value(&[12, 1]), Some(22));
    }

    #[test]
    fn reduction_matches_exact_value() {
        let index = [6, 4, 2, 0, 8];
        for modulus in [1, 8, 16, 32, 64, 128, 1 << 31, u64::MAX] {
            let exact = mixed_radix_value(&index).unwrap() % u128::from(modulus);
            assert_eq!(u128::from(element_value(&index, m(modulus))), exact);
        }
    }

    #[test]
    fn high_zero_axes_do_not_overflow() {
        let mut index = vec![0usize; 60];
        index[0] = 5;
        assert_eq!(mixed_radix_value(&index), Some(5));
        index[59] = 1;
        assert_eq!(mixed_radix_value(&index), None);
        assert_eq!(element_value(&index, m(10)), 5);
    }

    #[test]
    fn modulus_one_is_always_zero() {
        assert_eq!(element_value(&[9, 9, 9], m(1)), 0);
    }
}
