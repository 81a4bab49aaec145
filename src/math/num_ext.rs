//! Extensions for numbers that are not present in the stable standard library.

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

impl NumExt for i64 {
    fn div_ceil(self, other: Self) -> Self {
        // TODO: Remove once `int_roundings` is stabilized for signed integers.
        // Tracking issue: https://github.com/rust-lang/rust/issues/88581
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn div_floor(self, other: Self) -> Self {
        // TODO: See todo in `div_ceil`.
        let d = self / other;
        let r = self % other;
        if (r > 0 && other < 0) || (r < 0 && other > 0) {
            d - 1
        } else {
            d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_rounds_away_from_the_truncated_quotient() {
        assert_eq!(NumExt::div_floor(7_i64, 2), 3);
        assert_eq!(NumExt::div_ceil(7_i64, 2), 4);

        assert_eq!(NumExt::div_floor(-7_i64, 2), -4);
        assert_eq!(NumExt::div_ceil(-7_i64, 2), -3);

        assert_eq!(NumExt::div_floor(7_i64, -2), -4);
        assert_eq!(NumExt::div_ceil(7_i64, -2), -3);
    }

    #[test]
    fn exact_division_is_unchanged() {
        assert_eq!(NumExt::div_floor(6_i64, -3), -2);
        assert_eq!(NumExt::div_ceil(6_i64, -3), -2);
    }
}
