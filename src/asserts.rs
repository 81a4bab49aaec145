//! Leveled assertion macros.
//!
//! The simple level is always active; the more expensive levels are only compiled in for tests
//! or when the `debug-checks` feature is enabled.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const BUTTERNUT_ASSERT_LEVEL_DEFINITION: u8 = BUTTERNUT_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const BUTTERNUT_ASSERT_LEVEL_DEFINITION: u8 = BUTTERNUT_ASSERT_EXTREME;

pub const BUTTERNUT_ASSERT_SIMPLE: u8 = 1;
pub const BUTTERNUT_ASSERT_MODERATE: u8 = 2;
pub const BUTTERNUT_ASSERT_EXTREME: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! butternut_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::BUTTERNUT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BUTTERNUT_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! butternut_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::BUTTERNUT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BUTTERNUT_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! butternut_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::BUTTERNUT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BUTTERNUT_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
