//! Assertions grouped by their cost. Simple assertions are always checked; with the
//! `debug-checks` feature every level is checked, including the consistency checks of the task
//! rings and the symmetry check of the overlap graph.

#[cfg(not(feature = "debug-checks"))]
pub(crate) const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub(crate) const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_EXTREME;

pub(crate) const PUMPKIN_ASSERT_SIMPLE: u8 = 1;
pub(crate) const PUMPKIN_ASSERT_MODERATE: u8 = 2;
pub(crate) const PUMPKIN_ASSERT_ADVANCED: u8 = 3;
pub(crate) const PUMPKIN_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_at_level {
    ($level:ident, $($arg:tt)*) => {
        if $crate::pumpkin_asserts::PUMPKIN_ASSERT_LEVEL_DEFINITION
            >= $crate::pumpkin_asserts::$level
        {
            assert!($($arg)*);
        }
    };
}

/// Cheap checks, e.g. on the arguments of an operation.
#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_simple {
    ($($arg:tt)*) => {
        $crate::pumpkin_assert_at_level!(PUMPKIN_ASSERT_SIMPLE, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_moderate {
    ($($arg:tt)*) => {
        $crate::pumpkin_assert_at_level!(PUMPKIN_ASSERT_MODERATE, $($arg)*)
    };
}

/// Checks which traverse a data structure.
#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_advanced {
    ($($arg:tt)*) => {
        $crate::pumpkin_assert_at_level!(PUMPKIN_ASSERT_ADVANCED, $($arg)*)
    };
}

/// Checks which are quadratic in the number of tasks.
#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_extreme {
    ($($arg:tt)*) => {
        $crate::pumpkin_assert_at_level!(PUMPKIN_ASSERT_EXTREME, $($arg)*)
    };
}
