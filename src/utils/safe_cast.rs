//! Safe casting utilities to prevent overflow on 32-bit systems

use crate::{Error, Result};

/// Safely convert usize to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds `i32::MAX`
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_usize_to_i32() {
        assert_eq!(usize_to_i32(42).unwrap(), 42);
        assert_eq!(usize_to_i32(0).unwrap(), 0);
        assert_eq!(usize_to_i32(i32::MAX as usize).unwrap(), i32::MAX);

        // On 64-bit systems, this should fail
        if std::mem::size_of::<usize>() > 4 {
            assert!(usize_to_i32(i32::MAX as usize + 1).is_err());
        }
    }

    proptest! {
        #[test]
        fn prop_usize_to_i32_within_bounds(value in 0..=i32::MAX as usize) {
            let result = usize_to_i32(value);
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap() as usize, value);
        }
    }
}
