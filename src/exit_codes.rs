//! Exit code constants for the reloc CLI.
//!
//! Codes are grouped by category:
//! - 0: Success
//! - 1-9: Input and configuration errors
//! - 10-19: Image processing errors
//! - 20-29: Runtime errors

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Bad arguments or an invalid configuration file.
pub const CONFIG_ERROR: i32 = 2;

/// The configuration bundle could not be found or decoded.
pub const BUNDLE_LOAD_FAILURE: i32 = 4;

/// An image reference could not be rewritten (strict mode).
pub const IMAGE_PROCESSING_FAILURE: i32 = 11;

/// Unsupported structures were found while running in strict mode.
pub const UNSUPPORTED_STRUCTURE: i32 = 12;

/// Writing output failed.
pub const IO_FAILURE: i32 = 21;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            CONFIG_ERROR,
            BUNDLE_LOAD_FAILURE,
            IMAGE_PROCESSING_FAILURE,
            UNSUPPORTED_STRUCTURE,
            IO_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fall_in_their_ranges() {
        assert_eq!(SUCCESS, 0);
        assert!((1..10).contains(&CONFIG_ERROR));
        assert!((1..10).contains(&BUNDLE_LOAD_FAILURE));
        assert!((10..20).contains(&IMAGE_PROCESSING_FAILURE));
        assert!((10..20).contains(&UNSUPPORTED_STRUCTURE));
        assert!((20..30).contains(&IO_FAILURE));
    }
}
