//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Exit code for success, help and unknown commands.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when no command was given.
pub const EXIT_USAGE: i32 = 1;
/// Exit code for fatal failures.
pub const EXIT_FATAL: i32 = 1;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e.root_cause() {
        ApiError::AuthenticationFailed(_) => {
            format!("{}\nCheck --username, --realm, --password and --otp.", e)
        }
        _ => e.to_string(),
    }
}
