//! Exit codes for webtrdpctl
//!
//! One code per error kind so scripts can tell a dead backend from a
//! rejected request.

use webtrdp_common::ErrorKind;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for backend errors and general failures
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the backend rejected the request
pub const EXIT_REJECTED: i32 = 64;

/// Exit code when the backend returned a response we could not parse
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the backend is unavailable/unreachable
pub const EXIT_BACKEND_UNAVAILABLE: i32 = 70;

pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Unreachable => EXIT_BACKEND_UNAVAILABLE,
        ErrorKind::Malformed => EXIT_INVALID_RESPONSE,
        ErrorKind::ValidationFailed => EXIT_REJECTED,
        ErrorKind::Backend => EXIT_GENERAL_ERROR,
    }
}
