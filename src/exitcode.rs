/// Process exit codes for the navigator CLI.
///
/// These follow the BSD sysexits convention where possible.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error - invalid arguments, unknown ids, rejected actions
pub const USAGE: i32 = 64;

/// Input data error - an import file that is not a valid backup
pub const DATAERR: i32 = 65;

/// Service unavailable - the server could not bind or serve
pub const UNAVAILABLE: i32 = 69;

/// Operation was cancelled by user (typically declining a confirmation)
pub const CANCEL: i32 = 130;
