//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions where applicable. Malformed
//! port strings are warnings and never change the exit code.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Input error - invalid chart name or version
pub const INPUT_ERROR: i32 = 2;

/// Document error - the compose file is not a usable compose document
pub const DOCUMENT_ERROR: i32 = 4;

/// IO error - unreadable compose file, unwritable output directory
pub const IO_ERROR: i32 = 5;
