//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — close-out scripts and CI gates rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | recon            | Reconciliation-specific codes            |
//! | 10-19   | comp             | Compensation calculator codes            |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (3-9)
// =============================================================================

/// At least one account's residual and wireline totals disagree beyond
/// tolerance. Like `diff(1)`, nonzero means "feeds differ."
pub const EXIT_RECON_MISMATCH: u8 = 3;

/// Config failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 4;

/// Runtime failure (unreadable feed file, bad CSV, write error).
pub const EXIT_RECON_RUNTIME: u8 = 5;

// =============================================================================
// Comp (10-19)
// =============================================================================

/// Won-services CSV failed to parse.
pub const EXIT_COMP_PARSE: u8 = 10;
