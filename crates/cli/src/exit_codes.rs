//! CLI Exit Code Registry
//!
//! Single source of truth for `fuzzyrecon` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (including runs that found no matches)       |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args, unknown subcommand)       |
//! | 3    | I/O error (cannot read input, cannot write output)   |
//! | 4    | Invalid config (TOML parse or validation failure)    |
//! | 5    | Malformed input (missing name/passthrough column)    |
//! | 6    | Cutoff outside 0..=100                               |

use fuzzyrecon_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, reported by clap.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read an input file or write an output file.
pub const EXIT_IO: u8 = 3;

/// Config could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Input data is missing a required column or record field.
pub const EXIT_MALFORMED_INPUT: u8 = 5;

/// Cutoff outside the score range.
pub const EXIT_INVALID_CUTOFF: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::InvalidCutoff(_) => EXIT_INVALID_CUTOFF,
        ReconError::MalformedRecord { .. } | ReconError::MissingColumn { .. } => EXIT_MALFORMED_INPUT,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::Csv(_) => EXIT_MALFORMED_INPUT,
        ReconError::Io(_) => EXIT_IO,
    }
}
