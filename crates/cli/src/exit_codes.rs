//! CLI Exit Code Registry
//!
//! Single source of truth for exit codes. They are part of the shell
//! contract — booth scripts branch on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | Runtime error (unreadable file, IO)       |
//! | 2    | Usage error (clap emits this itself)      |
//! | 3    | Invalid engine config                     |
//! | 4    | Household not found                       |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Runtime error - unreadable or unparseable input file.
pub const EXIT_RUNTIME: u8 = 1;

/// Engine config failed to parse or validate.
pub const EXIT_CONFIG: u8 = 3;

/// The requested household key matched nothing in the roll.
pub const EXIT_NOT_FOUND: u8 = 4;
