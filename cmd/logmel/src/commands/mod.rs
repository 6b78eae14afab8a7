//! CLI commands module.

mod extract;
mod filterbank;
mod tone;
mod util;
mod verify;

pub use extract::ExtractCommand;
pub use filterbank::FilterbankCommand;
pub use tone::ToneCommand;
pub use verify::VerifyCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
