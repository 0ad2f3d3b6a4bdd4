//! Command implementations for the hay-check CLI.
//!
//! - [`run`] - Run the checks
//! - [`list`] - Print the fixture table
//! - [`validate`] - Check the fixture table without a browser
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod list;
pub mod run;
pub(crate) mod utils;
pub mod validate;

pub use list::execute as list_execute;
pub use run::execute as run_execute;
pub use validate::execute as validate_execute;
