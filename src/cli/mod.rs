//! CLI command implementations

mod check;
mod context;
mod handle;
mod style;

pub use check::run_check;
pub use handle::run_handle;
