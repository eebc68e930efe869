//! Result assembly.
//!
//! Converts an engine [`Bundle`](crate::engine::Bundle) into a
//! [`PresentationBundle`]: localized category and goal labels, formatted
//! prices (with an optional display-currency conversion), per-item budget
//! percentages against the goal's ideal allocation, and remaining budget.
//! [`BuildResponse`] wraps the three user-visible outcomes for the
//! presentation layer.
//!
//! Everything here is pure; no I/O.

mod assembler;
mod currency;
mod labels;
mod response;

pub use assembler::{PresentationBundle, PresentationItem, ReportOptions, ResultAssembler};
pub use currency::{Currency, DisplayConversion, DEFAULT_EXCHANGE_RATE};
pub use labels::Locale;
pub use response::BuildResponse;
