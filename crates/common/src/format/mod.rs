//! Date formatter caches
//!
//! Two caching strategies, picked by whether the cached value can be shared:
//!
//! - **Thread-confined**: [`ScratchFormatter`] keeps a mutable buffer and is
//!   `!Sync`. Each thread gets its own instance per pattern from
//!   [`get_or_create_thread_local_formatter`]; no locking is involved.
//! - **Shared**: [`DateFormatter`] is immutable. One instance per pattern is
//!   kept in a [`SharedFormatters`] cache and handed out as an `Arc`.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use corekit_common::format::{
//!     get_or_create_shared_formatter, get_or_create_thread_local_formatter,
//! };
//!
//! let date = NaiveDate::from_ymd_opt(2022, 6, 6).unwrap();
//!
//! let local = get_or_create_thread_local_formatter("yyyy-MM-dd").unwrap();
//! assert_eq!(local.format_date(&date), "2022-06-06");
//!
//! let shared = get_or_create_shared_formatter("yyyy-MM-dd").unwrap();
//! assert_eq!(shared.format_date(&date), "2022-06-06");
//! ```

mod formatter;
mod local;
mod pattern;
mod shared;

use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDateTime;

pub use self::formatter::{DateFormatter, ScratchFormatter};
pub use self::local::{
    clear_thread_local_formatters, get_or_create_thread_local_formatter,
    thread_local_formatter_count,
};
pub use self::pattern::{compile, CompiledPattern};
pub use self::shared::{shared, SharedFormatters, DEFAULT_SHARED_FORMATTERS};
use crate::error::CommonResult;

/// Process-wide shared formatter for `pattern`
///
/// # Errors
/// Returns a validation error when `pattern` is invalid.
pub fn get_or_create_shared_formatter(pattern: &str) -> CommonResult<Arc<DateFormatter>> {
    shared().get_or_create(pattern)
}

/// Format `value` with this thread's formatter for `pattern`
///
/// # Errors
/// Returns a validation error when `pattern` is invalid.
pub fn format_with_pattern(value: &NaiveDateTime, pattern: &str) -> CommonResult<String> {
    let formatter: Rc<ScratchFormatter> = get_or_create_thread_local_formatter(pattern)?;
    Ok(formatter.format(value))
}
