//! Date formatters
//!
//! [`DateFormatter`] is immutable and `Sync`; one instance can serve every
//! thread. [`ScratchFormatter`] reuses an internal buffer between calls,
//! which makes it `!Sync`; it is meant to live in a thread-local store.

use std::cell::RefCell;
use std::fmt::{self, Write as _};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::pattern::{compile, CompiledPattern};
use crate::error::{CommonError, CommonResult};

/// Immutable formatter for one pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
    compiled: CompiledPattern,
}

impl DateFormatter {
    /// Compile `pattern` into a formatter
    ///
    /// # Errors
    /// Returns [`CommonError::Validation`] when the pattern is empty or
    /// invalid.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use corekit_common::format::DateFormatter;
    ///
    /// let formatter = DateFormatter::new("dd/MM/yyyy").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2022, 6, 6).unwrap();
    /// assert_eq!(formatter.format_date(&date), "06/06/2022");
    /// ```
    pub fn new(pattern: &str) -> CommonResult<Self> {
        Ok(Self { pattern: pattern.to_owned(), compiled: compile(pattern)? })
    }

    /// The pattern this formatter was built from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a date-time
    pub fn format(&self, value: &NaiveDateTime) -> String {
        let mut out = String::with_capacity(self.pattern.len() + 8);
        // Compiled patterns contain no error items, so writing cannot fail.
        let _ = self.format_into(value, &mut out);
        out
    }

    /// Render a date at midnight
    pub fn format_date(&self, value: &NaiveDate) -> String {
        self.format(&value.and_time(NaiveTime::default()))
    }

    /// Append the rendering of `value` to `out`
    ///
    /// # Errors
    /// Propagates errors from the underlying writer.
    pub fn format_into<W: fmt::Write>(&self, value: &NaiveDateTime, out: &mut W) -> fmt::Result {
        write!(out, "{}", value.format(self.compiled.strftime()))
    }

    /// Parse `input` laid out according to this pattern
    ///
    /// Fields the pattern omits take defaults: date-only patterns parse to
    /// midnight and time-only patterns to 1970-01-01.
    ///
    /// # Errors
    /// Returns [`CommonError::Validation`] when `input` does not match.
    pub fn parse(&self, input: &str) -> CommonResult<NaiveDateTime> {
        let parsed = if self.compiled.is_complete() {
            NaiveDateTime::parse_from_str(input, self.compiled.strftime())
        } else {
            let (format, filled) = self.compiled.with_defaults(input);
            NaiveDateTime::parse_from_str(&filled, &format)
        };
        parsed.map_err(|err| {
            CommonError::validation_with_value(
                "input",
                format!("does not match pattern `{}`: {err}", self.pattern),
                input,
            )
        })
    }
}

/// Formatter that reuses one output buffer across calls
///
/// Not `Sync`: share it only within a thread.
#[derive(Debug)]
pub struct ScratchFormatter {
    inner: DateFormatter,
    buffer: RefCell<String>,
}

impl ScratchFormatter {
    /// Compile `pattern` into a scratch formatter
    ///
    /// # Errors
    /// Returns [`CommonError::Validation`] when the pattern is invalid.
    pub fn new(pattern: &str) -> CommonResult<Self> {
        Ok(Self { inner: DateFormatter::new(pattern)?, buffer: RefCell::new(String::new()) })
    }

    /// The pattern this formatter was built from
    pub fn pattern(&self) -> &str {
        self.inner.pattern()
    }

    /// Render `value` into the scratch buffer and hand it to `visit`
    ///
    /// Reentrant calls fall back to a fresh buffer.
    pub fn format_with<R>(&self, value: &NaiveDateTime, visit: impl FnOnce(&str) -> R) -> R {
        if let Ok(mut buffer) = self.buffer.try_borrow_mut() {
            buffer.clear();
            let _ = self.inner.format_into(value, &mut *buffer);
            return visit(&buffer);
        }
        visit(&self.inner.format(value))
    }

    /// Render a date-time
    pub fn format(&self, value: &NaiveDateTime) -> String {
        self.format_with(value, str::to_owned)
    }

    /// Render a date at midnight
    pub fn format_date(&self, value: &NaiveDate) -> String {
        self.format(&value.and_time(NaiveTime::default()))
    }

    /// Parse `input` laid out according to this pattern
    ///
    /// # Errors
    /// Returns [`CommonError::Validation`] when `input` does not match.
    pub fn parse(&self, input: &str) -> CommonResult<NaiveDateTime> {
        self.inner.parse(input)
    }
}
