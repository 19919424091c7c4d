//! Date pattern compilation
//!
//! Collaborators describe layouts with letter patterns such as
//! `yyyy-MM-dd HH:mm:ss`. [`compile`] turns one into a `chrono` strftime
//! string and rejects letters it does not understand.
//!
//! | Letters | Meaning | strftime |
//! |---------|---------|----------|
//! | `yyyy`, `yy` | year, two-digit year | `%Y`, `%y` |
//! | `M`, `MM`, `MMM`, `MMMM` | month | `%-m`, `%m`, `%b`, `%B` |
//! | `d`, `dd` | day of month | `%-d`, `%d` |
//! | `H`, `HH` | hour (0-23) | `%-H`, `%H` |
//! | `h`, `hh` | hour (1-12) | `%-I`, `%I` |
//! | `m`, `mm` | minute | `%-M`, `%M` |
//! | `s`, `ss` | second | `%-S`, `%S` |
//! | `SSS`, `SSSSSS`, `SSSSSSSSS` | fraction of second | `%3f`, `%6f`, `%9f` |
//! | `a` | AM/PM marker | `%p` |
//! | `EEE`, `EEEE` | day of week | `%a`, `%A` |
//! | `'text'` | literal text (`''` is a quote) | |
//!
//! When parsing, fields a pattern omits take defaults: 1970-01-01 for the
//! date, midnight for the time, and AM for 12-hour clocks without `a`.
//! Weekday names are checked against the resolved date.

use chrono::format::{Item, StrftimeItems};

use crate::error::{CommonError, CommonResult};

/// Separates parsed input from the appended defaults
const FILL_SEPARATOR: char = '\u{1}';

/// A validated pattern and its strftime rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    strftime: String,
    fill_format: String,
    fill_input: String,
}

impl CompiledPattern {
    /// The equivalent `chrono` strftime string
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Whether the pattern carries every field of a date-time, so parsing
    /// needs no defaults
    pub fn is_complete(&self) -> bool {
        self.fill_format.is_empty()
    }

    /// Format string and input extended with defaults for omitted fields
    pub(crate) fn with_defaults(&self, input: &str) -> (String, String) {
        (format!("{}{}", self.strftime, self.fill_format), format!("{input}{}", self.fill_input))
    }
}

/// Fields a pattern mentions, tracked for parse defaults
#[derive(Debug, Default)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    meridiem: bool,
    minute: bool,
}

impl Fields {
    fn note(&mut self, letter: char) {
        match letter {
            'y' => self.year = true,
            'M' => self.month = true,
            'd' => self.day = true,
            'H' => self.hour = true,
            'h' => self.hour12 = true,
            'a' => self.meridiem = true,
            'm' => self.minute = true,
            _ => {}
        }
    }

    fn fill(&self) -> (String, String) {
        let defaults = [
            (!self.year, "%Y", "1970"),
            (!self.month, "%m", "01"),
            (!self.day, "%d", "01"),
            (!self.hour && !self.hour12, "%H", "00"),
            (self.hour12 && !self.meridiem, "%p", "AM"),
            (!self.minute, "%M", "00"),
        ];

        let mut format = String::new();
        let mut input = String::new();
        for (_, directive, value) in defaults.into_iter().filter(|(missing, ..)| *missing) {
            format.push(FILL_SEPARATOR);
            format.push_str(directive);
            input.push(FILL_SEPARATOR);
            input.push_str(value);
        }
        (format, input)
    }
}

/// Compile a letter pattern into a strftime string
///
/// # Errors
/// Returns [`CommonError::Validation`] for empty patterns, unknown letters,
/// unsupported repeat counts, and unterminated quotes.
///
/// # Example
/// ```
/// use corekit_common::format::compile;
///
/// let compiled = compile("yyyy-MM-dd'T'HH:mm").unwrap();
/// assert_eq!(compiled.strftime(), "%Y-%m-%dT%H:%M");
/// ```
pub fn compile(pattern: &str) -> CommonResult<CompiledPattern> {
    if pattern.is_empty() {
        return Err(CommonError::validation("pattern", "pattern must not be empty"));
    }

    let mut strftime = String::with_capacity(pattern.len() * 2);
    let mut fields = Fields::default();
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => read_quoted(pattern, &mut chars, &mut strftime)?,
            letter if letter.is_ascii_alphabetic() => {
                let mut count = 1;
                while chars.next_if_eq(&letter).is_some() {
                    count += 1;
                }
                fields.note(letter);
                strftime.push_str(directive(pattern, letter, count)?);
            }
            other => push_literal(&mut strftime, other),
        }
    }

    if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
        return Err(invalid(pattern, "pattern does not compile to a valid format"));
    }
    let (fill_format, fill_input) = fields.fill();
    Ok(CompiledPattern { strftime, fill_format, fill_input })
}

fn directive(pattern: &str, letter: char, count: usize) -> CommonResult<&'static str> {
    let spec = match (letter, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('a', 1) => "%p",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        _ => {
            return Err(invalid(
                pattern,
                format!("unsupported field `{}`", letter.to_string().repeat(count)),
            ))
        }
    };
    Ok(spec)
}

fn read_quoted<I>(
    pattern: &str,
    chars: &mut std::iter::Peekable<I>,
    out: &mut String,
) -> CommonResult<()>
where
    I: Iterator<Item = char>,
{
    // `''` outside a quoted section is a literal quote
    if chars.next_if_eq(&'\'').is_some() {
        out.push('\'');
        return Ok(());
    }
    loop {
        match chars.next() {
            Some('\'') => {
                if chars.next_if_eq(&'\'').is_some() {
                    out.push('\'');
                } else {
                    return Ok(());
                }
            }
            Some(ch) => push_literal(out, ch),
            None => return Err(invalid(pattern, "unterminated quoted literal")),
        }
    }
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn invalid(pattern: &str, message: impl Into<String>) -> CommonError {
    CommonError::validation_with_value("pattern", message, pattern)
}
