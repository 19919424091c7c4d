//! Per-thread formatter store
//!
//! Each thread lazily builds its own map from pattern to
//! [`ScratchFormatter`]. The map is never visible to other threads and lives
//! as long as the thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::formatter::ScratchFormatter;
use crate::error::CommonResult;

thread_local! {
    static SCRATCH_FORMATTERS: RefCell<HashMap<String, Rc<ScratchFormatter>>> =
        RefCell::new(HashMap::new());
}

/// This thread's formatter for `pattern`, created on first use
///
/// # Errors
/// Returns a validation error when `pattern` is invalid; nothing is stored.
pub fn get_or_create_thread_local_formatter(pattern: &str) -> CommonResult<Rc<ScratchFormatter>> {
    SCRATCH_FORMATTERS.with(|store| {
        if let Some(formatter) = store.borrow().get(pattern) {
            return Ok(Rc::clone(formatter));
        }

        let formatter = Rc::new(ScratchFormatter::new(pattern)?);
        trace!(pattern, "created thread-local formatter");
        store.borrow_mut().insert(pattern.to_owned(), Rc::clone(&formatter));
        Ok(formatter)
    })
}

/// Number of formatters held by the current thread
pub fn thread_local_formatter_count() -> usize {
    SCRATCH_FORMATTERS.with(|store| store.borrow().len())
}

/// Drop every formatter held by the current thread
pub fn clear_thread_local_formatters() {
    SCRATCH_FORMATTERS.with(|store| store.borrow_mut().clear());
}
