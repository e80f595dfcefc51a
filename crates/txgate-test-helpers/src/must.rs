//! Unwrap helpers for test setup code.
//!
//! Setup failures in txgate tests are almost always configuration or
//! registry errors. [`must`] prints the whole `source()` chain so the failing
//! layer is visible, and `#[track_caller]` points the panic at the test line.

use std::error::Error;

/// Unwrap a setup `Result`, panicking with the error and its sources.
///
/// ```rust
/// use txgate_test_helpers::must;
///
/// let parsed: Result<u8, std::num::ParseIntError> = "7".parse();
/// assert_eq!(must(parsed), 7);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Error>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: {}", error_chain(&e)),
    }
}

/// Unwrap an `Option`, naming what was expected to be present.
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, what: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: expected {what}"),
    }
}

fn error_chain(error: &dyn Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
