//! Canonical singleton keys
//!
//! A key is the type name alone when the constructor arguments serialize to
//! JSON `null` (including `()`), otherwise `"{type_name}#{json}"` where the
//! JSON is compact and object keys are sorted. Equal argument values always
//! produce equal keys regardless of field declaration order.

use std::any::type_name;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CommonError, CommonResult};

/// Separator between the type name and the rendered arguments
pub const ARGS_SEPARATOR: char = '#';

/// Key for the singleton of type `T` constructed from `args`
///
/// # Errors
/// Returns [`CommonError::Serialization`] when `args` cannot be rendered as
/// JSON.
///
/// # Example
/// ```
/// use corekit_common::registry::singleton_key;
///
/// struct Pool;
///
/// assert!(singleton_key::<Pool, _>(&()).unwrap().ends_with("Pool"));
/// assert!(singleton_key::<Pool, _>(&("db", 4)).unwrap().ends_with(r#"Pool#["db",4]"#));
/// ```
pub fn singleton_key<T: ?Sized, A: Serialize + ?Sized>(args: &A) -> CommonResult<String> {
    key_for_name(type_name::<T>(), args)
}

/// Key for the singleton registered as `name` constructed from `args`
///
/// # Errors
/// Returns [`CommonError::Serialization`] when `args` cannot be rendered as
/// JSON.
pub fn key_for_name<A: Serialize + ?Sized>(name: &str, args: &A) -> CommonResult<String> {
    let value = serde_json::to_value(args)?;
    Ok(render(name, &value))
}

/// Reject empty keys before they reach the lock table
pub(crate) fn validate_key(key: &str) -> CommonResult<()> {
    if key.trim().is_empty() {
        return Err(CommonError::validation("key", "singleton key must not be empty"));
    }
    Ok(())
}

fn render(name: &str, args: &Value) -> String {
    if args.is_null() {
        name.to_owned()
    } else {
        // serde_json's default map is a BTreeMap, so object keys come out sorted
        format!("{name}{ARGS_SEPARATOR}{args}")
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for registry::key.
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Forward {
        host: &'static str,
        port: u16,
    }

    #[derive(Serialize)]
    struct Reversed {
        port: u16,
        host: &'static str,
    }

    /// Validates the bare type key.
    ///
    /// Assertions:
    /// - Confirms unit and `None` arguments produce the bare type name.
    #[test]
    fn test_key_without_arguments() {
        assert_eq!(singleton_key::<u32, _>(&()).expect("key"), "u32");
        assert_eq!(singleton_key::<u32, _>(&Option::<u8>::None).expect("key"), "u32");
    }

    /// Validates canonical ordering of object arguments.
    ///
    /// Assertions:
    /// - Confirms structs with the same fields in different order share a key.
    /// - Confirms the key matches a hand-written JSON value.
    #[test]
    fn test_key_is_field_order_independent() {
        let forward = Forward { host: "localhost", port: 80 };
        let reversed = Reversed { port: 80, host: "localhost" };
        let forward = key_for_name("Client", &forward).expect("key");
        let reversed = key_for_name("Client", &reversed).expect("key");
        let literal =
            key_for_name("Client", &json!({"port": 80, "host": "localhost"})).expect("key");

        assert_eq!(forward, reversed);
        assert_eq!(forward, literal);
        assert_eq!(forward, r#"Client#{"host":"localhost","port":80}"#);
    }

    /// Validates that distinct argument lists yield distinct keys.
    ///
    /// Assertions:
    /// - Ensures `("a", 1)` and `("a", 2)` produce different keys.
    #[test]
    fn test_key_distinguishes_arguments() {
        let first = key_for_name("Pool", &("a", 1)).expect("key");
        let second = key_for_name("Pool", &("a", 2)).expect("key");
        assert_ne!(first, second);
    }

    /// Validates empty key rejection.
    ///
    /// Assertions:
    /// - Ensures blank keys are validation errors.
    #[test]
    fn test_validate_key() {
        assert!(validate_key("config").is_ok());
        assert!(matches!(validate_key("  "), Err(CommonError::Validation { .. })));
    }
}
