//! Configuration access port trait.

use crate::domain::error::CryptochartError;

/// Keyed lookups into `[section] key = value` configuration.
///
/// Typed getters return `Ok(None)` when the key is absent or blank and
/// `ConfigInvalid` when a value is present but does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, CryptochartError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, CryptochartError>;
}
