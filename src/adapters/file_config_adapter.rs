//! INI file configuration adapter.

use crate::domain::error::CryptochartError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut ini = Ini::new();
        ini.load(path).map_err(std::io::Error::other)?;
        Ok(Self { ini })
    }

    /// Configuration with no sections; every lookup reports the key as absent.
    pub fn empty() -> Self {
        Self { ini: Ini::new() }
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut ini = Ini::new();
        ini.read(content.to_string())?;
        Ok(Self { ini })
    }

    /// Trimmed raw value; blank counts as absent.
    fn raw(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn typed<T>(
        &self,
        section: &str,
        key: &str,
        expected: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, CryptochartError> {
        let Some(value) = self.raw(section, key) else {
            return Ok(None);
        };
        parse(&value)
            .map(Some)
            .ok_or_else(|| CryptochartError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected {expected}, got {value:?}"),
            })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, CryptochartError> {
        self.typed(section, key, "an integer", |v| v.parse().ok())
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, CryptochartError> {
        self.typed(section, key, "a boolean", parse_bool)
    }
}
