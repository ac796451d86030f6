//! Raw INI tables loaded through the `config` crate.
//!
//! Every value is kept as a string; callers convert the keys they need.
//! Section and key lookups ignore ASCII case, the way INI readers usually do.
//! Values are taken literally: backslashes, quotes, `#` and `;` survive, so
//! Windows paths and search texts load exactly as written.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

use ::ini::{Ini, ParseOption};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileStoredFormat, Format, Map, Value, ValueKind};

use crate::error::ConfigError;

/// INI format with escapes and quote stripping turned off.
#[derive(Debug, Clone, Copy)]
struct LiteralIni;

impl Format for LiteralIni {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        let mut tables = Map::new();
        // Keys outside any section have no meaning here.
        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                continue;
            };
            let mut entries = Map::new();
            for (key, value) in properties.iter() {
                entries.insert(
                    key.to_string(),
                    Value::new(uri, ValueKind::String(value.to_string())),
                );
            }
            tables.insert(section.to_string(), Value::new(uri, ValueKind::Table(entries)));
        }
        Ok(tables)
    }
}

impl FileStoredFormat for LiteralIni {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }
}

#[derive(Debug, Clone, Default)]
pub struct IniTables {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniTables {
    /// Load an INI file from disk. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = File::new(&path.to_string_lossy(), LiteralIni).required(true);
        Self::build(Config::builder().add_source(source))
    }

    /// Parse INI text directly.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(contents, LiteralIni)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let sections = builder
            .build()?
            .try_deserialize::<HashMap<String, HashMap<String, String>>>()?;
        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<Section<'_>> {
        self.sections
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, entries)| Section { name: key, entries })
    }

    pub fn require_section(&self, name: &str) -> Result<Section<'_>, ConfigError> {
        self.section(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))
    }
}

/// A borrowed view of one `[section]`.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'a str,
    entries: &'a HashMap<String, String>,
}

impl<'a> Section<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn require(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            section: self.name.to_string(),
            key: key.to_string(),
        })
    }

    pub fn require_parsed<T: FromStr>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self.require(key)?;
        raw.trim().parse().map_err(|_| self.invalid(key, raw))
    }

    /// Accepts true/false, yes/no, on/off and 1/0 in any case.
    pub fn require_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let raw = self.require(key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(key, raw)),
        }
    }

    fn invalid(&self, key: &str, value: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
