//! INI reading for the storage config, backed by `configparser`.
//!
//! The parser runs case-sensitive, accepts keys without a value, and (through
//! the crate's `indexmap` feature) keeps sections and keys in file order,
//! because task ordering ties fall back to declaration order.
//!
//! The crate merges a repeated `[section]` into the first one and lets a
//! repeated key overwrite the value in place, so duplicates collapse instead
//! of failing the load.

use configparser::ini::Ini;

/// Section that receives keys written before any `[section]` header.
pub const DEFAULT_SECTION: &str = "default";

/// One `key [= value]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniEntry {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<IniEntry>,
}

impl IniSection {
    pub fn get(&self, key: &str) -> Option<&IniEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// Parsed config, sections in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parse `text`; the error is the parser's own message (it names the line).
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut ini = Ini::new_cs();
        ini.set_default_section(DEFAULT_SECTION);
        let map = ini.read(text.to_string())?;

        let sections = map
            .into_iter()
            .filter(|(name, keys)| !(name == DEFAULT_SECTION && keys.is_empty()))
            .map(|(name, keys)| IniSection {
                name,
                entries: keys
                    .into_iter()
                    .map(|(key, value)| IniEntry {
                        key,
                        value: value.filter(|v| !v.is_empty()),
                    })
                    .collect(),
            })
            .collect();
        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter()
    }
}
