//! Locale catalogs and user-facing message formatting.
//!
//! Catalogs are JSON trees keyed by dotted paths. Each file in the locale
//! directory is one locale, named after its file stem.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LocaleError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse locale file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Default locale \"{name}\" was not found in the locale directory")]
    MissingDefaultLocale { name: String },
}

/// Display metadata from a catalog's optional `meta` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// A single named message catalog.
#[derive(Debug, Clone)]
pub struct Locale {
    name: String,
    meta: LocaleMeta,
    messages: Value,
}

impl Locale {
    pub fn new(name: impl Into<String>, messages: Value) -> Self {
        let meta = messages
            .get("meta")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
            .unwrap_or_default();

        Self {
            name: name.into(),
            meta,
            messages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &LocaleMeta {
        &self.meta
    }

    /// Resolves a dotted path like `errors.command_not_found.title` to a
    /// string leaf.
    pub fn get(&self, path: &str) -> Option<&str> {
        let mut node = &self.messages;
        for part in path.split('.') {
            node = node.get(part)?;
        }
        node.as_str()
    }
}

/// All catalogs found at startup, with a guaranteed default.
pub struct LocaleStore {
    locales: HashMap<String, Locale>,
    default: Locale,
}

impl LocaleStore {
    /// Loads every `*.json` catalog in `dir`. The default locale must be
    /// among them.
    pub fn load(dir: &Path, default_locale: &str) -> Result<Self, LocaleError> {
        let entries = fs::read_dir(dir).map_err(|e| LocaleError::Io {
            path: dir.to_string_lossy().into_owned(),
            source: e,
        })?;

        let mut locales = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = fs::read_to_string(&path).map_err(|e| LocaleError::Io {
                path: path.to_string_lossy().into_owned(),
                source: e,
            })?;
            let messages: Value =
                serde_json::from_str(&raw).map_err(|e| LocaleError::Parse {
                    path: path.to_string_lossy().into_owned(),
                    source: e,
                })?;

            let locale = Locale::new(name, messages);
            debug!("Loaded locale \"{}\" ({})", name, locale.meta().name);
            locales.insert(name.to_string(), locale);
        }

        let default = locales
            .get(default_locale)
            .cloned()
            .ok_or(LocaleError::MissingDefaultLocale {
                name: default_locale.to_string(),
            })?;

        Ok(Self { locales, default })
    }

    /// Catalog for `name`, falling back to the default locale.
    pub fn get(&self, name: &str) -> &Locale {
        self.locales.get(name).unwrap_or(&self.default)
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }
}

/// Renders catalog templates with positional arguments, under a settable
/// dotted prefix path.
pub struct MessageFormatter<'a> {
    locale: &'a Locale,
    prefix: String,
}

impl<'a> MessageFormatter<'a> {
    pub fn new(locale: &'a Locale) -> Self {
        Self {
            locale,
            prefix: String::new(),
        }
    }

    /// Sets the dotted path prepended to every key passed to [`Self::fmt`]
    /// and [`Self::get`].
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Template at `prefix.key`, or a bracketed path marker when the catalog
    /// has no such leaf. Error handling must keep working on catalog gaps.
    pub fn get(&self, key: &str) -> String {
        let path = self.resolve(key);
        match self.locale.get(&path) {
            Some(template) => template.to_string(),
            None => {
                warn!(
                    "Locale \"{}\" has no message at \"{}\"",
                    self.locale.name(),
                    path
                );
                format!("[{path}]")
            }
        }
    }

    /// Renders `prefix.key` with `{0}`-style placeholders substituted.
    pub fn fmt(&self, key: &str, args: &[&str]) -> String {
        substitute(&self.get(key), args)
    }

    fn resolve(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }
}

/// Replaces `{0}`, `{1}`, … with the matching argument. Placeholders with no
/// matching argument and non-numeric braces are left intact.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };

        let body = &tail[1..end];
        let arg = if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
            body.parse::<usize>().ok().and_then(|i| args.get(i))
        } else {
            None
        };
        match arg {
            Some(value) => out.push_str(value),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn locale() -> Locale {
        Locale::new(
            "en",
            json!({
                "errors": {
                    "command_on_cooldown": "On cooldown, retry in {0}s.",
                    "command_not_found": {
                        "title": "Command not found!"
                    }
                }
            }),
        )
    }

    #[test]
    fn test_meta_parsed_when_present() {
        let locale = Locale::new(
            "en",
            json!({ "meta": { "name": "English", "code": "en" } }),
        );
        assert_eq!(locale.meta().name, "English");
        assert_eq!(locale.meta().code, "en");
    }

    #[test]
    fn test_meta_defaults_when_absent() {
        let locale = locale();
        assert!(locale.meta().name.is_empty());
    }

    #[test]
    fn test_get_resolves_dotted_path() {
        let locale = locale();
        assert_eq!(
            locale.get("errors.command_not_found.title"),
            Some("Command not found!")
        );
    }

    #[test]
    fn test_get_rejects_non_leaf_and_unknown_paths() {
        let locale = locale();
        assert_eq!(locale.get("errors"), None);
        assert_eq!(locale.get("errors.nope"), None);
    }

    #[test]
    fn test_formatter_applies_prefix_and_args() {
        let locale = locale();
        let mut fmt = MessageFormatter::new(&locale);
        fmt.set_prefix("errors");
        assert_eq!(
            fmt.fmt("command_on_cooldown", &["3.50"]),
            "On cooldown, retry in 3.50s."
        );
    }

    #[test]
    fn test_formatter_marks_missing_keys() {
        let locale = locale();
        let mut fmt = MessageFormatter::new(&locale);
        fmt.set_prefix("errors");
        assert_eq!(fmt.get("does_not_exist"), "[errors.does_not_exist]");
    }

    #[test]
    fn test_substitute_positional() {
        assert_eq!(substitute("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(substitute("{1}{0}", &["a", "b"]), "ba");
    }

    #[test]
    fn test_substitute_leaves_unknown_placeholders() {
        assert_eq!(substitute("{0} {2}", &["a"]), "a {2}");
        assert_eq!(substitute("{name}", &["a"]), "{name}");
        assert_eq!(substitute("open { brace", &[]), "open { brace");
    }
}
