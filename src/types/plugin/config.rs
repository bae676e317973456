//! Resolver configuration file parsing.

use std::env;
use std::fs;
use std::path::Path;

use crate::types::ds::error::BeanError;

/// Environment variable consulted by [`ResolverConfig::from_env`].
pub const IGNORE_NON_EXISTENT_ENV: &str = "BEAN_IGNORE_NON_EXISTENT";

/// What happens when a path names a field the type does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Reads yield `Null`, writes are ignored.
    Lenient,
    /// Both fail with `UnknownField`.
    Strict,
}

impl Default for UnknownFieldPolicy {
    fn default() -> Self {
        UnknownFieldPolicy::Lenient
    }
}

/// Registry wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub unknown_fields: UnknownFieldPolicy,
    /// Create missing intermediate objects even when the value being set is null.
    pub create_parent_for_null_value: bool,
    /// Keep fields missing from a declared property order, appended after the ordered ones.
    pub include_children_not_in_prop_order: bool,
    /// Treat `getX(T...)` as a reader.
    pub allow_varargs_getters: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            unknown_fields: UnknownFieldPolicy::Lenient,
            create_parent_for_null_value: false,
            include_children_not_in_prop_order: false,
            allow_varargs_getters: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        ResolverConfig::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// [resolver]
    /// unknown_fields = "strict"
    /// create_parent_for_null_value = true
    /// include_children_not_in_prop_order = false
    /// allow_varargs_getters = true
    /// ```
    pub fn load(path: &Path) -> Result<Self, BeanError> {
        let content = fs::read_to_string(path).map_err(|e| BeanError::Config {
            message: format!("failed to read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Only flat `key = value` pairs are understood,
    /// either at the top level or under `[resolver]`.
    pub fn parse(content: &str) -> Result<Self, BeanError> {
        let mut config = ResolverConfig::new();
        let mut current_section = String::new();

        for (number, line) in content.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                continue;
            }
            if !current_section.is_empty() && current_section != "resolver" {
                continue;
            }

            let (key, value) = match line.find('=') {
                Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
                None => {
                    return Err(BeanError::Config {
                        message: format!("line {}: expected `key = value`", number + 1),
                    })
                }
            };
            config.apply(key, value).map_err(|message| BeanError::Config {
                message: format!("line {}: {}", number + 1, message),
            })?;
        }

        Ok(config)
    }

    /// Defaults with the unknown field policy taken from the environment, if set.
    pub fn from_env() -> Self {
        let mut config = ResolverConfig::new();
        if let Ok(flag) = env::var(IGNORE_NON_EXISTENT_ENV) {
            config.apply_ignore_non_existent(&flag);
        }
        config
    }

    /// `true` selects the lenient policy, anything else strict.
    pub fn apply_ignore_non_existent(&mut self, flag: &str) {
        self.unknown_fields = if flag.trim().eq_ignore_ascii_case("true") {
            UnknownFieldPolicy::Lenient
        } else {
            UnknownFieldPolicy::Strict
        };
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "unknown_fields" => {
                self.unknown_fields = match unquote(value) {
                    "lenient" => UnknownFieldPolicy::Lenient,
                    "strict" => UnknownFieldPolicy::Strict,
                    other => return Err(format!("unknown policy `{}`", other)),
                }
            }
            "create_parent_for_null_value" => self.create_parent_for_null_value = parse_bool(value)?,
            "include_children_not_in_prop_order" => {
                self.include_children_not_in_prop_order = parse_bool(value)?
            }
            "allow_varargs_getters" => self.allow_varargs_getters = parse_bool(value)?,
            other => return Err(format!("unknown key `{}`", other)),
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected a boolean, found `{}`", other)),
    }
}
