//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;
use reqwest::Url;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [sources] section
    if let Some(section) = ini.section(Some("sources")) {
        if let Some(v) = section.get("origin") {
            let v = v.trim();
            if !v.is_empty() {
                config.sources.origin = parse_origin(v)?;
            }
        }
        if let Some(v) = section.get("public_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.sources.public_dir = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("timeout_secs") {
            config.sources.timeout_secs = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid(
                        "sources",
                        "timeout_secs",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
        if let Some(v) = section.get("local_fallback") {
            config.sources.local_fallback = parse_bool(v)
                .ok_or_else(|| invalid("sources", "local_fallback", v, "must be true or false"))?;
        }
    }

    // [geometry] section
    if let Some(section) = ini.section(Some("geometry")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("geometry", "path", v, "must not be empty"));
            }
            config.geometry.path = v.to_string();
        }
        if let Some(v) = section.get("enabled") {
            config.geometry.enabled = parse_bool(v)
                .ok_or_else(|| invalid("geometry", "enabled", v, "must be true or false"))?;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.path = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Validates an HTTP(S) origin URL.
pub(super) fn parse_origin(value: &str) -> Result<String, ConfigFileError> {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(value.to_string()),
        Ok(_) => Err(invalid("sources", "origin", value, "scheme must be http or https")),
        Err(e) => Err(invalid("sources", "origin", value, &e.to_string())),
    }
}

/// Parse a boolean value from a config string.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
