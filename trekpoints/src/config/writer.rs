//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[sources]
; Base URL dataset paths are resolved against.
; Overridden at runtime by the URL or DEPLOY_PRIME_URL environment variables.
origin = {}
; Local copy of the site's public directory, used when a fetch fails
public_dir = {}
; Seconds to wait for one dataset before falling back
timeout_secs = {}
; Read from public_dir when a fetch fails (true/false).
; Forced off when NETLIFY or AWS_LAMBDA_FUNCTION_NAME is set.
local_fallback = {}

[geometry]
; Public path of the US state boundary GeoJSON
path = {}
; Use state polygons for exact lookups (false = bounding boxes only)
enabled = {}

[output]
; Output document written by `trekpoints build`
path = {}

[logging]
; Directory for log files
directory = {}
; Log file name
file = {}
"#,
        config.sources.origin,
        path_to_string(&config.sources.public_dir),
        config.sources.timeout_secs,
        config.sources.local_fallback,
        config.geometry.path,
        config.geometry.enabled,
        path_to_string(&config.output.path),
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Renders a path, abbreviating the home directory as `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
