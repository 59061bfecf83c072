//! Environment overrides for hosted deployments.

use tracing::debug;

use super::settings::ConfigFile;

/// Primary site URL set by the hosting platform.
pub const ENV_URL: &str = "URL";
/// Preview deploy URL, consulted when [`ENV_URL`] is unset.
pub const ENV_DEPLOY_PRIME_URL: &str = "DEPLOY_PRIME_URL";
/// Present when running on Netlify.
pub const ENV_NETLIFY: &str = "NETLIFY";
/// Present inside AWS Lambda.
pub const ENV_LAMBDA_FUNCTION: &str = "AWS_LAMBDA_FUNCTION_NAME";

impl ConfigFile {
    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// The origin comes from `URL`, then `DEPLOY_PRIME_URL`. In a serverless
    /// sandbox (`NETLIFY` or `AWS_LAMBDA_FUNCTION_NAME` set) the local-file
    /// fallback is disabled. Empty variables count as unset.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(origin) = get(ENV_URL).or_else(|| get(ENV_DEPLOY_PRIME_URL)) {
            debug!(origin = %origin, "origin overridden from environment");
            self.sources.origin = origin.trim().to_string();
        }

        if get(ENV_NETLIFY).is_some() || get(ENV_LAMBDA_FUNCTION).is_some() {
            debug!("serverless environment detected; local fallback disabled");
            self.sources.local_fallback = false;
        }

        self
    }
}
