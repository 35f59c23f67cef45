use std::time::Duration;

use anyhow::Context;

/// Validated application configuration.
pub struct Config {
    pub username: String,
    pub password: String,
    /// Server base URL without a trailing `/`.
    pub server_url: String,
    pub source_folder: String,
    /// Target root, always ending in exactly one `/`.
    pub target_root: String,
    pub timeout: Option<Duration>,
    pub dry_run: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server_url", &self.server_url)
            .field("source_folder", &self.source_folder)
            .field("target_root", &self.target_root)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.username.trim().is_empty() {
            anyhow::bail!("--username must not be empty");
        }
        if cli.source_folder.trim().is_empty() {
            anyhow::bail!("--source_folder must not be empty");
        }

        Ok(Self {
            username: cli.username,
            password: cli.password,
            server_url: normalize_server_url(&cli.server_url)?,
            source_folder: cli.source_folder,
            target_root: normalize_target_root(&cli.target_folder)?,
            timeout: cli.timeout_secs.map(Duration::from_secs),
            dry_run: cli.dry_run,
        })
    }
}

/// Parse the server URL and strip trailing slashes so endpoint paths can be
/// appended directly.
fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .with_context(|| format!("Invalid --server_url '{}'", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!(
            "Invalid --server_url '{}': scheme must be http or https",
            raw
        );
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// `/Pictures` and `/Pictures/` both become `/Pictures/`.
fn normalize_target_root(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        anyhow::bail!("--target_folder must name a folder below the root");
    }
    Ok(format!("{}/", trimmed))
}
