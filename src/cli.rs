use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "filecloud-organize",
    about = "Organize files by year and month on FileCloud"
)]
pub struct Cli {
    /// FileCloud username
    #[arg(short = 'u', long)]
    pub username: String,

    /// FileCloud password.
    /// WARNING: passing via --password is visible in process listings.
    /// Prefer the FILECLOUD_PASSWORD environment variable instead.
    #[arg(short = 'p', long, env = "FILECLOUD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// FileCloud server's URL
    #[arg(short = 's', long = "server_url", visible_alias = "server-url")]
    pub server_url: String,

    /// FileCloud source folder
    #[arg(short = 'f', long = "source_folder", visible_alias = "source-folder")]
    pub source_folder: String,

    /// FileCloud Pictures folder (year/month folders are created under it)
    #[arg(short = 'd', long = "target_folder", visible_alias = "target-folder")]
    pub target_folder: String,

    /// Check what would happen without creating, moving or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds (default: no timeout)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
