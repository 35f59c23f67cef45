//! filecloud-organize: sorts files on a FileCloud server into
//! `<target>/<YYYY>/<MM-Month>/` folders by the date in their names.
//!
//! Logs in once, lists the source folder, then walks the files one by one:
//! ensure the year and month folders exist, move the file there, or delete
//! the source copy when the destination already has it.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod filecloud;
mod organize;
mod shutdown;
mod types;

#[cfg(test)]
mod test_support;

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use config::Config;
use filecloud::{FileCloudApi, FileCloudClient};
use organize::{OrganizeConfig, Organizer, RunSummary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args_os().len() <= 1 {
        cli::Cli::command().print_help()?;
        std::process::exit(1);
    }
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let started = Instant::now();
    let config = Config::from_cli(cli)?;
    tracing::debug!(?config, "Starting filecloud-organize");

    let shutdown_token = shutdown::install_signal_handler();
    let summary = run(&config, &shutdown_token).await?;
    if summary.total() > 0 || summary.interrupted {
        summary.log(config.dry_run);
    }

    tracing::info!("--- {} ---", format_duration(started.elapsed()));
    Ok(())
}

/// Log in, list the source folder and organize whatever it holds.
///
/// Login and listing failures end the run; per-file failures are counted in
/// the returned summary.
async fn run(config: &Config, shutdown_token: &CancellationToken) -> anyhow::Result<RunSummary> {
    let session = auth::login(
        &config.server_url,
        &config.username,
        &config.password,
        config.timeout,
    )
    .await?;
    let client = FileCloudClient::new(session);

    let sources = client
        .search(&config.source_folder)
        .await
        .with_context(|| format!("Failed to list {}", config.source_folder))?;

    if sources.is_empty() {
        tracing::info!("No files to move");
        return Ok(RunSummary::default());
    }

    tracing::info!("{} files found in {}", sources.len(), config.source_folder);
    let organizer = Organizer::new(
        &client,
        OrganizeConfig {
            target_root: config.target_root.clone(),
            dry_run: config.dry_run,
        },
    );
    Ok(organizer.run(&sources, shutdown_token).await)
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::test_support::{ScriptedResponse, ScriptedServer};

    const LOGIN_OK: &str = "<commands><command><result>1</result></command></commands>";

    fn exists(result: &str) -> ScriptedResponse {
        ScriptedResponse::ok(&format!(
            "<commands><command><type>fileexists</type><result>{}</result></command></commands>",
            result
        ))
    }

    fn make_config(server: &ScriptedServer) -> Config {
        Config {
            username: "alice".into(),
            password: "hunter2".into(),
            server_url: server.base_url(),
            source_folder: "/alice/Camera".into(),
            target_root: "/alice/Pictures/".into(),
            timeout: Some(Duration::from_secs(5)),
            dry_run: false,
        }
    }

    fn request_paths(server: &ScriptedServer) -> Vec<String> {
        server.requests().into_iter().map(|r| r.path).collect()
    }

    #[tokio::test]
    async fn test_run_stops_after_rejected_login() {
        let server = ScriptedServer::start(vec![
            ScriptedResponse::status(403, ""),
            ScriptedResponse::ok("<entries/>"),
        ])
        .await;

        let err = run(&make_config(&server), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuthError>(),
            Some(AuthError::FailedLogin { status: 403, .. })
        ));
        assert_eq!(request_paths(&server), vec!["/core/loginguest"]);
    }

    #[tokio::test]
    async fn test_run_empty_listing_sends_nothing_further() {
        let server = ScriptedServer::start(vec![
            ScriptedResponse::ok(LOGIN_OK),
            ScriptedResponse::ok("<entries><meta><total>0</total></meta></entries>"),
            exists("0"),
        ])
        .await;

        let summary = run(&make_config(&server), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(
            request_paths(&server),
            vec!["/core/loginguest", "/core/search"]
        );
    }

    #[tokio::test]
    async fn test_run_listing_failure_is_fatal() {
        let server = ScriptedServer::start(vec![
            ScriptedResponse::ok(LOGIN_OK),
            ScriptedResponse::status(500, ""),
        ])
        .await;

        let err = run(&make_config(&server), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to list /alice/Camera"));
        assert_eq!(
            request_paths(&server),
            vec!["/core/loginguest", "/core/search"]
        );
    }

    #[tokio::test]
    async fn test_run_moves_listed_file() {
        let server = ScriptedServer::start(vec![
            ScriptedResponse::ok(LOGIN_OK).with_header("Set-Cookie", "X-token=t0k; Path=/"),
            ScriptedResponse::ok(
                "<entries><entry><path>/alice/Camera/IMG_20230715_0001.jpg</path></entry></entries>",
            ),
            exists("1"),
            exists("0"),
            ScriptedResponse::ok(""),
            exists("0"),
            ScriptedResponse::ok(""),
        ])
        .await;

        let summary = run(&make_config(&server), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary.moved, 1);
        assert_eq!(summary.failed, 0);

        let requests = server.requests();
        let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/core/loginguest",
                "/core/search",
                "/core/fileexists",
                "/core/fileexists",
                "/core/createfolder",
                "/core/fileexists",
                "/core/renameormove",
            ]
        );
        assert_eq!(requests[4].body, "name=07-July&path=%2Falice%2FPictures%2F2023");
        assert_eq!(
            requests[6].body,
            "fromname=%2Falice%2FCamera%2FIMG_20230715_0001.jpg\
             &toname=%2Falice%2FPictures%2F2023%2F07-July%2FIMG_20230715_0001.jpg"
        );
        assert!(requests[1..]
            .iter()
            .all(|r| r.header("cookie").as_deref() == Some("X-token=t0k")));
    }

    #[test]
    fn test_format_duration_sub_minute() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0.00s");
        assert_eq!(format_duration(Duration::from_millis(1250)), "1.25s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59.00s");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 00s");
        assert_eq!(format_duration(Duration::from_secs(754)), "12m 34s");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 00m 00s");
        assert_eq!(format_duration(Duration::from_secs(5025)), "1h 23m 45s");
    }
}
