//! Relocation engine: sorts source files into `<root>/<YYYY>/<MM-Month>/`
//! by the date in their names.
//!
//! Files are processed one at a time. Each yields its own
//! `Result<FileOutcome, OrganizeError>`, so a failure never stops the run;
//! results are folded into a [`RunSummary`]. A source file is deleted only
//! after the destination check reported an existing copy.

pub mod error;
pub mod paths;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::filecloud::{Existence, FileCloudApi};

pub use self::error::OrganizeError;
use self::paths::Destination;

/// Subset of application config consumed by the organizer.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Target root ending in `/`.
    pub target_root: String,
    pub dry_run: bool,
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Moved { destination: String },
    /// The destination already had the file; the source copy was deleted.
    DuplicateDeleted { destination: String },
    WouldMove { destination: String },
    WouldDelete { destination: String },
}

impl FileOutcome {
    pub fn destination(&self) -> &str {
        match self {
            FileOutcome::Moved { destination }
            | FileOutcome::DuplicateDeleted { destination }
            | FileOutcome::WouldMove { destination }
            | FileOutcome::WouldDelete { destination } => destination,
        }
    }
}

/// Totals for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub moved: usize,
    pub duplicates_deleted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.moved + self.duplicates_deleted + self.skipped + self.failed
    }

    fn record(&mut self, result: &Result<FileOutcome, OrganizeError>) {
        match result {
            Ok(FileOutcome::Moved { .. } | FileOutcome::WouldMove { .. }) => self.moved += 1,
            Ok(FileOutcome::DuplicateDeleted { .. } | FileOutcome::WouldDelete { .. }) => {
                self.duplicates_deleted += 1
            }
            Err(e) if e.is_skip() => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn log(&self, dry_run: bool) {
        if dry_run {
            tracing::info!("── Dry Run Summary ──");
            tracing::info!(
                "  {} would be moved, {} duplicates would be deleted, {} skipped, {} failed, {} total",
                self.moved,
                self.duplicates_deleted,
                self.skipped,
                self.failed,
                self.total()
            );
        } else {
            tracing::info!("── Summary ──");
            tracing::info!(
                "  {} moved, {} duplicates deleted, {} skipped, {} failed, {} total",
                self.moved,
                self.duplicates_deleted,
                self.skipped,
                self.failed,
                self.total()
            );
        }
        if self.interrupted {
            tracing::info!("  Interrupted before all files were processed");
        }
    }
}

pub struct Organizer<'a, A: FileCloudApi + ?Sized> {
    api: &'a A,
    config: OrganizeConfig,
}

impl<'a, A: FileCloudApi + ?Sized> Organizer<'a, A> {
    pub fn new(api: &'a A, config: OrganizeConfig) -> Self {
        Self { api, config }
    }

    /// Organize every file in `sources`, in order, until done or shutdown.
    pub async fn run(&self, sources: &[String], shutdown_token: &CancellationToken) -> RunSummary {
        tracing::info!("> Moving files to the target folder");
        let mut summary = RunSummary::default();

        for source in sources {
            if shutdown_token.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let span = tracing::info_span!("file", path = %source);
            let result = self.organize_file(source).instrument(span.clone()).await;
            span.in_scope(|| match &result {
                Ok(outcome) => tracing::debug!(destination = outcome.destination(), "done"),
                Err(e) => tracing::error!("> Exception: {}", e),
            });
            summary.record(&result);
        }

        summary
    }

    /// Move `source` into its dated folder, or delete it when the
    /// destination already holds a copy.
    pub async fn organize_file(&self, source: &str) -> Result<FileOutcome, OrganizeError> {
        let filename = paths::file_name(source);
        let dest = paths::destination_for(&self.config.target_root, filename)?;

        self.ensure_folder(&dest.year_folder).await?;
        self.ensure_folder(&dest.month_folder).await?;

        tracing::info!("> Checking if file exists in destination");
        match self.api.file_exists(&dest.file).await? {
            Existence::Absent => self.move_file(source, &dest).await,
            Existence::Present => self.delete_duplicate(source, &dest).await,
            existence @ Existence::Unknown(_) => Err(OrganizeError::UnexpectedExistence {
                path: dest.file,
                existence,
            }),
        }
    }

    /// Create `folder` if the server reports it missing.
    ///
    /// Creation failures and unexpected check results are only logged.
    async fn ensure_folder(&self, folder: &str) -> Result<(), OrganizeError> {
        tracing::info!("> Checking if the '{}' folder exists", folder);
        match self.api.file_exists(folder).await? {
            Existence::Present => tracing::info!("> {} folder exists.", folder),
            Existence::Absent if self.config.dry_run => {
                tracing::info!("> {} folder does not exist. Would create it.", folder);
            }
            Existence::Absent => {
                tracing::info!("> {} folder does not exist. Creating it now.", folder);
                let (parent, name) = paths::split_parent(folder);
                match self.api.create_folder(parent, name).await {
                    Ok(()) => tracing::info!("> Folder '{}' created successfully!", folder),
                    Err(e) => tracing::warn!("> Folder '{}' could not be created: {}", folder, e),
                }
            }
            other @ Existence::Unknown(_) => {
                tracing::warn!("> Existence check for '{}' returned {}", folder, other);
            }
        }
        Ok(())
    }

    async fn move_file(&self, source: &str, dest: &Destination) -> Result<FileOutcome, OrganizeError> {
        let destination = dest.file.clone();
        if self.config.dry_run {
            tracing::info!("> Would move file '{}' to '{}'", source, dest.month_folder);
            return Ok(FileOutcome::WouldMove { destination });
        }

        tracing::info!("> Moving file '{}' to '{}'", source, dest.month_folder);
        self.api
            .rename_or_move(source, &destination)
            .await
            .map_err(|e| OrganizeError::Move {
                from: source.to_string(),
                to: destination.clone(),
                source: e,
            })?;
        tracing::info!("> File '{}' moved successfully!", source);
        Ok(FileOutcome::Moved { destination })
    }

    async fn delete_duplicate(
        &self,
        source: &str,
        dest: &Destination,
    ) -> Result<FileOutcome, OrganizeError> {
        let destination = dest.file.clone();
        if self.config.dry_run {
            tracing::info!("> {} exists. Would delete it from source", destination);
            return Ok(FileOutcome::WouldDelete { destination });
        }

        tracing::info!("> {} exists. Deleting it from source", destination);
        let (parent, name) = paths::split_parent(source);
        self.api
            .delete_file(parent, name)
            .await
            .map_err(|e| OrganizeError::Delete {
                path: source.to_string(),
                source: e,
            })?;
        tracing::info!("> File '{}' deleted successfully!", source);
        Ok(FileOutcome::DuplicateDeleted { destination })
    }
}
