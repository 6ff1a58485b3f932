use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::policy::ScoringConfig;
use crate::snapshot::board::BoardSnapshot;
use crate::snapshot::manifest::{content_version, SnapshotManifest, BOARD_FILE, MANIFEST_FILE};
use crate::snapshot::SnapshotError;

/// SnapshotWriter is single-threaded and non-reentrant by design.
pub struct SnapshotWriter {
    config: ScoringConfig,
}

impl SnapshotWriter {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn write(
        &self,
        board: BoardSnapshot,
        output_dir: &Path,
    ) -> Result<SnapshotManifest, SnapshotError> {
        if output_dir.exists() {
            return Err(SnapshotError::OutputExists(output_dir.to_path_buf()));
        }

        // 1. Sort so identical boards serialize identically
        let mut board = board;
        board.sort();

        // 2. Refuse to persist a board that would not load back
        board.verify(&self.config)?;

        // 3. Version is the hash of the exact bytes written
        let board_bytes = serde_json::to_vec_pretty(&board)?;
        let snapshot_version = content_version(&board_bytes);

        // Note: created_at is strictly informational
        let manifest = SnapshotManifest {
            snapshot_version: snapshot_version.clone(),
            config: self.config.clone(),
            created_at: Utc::now(),
            post_count: board.posts.len(),
            vote_count: board.votes.len(),
            board_file: BOARD_FILE.to_string(),
        };

        // 4. Write to temp dir named after the version
        let stem = snapshot_version
            .strip_prefix("sha256:")
            .and_then(|hex| hex.get(..12))
            .ok_or_else(|| SnapshotError::InvalidVersionFormat(snapshot_version.clone()))?;
        let temp_dir = output_dir.with_extension(format!("tmp.{stem}"));

        // A leftover temp dir for this version is from an interrupted write
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(&temp_dir)?;

        let mut f_board = fs::File::create(temp_dir.join(BOARD_FILE))?;
        f_board.write_all(&board_bytes)?;
        f_board.sync_all()?;

        let f_man = fs::File::create(temp_dir.join(MANIFEST_FILE))?;
        serde_json::to_writer_pretty(&f_man, &manifest)?;
        f_man.sync_all()?;

        // 5. Publish: the output dir appears complete or not at all
        fs::rename(&temp_dir, output_dir)?;

        info!(
            version = %manifest.snapshot_version,
            posts = manifest.post_count,
            votes = manifest.vote_count,
            path = %output_dir.display(),
            "wrote board snapshot"
        );

        Ok(manifest)
    }
}
