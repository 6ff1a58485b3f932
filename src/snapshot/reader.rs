// Read-only: a loaded snapshot is verified once and then handed to a store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::snapshot::board::BoardSnapshot;
use crate::snapshot::manifest::{content_version, SnapshotManifest, MANIFEST_FILE};
use crate::snapshot::SnapshotError;
use crate::store::MemoryVoteStore;

#[derive(Debug)]
pub struct LoadedSnapshot {
    pub root: PathBuf,
    pub manifest: SnapshotManifest,
    pub board: BoardSnapshot,
}

impl LoadedSnapshot {
    pub fn into_store(self) -> Result<MemoryVoteStore, SnapshotError> {
        Ok(MemoryVoteStore::from_snapshot(&self.board)?)
    }
}

pub struct SnapshotReader;

impl SnapshotReader {
    pub fn load(root: &Path) -> Result<LoadedSnapshot, SnapshotError> {
        let f_man = fs::File::open(root.join(MANIFEST_FILE))?;
        let manifest: SnapshotManifest = serde_json::from_reader(f_man)?;

        // Verify content against the manifest version before parsing it
        let board_bytes = fs::read(root.join(&manifest.board_file))?;
        let found = content_version(&board_bytes);
        if found != manifest.snapshot_version {
            return Err(SnapshotError::VersionMismatch {
                expected: manifest.snapshot_version.clone(),
                found,
            });
        }

        let board: BoardSnapshot = serde_json::from_slice(&board_bytes)?;
        if board.posts.len() != manifest.post_count || board.votes.len() != manifest.vote_count {
            return Err(SnapshotError::CountMismatch {
                posts: board.posts.len(),
                votes: board.votes.len(),
            });
        }
        board.verify(&manifest.config)?;

        info!(
            version = %manifest.snapshot_version,
            posts = manifest.post_count,
            votes = manifest.vote_count,
            "loaded board snapshot"
        );

        Ok(LoadedSnapshot {
            root: root.to_path_buf(),
            manifest,
            board,
        })
    }
}
