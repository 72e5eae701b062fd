//! Audio artifact storage.
//!
//! Generated audio files live in a single flat directory. File names are
//! derived from the podcast UUID, so they are unique per job and no
//! coordination is needed between workers. The database stores only the
//! file name; this store turns it back into a filesystem path or a public
//! URL path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix the API serves artifacts under
pub const PUBLIC_PREFIX: &str = "/audio";

/// Handle to the artifact directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory artifacts are stored in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the artifact directory if it doesn't exist
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Canonical artifact file name for a podcast
    pub fn file_name(podcast_id: Uuid, extension: &str) -> String {
        format!("podcast_{podcast_id}.{extension}")
    }

    /// Filesystem path for a stored file name.
    ///
    /// File names must be bare names; anything path-like is rejected so a
    /// corrupted database row cannot reach outside the store.
    pub fn path_for(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return None;
        }
        Some(self.root.join(file_name))
    }

    /// Public URL path for a stored file name
    pub fn public_url(file_name: &str) -> String {
        format!("{PUBLIC_PREFIX}/{file_name}")
    }

    /// Removes an artifact, best-effort.
    ///
    /// Returns true if a file was deleted. Failures are logged and
    /// swallowed; a leaked file never blocks deleting the database row.
    pub fn remove(&self, file_name: &str) -> bool {
        let Some(path) = self.path_for(file_name) else {
            tracing::warn!(file_name, "Refusing to remove artifact with unsafe name");
            return false;
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed audio artifact");
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove audio artifact");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_derived_from_id() {
        let id = Uuid::new_v4();
        let name = ArtifactStore::file_name(id, "wav");
        assert_eq!(name, format!("podcast_{id}.wav"));
    }

    #[test]
    fn test_path_for_joins_root() {
        let store = ArtifactStore::new("/var/lib/bookcast/audio");
        let path = store.path_for("podcast_x.wav").unwrap();
        assert_eq!(path, Path::new("/var/lib/bookcast/audio/podcast_x.wav"));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = ArtifactStore::new("/var/lib/bookcast/audio");
        assert!(store.path_for("../etc/passwd").is_none());
        assert!(store.path_for("a/b.wav").is_none());
        assert!(store.path_for("").is_none());
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            ArtifactStore::public_url("podcast_x.wav"),
            "/audio/podcast_x.wav"
        );
    }

    #[test]
    fn test_ensure_dir_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("audio"));

        store.ensure_dir().unwrap();
        assert!(store.root().is_dir());

        let path = store.path_for("podcast_test.wav").unwrap();
        fs::write(&path, b"RIFF").unwrap();

        assert!(store.remove("podcast_test.wav"));
        assert!(!path.exists());

        // Removing again is a quiet no-op
        assert!(!store.remove("podcast_test.wav"));
    }
}
