//! Local artifact store.
//!
//! Decides the on-disk location for a fetched diagram and guarantees the file
//! is written exactly once. Naming is either explicit
//! (`{target}.{format}`) or content-derived (`diag-{sha1-of-url}.{format}`);
//! the URL is hashed rather than the raw source so the name is unique per
//! (language, format, source) triple while staying stable across encoder
//! normalization. Presence of the file *is* the cache record: no index is
//! kept, and a file left by a previous run suppresses the fetch entirely.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use kroki_client::{CacheKey, FetchDedupCache, KrokiClient, KrokiDiagram};
use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;

use crate::embed::ResolveError;

/// On-disk, name- or hash-addressed cache of fetched diagram artifacts.
///
/// Owns the fetch-dedup cache; scoped to one conversion run. The files it
/// writes persist across runs and are reused via the existence check.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    dedup: FetchDedupCache,
}

impl ArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the artifact for `diagram` exists under `images_dir` and return
    /// its path (images_dir-relative when `images_dir` itself is relative).
    ///
    /// The network is consulted at most once per unique diagram per run, and
    /// not at all when the target file already exists on disk.
    pub fn materialize(
        &self,
        client: &KrokiClient,
        diagram: &KrokiDiagram,
        images_dir: &Path,
        target_name: Option<&str>,
    ) -> Result<PathBuf, ResolveError> {
        let url = client.image_url(diagram);
        let file_name = artifact_file_name(diagram, &url, target_name);
        let path = images_dir.join(&file_name);

        // A file from a previous run is as good as a resolved fetch.
        if path.exists() {
            tracing::debug!(path = %path.display(), "artifact already on disk, skipping fetch");
            return Ok(path);
        }

        let key = match target_name.filter(|n| !n.is_empty()) {
            Some(_) => CacheKey::Named {
                images_dir: images_dir.to_path_buf(),
                name: file_name,
            },
            None => CacheKey::Url(url),
        };

        let bytes = self.dedup.resolve(key.clone(), || client.fetch(diagram))?;

        self.write_atomic(&path, images_dir, &bytes, &key)?;
        Ok(path)
    }

    /// Write `bytes` to `path` so that a reader never observes a partial
    /// file: the bytes land in a temp file in the same directory, which is
    /// then renamed over the target.
    ///
    /// On failure the dedup entry is invalidated so a later occurrence can
    /// attempt the resolution again.
    fn write_atomic(
        &self,
        path: &Path,
        images_dir: &Path,
        bytes: &[u8],
        key: &CacheKey,
    ) -> Result<(), ResolveError> {
        let result: std::io::Result<()> = (|| {
            fs::create_dir_all(images_dir)?;
            let mut tmp = NamedTempFile::new_in(images_dir)?;
            tmp.write_all(bytes)?;
            tmp.persist(path).map_err(|e| e.error)?;
            Ok(())
        })();

        if let Err(source) = result {
            tracing::warn!(path = %path.display(), "failed to persist artifact, invalidating dedup entry");
            self.dedup.invalidate(key);
            return Err(ResolveError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}

/// Compute the artifact file name for a diagram.
///
/// An explicit non-empty target name wins; otherwise the name is
/// `diag-{hash}.{format}` with the lowercase hex SHA-1 of the GET URL.
fn artifact_file_name(diagram: &KrokiDiagram, url: &str, target_name: Option<&str>) -> String {
    let format = diagram.format.as_str();
    match target_name.filter(|n| !n.is_empty()) {
        Some(name) => format!("{name}.{format}"),
        None => {
            let digest = Sha1::digest(url.as_bytes());
            format!("diag-{}.{format}", hex::encode(digest))
        }
    }
}
