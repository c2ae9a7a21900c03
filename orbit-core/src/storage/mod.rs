pub mod chain_store;
pub mod node_registry;

pub use chain_store::{AppendOutcome, ChainStore, ReplaceOutcome};
pub use node_registry::NodeRegistry;

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads a JSON document, falling back to `T::default()` when the file is
/// missing, unreadable or malformed. Startup must never abort on a bad file.
pub(crate) async fn read_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No persisted state at {:?}, starting empty", path);
            return T::default();
        }
        Err(error) => {
            tracing::warn!("Failed to read {:?}, starting empty: {}", path, error);
            return T::default();
        }
    };

    match serde_json::from_slice(&data) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!("Malformed JSON in {:?}, starting empty: {}", path, error);
            T::default()
        }
    }
}

/// Serializes `value` as pretty JSON and replaces `path` with it through a
/// temp file in the same directory. The temp file never outlives a failure.
pub(crate) async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let data = serde_json::to_vec_pretty(value)?;

    let tmp_path = path.with_extension(format!("{}.tmp", ulid::Ulid::new()));
    if let Err(error) = write_then_rename(&tmp_path, path, &data).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(error.into());
    }

    Ok(())
}

async fn write_then_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp_path, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_tmp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn test_write_json_atomic_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"old").unwrap();

        write_json_atomic(&path, &vec![1, 2, 3]).await.unwrap();

        let value: Vec<u32> = read_json_or_default(&path).await;
        assert_eq!(value, vec![1, 2, 3]);
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail.
        let path = dir.path().join("state.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        assert!(write_json_atomic(&path, &vec![1]).await.is_err());
        assert!(leftover_tmp_files(dir.path()).is_empty());

        let missing = dir.path().join("gone").join("state.json");
        assert!(write_json_atomic(&missing, &vec![1]).await.is_err());
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_read_json_or_default_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let missing: Vec<u32> = read_json_or_default(&path).await;
        assert!(missing.is_empty());

        std::fs::write(&path, b"{oops").unwrap();
        let malformed: Vec<u32> = read_json_or_default(&path).await;
        assert!(malformed.is_empty());
    }
}
