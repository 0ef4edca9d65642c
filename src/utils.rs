use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents.as_ref())
        .await
        .map_err(|err| Error::Config(format!("unable to write to {}: {err}", path.display())))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::Config(format!("failed to read file at {}: {err}", path.display())))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .map_err(|err| Error::Config(format!("failed to parse JSON file at {}: {err}", path.display())))
}

/// Create a directory and any missing parents.
pub(crate) async fn make_dir(p: &Path) -> Result<()> {
    tokio::fs::create_dir_all(p)
        .await
        .map_err(|err| Error::Config(format!("unable to create directory at {}: {err}", p.display())))
}

/// Canonicalize a possibly-relative path.
pub(crate) async fn canonicalize(p: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(p)
        .await
        .map_err(|err| Error::Config(format!("unable to canonicalize {}: {err}", p.display())))
}
