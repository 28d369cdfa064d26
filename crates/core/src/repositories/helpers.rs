//! Whole-file JSON persistence shared by every store.
//!
//! Every document is read completely and written completely; there are no partial updates.

use crate::constants::JSON_INDENT;
use crate::{ExplorerError, ExplorerResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the file at `path`, returning `None` when it does not exist.
pub(crate) fn read_optional(path: &Path) -> ExplorerResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ExplorerError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads a JSON document, or `T::default()` if the file is absent.
///
/// A missing file is logged but is not an error. A present file that does not parse as `T`
/// is rejected.
pub(crate) fn load_or_default<T>(path: &Path) -> ExplorerResult<T>
where
    T: DeserializeOwned + Default,
{
    match read_optional(path)? {
        Some(contents) => parse(path, &contents),
        None => {
            tracing::warn!("{} not found, starting empty", path.display());
            Ok(T::default())
        }
    }
}

pub(crate) fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> ExplorerResult<T> {
    serde_json::from_str(contents).map_err(|source| ExplorerError::Deserialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `value` as JSON with four-space indentation.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ExplorerResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(ExplorerError::Serialization)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Overwrites `path` with the pretty-printed document.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExplorerResult<()> {
    let rendered = to_pretty_json(value)?;
    fs::write(path, rendered).map_err(|source| ExplorerError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates `dir` and any missing parents.
pub(crate) fn ensure_dir(dir: &Path) -> ExplorerResult<()> {
    fs::create_dir_all(dir).map_err(|source| ExplorerError::DirCreation {
        path: dir.to_path_buf(),
        source,
    })
}
