//! JSON snapshot files.
//!
//! Every record store is a single JSON document. Reads go through the
//! `FileSystem` boundary so services can be tested against temp dirs.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::infrastructure::traits::FileSystem;

pub fn load_json<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<T> {
    debug!("load_json: {}", path.display());
    let content = fs.read_to_string(path).with_path_context("read", path)?;
    serde_json::from_str(&content).with_path_context("parse", path)
}

pub fn save_json<T: Serialize + ?Sized>(
    fs: &dyn FileSystem,
    path: &Path,
    value: &T,
) -> ApplicationResult<()> {
    debug!("save_json: {}", path.display());
    let content = to_pretty_json(value)?;
    fs.ensure_parent(path).with_path_context("create parent of", path)?;
    fs.write(path, &content).with_path_context("write", path)
}

/// Pretty JSON with a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ApplicationResult<String> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| ApplicationError::InvalidData {
        context: "serialize snapshot".to_string(),
        source: e,
    })?;
    out.push('\n');
    Ok(out)
}
