use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use std::fs::{self, File, create_dir_all};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::StoreError;
use crate::navigation::NavigationStack;
use crate::session::{SessionStore, StoreSnapshot};

pub fn save_stack(stack: &NavigationStack, path: &Path) -> Result<(), StoreError> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, stack)?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .finish()?;

    Ok(())
}

pub fn load_stack(path: &Path) -> Result<NavigationStack, StoreError> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(file);
    let mut reader = BufReader::new(decoder);

    let stack: NavigationStack = deserialize_from(&mut reader)?;
    Ok(stack)
}

/// Encode a stack into a gzip compressed buffer
pub fn stack_to_bytes(stack: &NavigationStack) -> Result<Vec<u8>, StoreError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serialize_into(&mut encoder, stack)?;
    Ok(encoder.finish()?)
}

pub fn stack_from_bytes(buffer: &[u8]) -> Result<NavigationStack, StoreError> {
    let decoder = GzDecoder::new(Cursor::new(buffer));
    let mut reader = BufReader::new(decoder);
    Ok(deserialize_from(&mut reader)?)
}

/// Write all live sessions of the store as pretty printed JSON.
///
/// The parent directory is created if needed. The snapshot goes to a
/// sibling `.tmp` file first and is renamed over `path`, so an interrupted
/// write never leaves a truncated snapshot behind.
pub fn save_store(store: &SessionStore, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    let snapshot = store.snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;

    let tmp_path = tmp_path_for(path);
    let mut file = File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp_path, path)?;
    debug!("wrote {} sessions to {}", snapshot.sessions.len(), path.display());

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a session store written by [`save_store`]. A missing file gives an
/// empty store.
pub fn load_store(path: &Path, duration: Duration) -> Result<SessionStore, StoreError> {
    let store = SessionStore::new(duration);
    if !path.exists() {
        return Ok(store);
    }

    let contents = fs::read_to_string(path)?;
    let snapshot: StoreSnapshot = serde_json::from_str(&contents)?;
    store.restore(snapshot);

    Ok(store)
}
