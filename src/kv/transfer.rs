//! Directory import and export.
//!
//! One file per key: the file name is the key and the file contents are the
//! value. Exporting a store and importing the directory into a fresh store
//! yields the same key/value set.

use super::error::{KvError, Result};
use super::store::KvStore;
use std::path::{Component, Path};
use tracing::{debug, warn};

/// Imports every regular file in `dir` as a key-value pair.
///
/// Runs in a single transaction, so a failure part way leaves the store
/// untouched. Entries whose names are not valid UTF-8 are skipped.
/// Returns the number of keys imported.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read, or a write fails.
pub fn import_dir(store: &KvStore, dir: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| KvError::io(format!("read directory {}", dir.display()), e))?;

    store.adapter().transaction(|_| {
        let mut imported = 0;
        for entry in entries {
            let entry =
                entry.map_err(|e| KvError::io(format!("read directory {}", dir.display()), e))?;
            let path = entry.path();
            let is_file = entry
                .file_type()
                .map_err(|e| KvError::io(format!("stat {}", path.display()), e))?
                .is_file();
            if !is_file {
                continue;
            }

            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            let value = std::fs::read_to_string(&path)
                .map_err(|e| KvError::io(format!("read {}", path.display()), e))?;

            store.set(&key, &value)?;
            imported += 1;
        }
        debug!(dir = %dir.display(), imported, "Imported directory");
        Ok(imported)
    })
}

/// Writes every entry of the store into `dir`, one file per key.
///
/// Creates `dir` if needed and overwrites existing files. Returns the number
/// of files written.
///
/// # Errors
///
/// Returns [`KvError::UnsafeKey`] for keys that are not a single plain file
/// name (for example `../x` or `a/b`), or an IO error if a write fails.
pub fn export_dir(store: &KvStore, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .map_err(|e| KvError::io(format!("create {}", dir.display()), e))?;

    let entries = store.all()?;
    for entry in &entries {
        if !is_plain_file_name(&entry.key) {
            return Err(KvError::UnsafeKey(entry.key.clone()));
        }
        let path = dir.join(&entry.key);
        std::fs::write(&path, &entry.value)
            .map_err(|e| KvError::io(format!("write {}", path.display()), e))?;
    }
    debug!(dir = %dir.display(), exported = entries.len(), "Exported directory");
    Ok(entries.len())
}

fn is_plain_file_name(key: &str) -> bool {
    let mut components = Path::new(key).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == key
    )
}
