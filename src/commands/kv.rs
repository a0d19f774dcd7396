//! Local key-value commands.
//!
//! - `get <key>` prints the value (empty line when absent)
//! - `set <key> [value]` reads stdin when the value is omitted
//! - `del <key>`, `rename <from> <to>`, `keys`
//! - `edit <key>` round-trips the value through `$EDITOR`
//! - `import <dir>` / `export [-o <dir>]` copy one file per key

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use super::run_command;
use crate::cli::KvAction;
use crate::env::ensure_env;
use crate::kv::{self, KvStore};

/// Execute a key-value command against the store at `path`.
pub fn execute(path: &Path, action: KvAction) -> Result<()> {
    let store = KvStore::open(path)
        .with_context(|| format!("Failed to open store: {}", path.display()))?;
    let stdout = std::io::stdout();
    run(&store, action, &mut stdout.lock(), std::io::stdin())
}

/// Run one command, writing user-facing output to `out`.
pub fn run<W: Write, R: Read>(
    store: &KvStore,
    action: KvAction,
    out: &mut W,
    mut input: R,
) -> Result<()> {
    debug!(?action, "Running kv command");
    match action {
        KvAction::Get { key } => {
            let value = store.get(&key)?.unwrap_or_default();
            writeln!(out, "{value}")?;
        },
        KvAction::Set { key, value } => {
            let value = match value {
                Some(v) => v,
                None => {
                    let mut buf = String::new();
                    input
                        .read_to_string(&mut buf)
                        .context("Failed to read value from stdin")?;
                    buf
                },
            };
            store.set(&key, &value)?;
        },
        KvAction::Del { key } => {
            store.delete(&key)?;
        },
        KvAction::Rename { from, to } => {
            if !store
                .rename(&from, &to)
                .with_context(|| format!("Failed to rename '{from}' to '{to}'"))?
            {
                anyhow::bail!("Key not found: {from}");
            }
        },
        KvAction::Keys => {
            let keys = store.keys()?;
            writeln!(out, "{}", keys.join("\n"))?;
        },
        KvAction::Edit { key } => edit(store, &key)?,
        KvAction::Import { source } => {
            let count = kv::import_dir(store, &source)
                .with_context(|| format!("Failed to import {}", source.display()))?;
            debug!(count, "Imported keys");
        },
        KvAction::Export { outdir } => {
            kv::export_dir(store, &outdir)
                .with_context(|| format!("Failed to export to {}", outdir.display()))?;
            writeln!(out, "Data exported to {}", outdir.display())?;
        },
    }
    Ok(())
}

/// Open the current value in `$EDITOR` and store whatever is saved.
fn edit(store: &KvStore, key: &str) -> Result<()> {
    let editor = ensure_env("EDITOR")?;
    let value = store.get(key)?.unwrap_or_default();

    let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
    let file = dir.path().join(temp_file_name(key));
    std::fs::write(&file, &value)
        .with_context(|| format!("Failed to write {}", file.display()))?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().context("EDITOR is empty")?;
    let mut args: Vec<&str> = parts.collect();
    let file_arg = file.to_str().context("Temporary path contains invalid UTF-8")?;
    args.push(file_arg);
    run_command(program, &args)?;

    let edited = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    store.set(key, &edited)?;
    Ok(())
}

/// Use the key as the file name when it is safe to, so editors pick up the extension.
fn temp_file_name(key: &str) -> &str {
    let plain = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\']);
    if plain { key } else { "value" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(store: &KvStore, action: KvAction, input: &str) -> Result<String> {
        let mut out = Vec::new();
        run(store, action, &mut out, input.as_bytes())?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_get_missing_prints_empty_line() {
        let store = KvStore::memory().unwrap();
        let out = run_capture(&store, KvAction::Get { key: "x".into() }, "").unwrap();
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_set_from_argument_and_stdin() {
        let store = KvStore::memory().unwrap();
        run_capture(
            &store,
            KvAction::Set {
                key: "a".into(),
                value: Some("1".into()),
            },
            "ignored",
        )
        .unwrap();
        run_capture(
            &store,
            KvAction::Set {
                key: "b".into(),
                value: None,
            },
            "from stdin\n",
        )
        .unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("from stdin\n"));

        let out = run_capture(&store, KvAction::Get { key: "a".into() }, "").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn test_keys_one_per_line() {
        let store = KvStore::memory().unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let out = run_capture(&store, KvAction::Keys, "").unwrap();
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, ["a", "b"]);
    }

    #[test]
    fn test_rename_errors() {
        let store = KvStore::memory().unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let missing = KvAction::Rename {
            from: "zzz".into(),
            to: "c".into(),
        };
        assert!(run_capture(&store, missing, "").is_err());

        let taken = KvAction::Rename {
            from: "a".into(),
            to: "b".into(),
        };
        let err = run_capture(&store, taken, "").unwrap_err();
        assert!(format!("{err:#}").contains("UNIQUE constraint failed"), "{err:#}");
    }

    #[test]
    fn test_export_prints_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::memory().unwrap();
        store.set("k", "v").unwrap();

        let outdir = tmp.path().join("out");
        let out = run_capture(&store, KvAction::Export { outdir: outdir.clone() }, "").unwrap();
        assert_eq!(out, format!("Data exported to {}\n", outdir.display()));
        assert_eq!(std::fs::read_to_string(outdir.join("k")).unwrap(), "v");
    }

    #[test]
    fn test_temp_file_name() {
        assert_eq!(temp_file_name("notes.md"), "notes.md");
        assert_eq!(temp_file_name("../x"), "value");
        assert_eq!(temp_file_name(""), "value");
    }
}
