//! Writes export files.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Stdout wrapper that treats a closed downstream pipe as success.
pub(crate) struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

/// Writes `contents` to `dir/file_name`, creating `dir` if needed.
///
/// Returns the path written.
pub async fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    Ok(path)
}

/// Serializes `payload` as pretty JSON and writes it with [`write_export`].
pub async fn write_json_export<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    payload: &T,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(payload)
        .with_context(|| format!("Failed to serialize {}", file_name))?;
    write_export(dir, file_name, &json).await
}

/// Prints `payload` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(payload: &T) -> Result<()> {
    let mut out = IgnoreBrokenPipe::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut out, payload).context("Failed to write JSON to stdout")?;
    writeln!(out).context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")
}
