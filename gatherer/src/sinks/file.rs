//! Local append-only file sink.

use eyre::{
    Context as _,
    Result,
};
use std::{
    fs::{
        File,
        OpenOptions,
    },
    io::{
        BufWriter,
        Write as _,
    },
    path::{
        Path,
        PathBuf,
    },
};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "txt", "log"];

/// Newline-delimited UTF-8 row sink. The file is opened once per session and
/// kept for append; the header is written only when the file was empty at
/// open time, so sessions appending to an existing export trust its header.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Opens `path` for append, normalizing the extension first and writing
    /// `header` if the file is currently empty.
    pub fn open(path: impl Into<PathBuf>, header: &str) -> Result<Self> {
        let path = normalize_extension(path.into());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .wrap_err_with(|| format!("Failed to create export directory {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .wrap_err_with(|| format!("Failed to open export file {}", path.display()))?;
        let was_empty = file
            .metadata()
            .wrap_err_with(|| format!("Failed to stat export file {}", path.display()))?
            .len()
            == 0;

        let mut writer = BufWriter::new(file);
        if was_empty {
            writeln!(writer, "{header}")
                .wrap_err_with(|| format!("Failed to write header to {}", path.display()))?;
        }

        info!(path = %path.display(), wrote_header = was_empty, "opened export file");
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row. Write failures are logged and the row is dropped;
    /// the next tick gets a fresh attempt through the same handle.
    pub fn append(&mut self, row: &str) {
        if let Err(err) = writeln!(self.writer, "{row}") {
            error!(path = %self.path.display(), %err, "failed to append export row");
        }
    }

    /// Flushes and closes the file.
    pub fn close(mut self) {
        if let Err(err) = self.writer.flush() {
            error!(path = %self.path.display(), %err, "failed to flush export file");
        } else {
            info!(path = %self.path.display(), "closed export file");
        }
    }
}

/// Accepts `.csv`/`.txt`/`.log`; any other (or missing) extension gets `.csv`
/// appended, with a warning since the configured path is being rewritten.
fn normalize_extension(path: PathBuf) -> PathBuf {
    let accepted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if accepted {
        return path;
    }

    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".csv");
    let rewritten = path.with_file_name(name);
    warn!(
        configured = %path.display(),
        using = %rewritten.display(),
        "export path has no accepted extension, appending .csv"
    );
    rewritten
}
