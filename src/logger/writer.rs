//! File sink for the logger

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open the log file, creating parent directories as needed.
///
/// With `append` unset the file is truncated so each run starts clean.
pub(crate) fn open_log_file(path: &Path, append: bool) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}
