//! Writing rendered output to a file or stdout

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Write `content` to `path`, or to stdout when no path is given.
/// Missing parent directories are created.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| Error::FileWrite {
                path: "<stdout>".to_string(),
                source: e,
            });
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }

    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// Create directory if it doesn't exist
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
        path: dir.display().to_string(),
        source: e,
    })
}
