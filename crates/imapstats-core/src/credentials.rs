//! Password file.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads the password stored in `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::Credentials`] if the file cannot be read.
pub fn read_password(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Credentials {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents.trim().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass");
        fs::write(&path, "  hunter2\n").unwrap();
        assert_eq!(read_password(&path).unwrap(), "hunter2");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope");
        let err = read_password(&path).unwrap_err();
        assert!(matches!(err, Error::Credentials { path: p, .. } if p == path));
    }
}
