use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Checks if a file exists at the given path
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Reads a whole file as UTF-8 text
pub fn file_get(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Writes the whole content in one call, creating parent directories first
pub fn file_write(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}

/// Last modification time of a file
pub fn file_modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.txt");

        file_write(&path, "first").unwrap();
        file_write(&path, "second").unwrap();

        assert!(file_exists(&path));
        assert_eq!(file_get(&path).unwrap(), "second");
        assert!(file_modified(&path).is_ok());
    }
}
