//! Line-oriented file I/O
//!
//! Whole-file rewrites go through a temp file and a rename so a crash leaves
//! either the old or the new content. Appends never touch existing bytes.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::TrackerError;

const TAIL_CHUNK: u64 = 4096;

/// Sibling temp path used while rewriting `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a whole file as text, replacing invalid UTF-8.
///
/// Returns `None` if the file doesn't exist.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Option<String>, TrackerError> {
    let path = path.as_ref();

    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TrackerError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write lines to a file atomically (write to temp, then rename)
pub fn write_lines_atomic<P, I>(path: P, lines: I) -> Result<(), TrackerError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = String>,
{
    write_atomic_with(path, |writer| {
        for line in lines {
            writeln!(writer, "{}", line)
                .map_err(|e| TrackerError::Storage(format!("Failed to write data: {}", e)))?;
        }
        Ok(())
    })
}

/// Write a file atomically through a caller-supplied writer.
///
/// The content goes to a sibling temp file which is synced and then renamed
/// over `path`. On any failure the temp file is removed and `path` is left
/// as it was.
pub fn write_atomic_with<P, F>(path: P, write: F) -> Result<(), TrackerError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> Result<(), TrackerError>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TrackerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let result = write_synced(&temp_path, write).and_then(|_| {
        fs::rename(&temp_path, path)
            .map_err(|e| TrackerError::Storage(format!("Failed to rename temp file: {}", e)))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<F>(path: &Path, write: F) -> Result<(), TrackerError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), TrackerError>,
{
    let file = File::create(path)
        .map_err(|e| TrackerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;

    writer
        .flush()
        .map_err(|e| TrackerError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| TrackerError::Storage(format!("Failed to sync data: {}", e)))
}

/// Append lines after the current content, creating the file if needed.
///
/// A missing trailing newline on the existing content is repaired first so
/// the appended lines never merge into the last one.
pub fn append_lines<P, I>(path: P, lines: I) -> Result<(), TrackerError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = String>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| TrackerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let needs_newline = ends_without_newline(&mut file)?;

    let mut writer = BufWriter::new(file);
    if needs_newline {
        writeln!(writer)?;
    }
    for line in lines {
        writeln!(writer, "{}", line)
            .map_err(|e| TrackerError::Storage(format!("Failed to append data: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| TrackerError::Storage(format!("Failed to flush data: {}", e)))
}

fn ends_without_newline(file: &mut File) -> Result<bool, TrackerError> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read the last non-empty line of a file without loading all of it.
///
/// Returns `None` if the file doesn't exist or holds no lines.
pub fn read_last_line<P: AsRef<Path>>(path: P) -> Result<Option<String>, TrackerError> {
    let path = path.as_ref();

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(TrackerError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    let mut end = file.metadata()?.len();
    let mut tail: Vec<u8> = Vec::new();

    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK);
        let mut chunk = vec![0u8; (end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&tail);
        tail = chunk;
        end = start;

        if let Some(content_end) = content_end(&tail) {
            if let Some(newline) = tail[..content_end].iter().rposition(|&b| b == b'\n') {
                return Ok(Some(
                    String::from_utf8_lossy(&tail[newline + 1..content_end]).into_owned(),
                ));
            }
        }
    }

    // Reached the start of the file: the whole remainder is one line
    Ok(content_end(&tail).map(|e| String::from_utf8_lossy(&tail[..e]).into_owned()))
}

/// Index just past the last byte that isn't a line terminator
fn content_end(bytes: &[u8]) -> Option<usize> {
    bytes
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map(|p| p + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_nonexistent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");
        assert!(read_text(&path).unwrap().is_none());
        assert!(read_last_line(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        write_lines_atomic(&path, lines(&["a", "b"])).unwrap();
        assert_eq!(read_text(&path).unwrap().unwrap(), "a\nb\n");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        write_lines_atomic(&path, lines(&["a"])).unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("log.txt");

        write_lines_atomic(&path, lines(&["a"])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_keeps_old_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");
        fs::write(&path, "old\n").unwrap();

        let result = write_atomic_with(&path, |writer| {
            writeln!(writer, "partial")?;
            Err(TrackerError::Export("interrupted".into()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\n");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_append_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        append_lines(&path, lines(&["a"])).unwrap();
        append_lines(&path, lines(&["b", "c"])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_append_repairs_missing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");
        fs::write(&path, "a").unwrap();

        append_lines(&path, lines(&["b"])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_read_last_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        fs::write(&path, "first\nsecond\r\n\n").unwrap();
        assert_eq!(read_last_line(&path).unwrap().as_deref(), Some("second"));

        fs::write(&path, "only").unwrap();
        assert_eq!(read_last_line(&path).unwrap().as_deref(), Some("only"));

        fs::write(&path, "").unwrap();
        assert!(read_last_line(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_last_line_across_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        let long = "x".repeat(TAIL_CHUNK as usize * 2 + 17);
        fs::write(&path, format!("head\n{}\n", long)).unwrap();
        assert_eq!(read_last_line(&path).unwrap(), Some(long));
    }
}
