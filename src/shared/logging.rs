use std::fs;
use std::io::Write;
use std::path::Path;

/// Appends one line to the session log, creating parent directories on
/// first use. The log is plain text, one event per line.
pub fn append_session_log_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")
}
