use crate::error::FanError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata persisted from a previous run to seed the next run's estimates
///
/// A zero `duration_secs` means no duration estimate is available, a zero
/// `target_lines` means no line-count estimate is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunRecord {
    pub duration_secs: u64,
    pub target_lines: u64,
}

/// Map a command line to a token that is safe to use as a file name
///
/// Characters in `' '..='.'` and `'0'..='~'` are kept, everything else
/// (including `/` and control characters) becomes `_`.
pub fn safe_file_name(command: &str) -> String {
    command
        .chars()
        .map(|c| match c {
            ' '..='.' | '0'..='~' => c,
            _ => '_',
        })
        .collect()
}

/// Path of the record kept for `command` under `record_dir`
pub fn record_path_for_command(record_dir: &Path, command: &str) -> PathBuf {
    record_dir.join(safe_file_name(command))
}

/// Create the record directory (and parents) if it does not exist yet
pub fn ensure_record_dir(record_dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(record_dir)
}

/// Parse record text made of whitespace separated `key=value` tokens
///
/// Unknown keys and tokens without exactly one `=` are ignored. A value that
/// is not a non-negative integer resets its key to 0.
pub fn parse_record(content: &str) -> RunRecord {
    let mut record = RunRecord::default();

    for token in content.split_whitespace() {
        let parts: Vec<&str> = token.split('=').collect();
        let [key, value] = parts.as_slice() else {
            continue;
        };
        match *key {
            "duration" => record.duration_secs = value.parse().unwrap_or(0),
            "target" => record.target_lines = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    record
}

/// Render a record in its on-disk form
pub fn format_record(record: &RunRecord) -> String {
    format!(
        "duration={}\ntarget={}\n",
        record.duration_secs, record.target_lines
    )
}

/// Load the record at `path`
///
/// A missing or unreadable file yields an empty record; read errors are
/// never surfaced.
pub fn load_record(path: &Path) -> RunRecord {
    match fs::read_to_string(path) {
        Ok(content) => {
            let record = parse_record(&content);
            debug!("Loaded run record {}: {:?}", path.display(), record);
            record
        }
        Err(e) => {
            debug!("No usable run record at {}: {}", path.display(), e);
            RunRecord::default()
        }
    }
}

/// Write `record` to `path`, replacing any previous content
pub fn save_record(path: &Path, record: &RunRecord) -> Result<(), FanError> {
    let wrap = |source| FanError::RecordWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path).map_err(wrap)?;
    file.write_all(format_record(record).as_bytes())
        .map_err(wrap)?;

    debug!("Saved run record {}: {:?}", path.display(), record);
    Ok(())
}

/// Whether a finished run should (re)write the record at `path`
pub fn should_save(path: &Path, overwrite: bool) -> bool {
    overwrite || !path.exists()
}
