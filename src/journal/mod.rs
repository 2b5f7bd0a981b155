//! # AppendLog: append-only timestamped text sink.
//!
//! All cooperating processes — leader, followers, and short-lived workers —
//! append records to one shared text file. A record is a single line:
//!
//! ```text
//! [2026-08-23 14:03:07.412] PID=12345 Copy1 start
//! ```
//!
//! ## Synchronization
//! Within one process, a local mutex fully serializes appends so lines never
//! interleave mid-line. Across processes, no lock is taken: each record is
//! written with a single `write` to an `O_APPEND` descriptor, and the platform
//! guarantees such short appends are not torn. Concurrent processes may
//! interleave at line granularity, but a line itself stays intact.
//!
//! The file grows without bound; rotation belongs to an external collaborator.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only journal shared by every cooperating process.
pub struct AppendLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AppendLog {
    /// Creates a journal handle for the given path.
    ///
    /// The file is created lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record: timestamp + this process's PID + `msg`.
    pub fn append(&self, msg: &str) -> io::Result<()> {
        self.append_raw(&format_record(msg))
    }

    /// Appends a pre-formatted line verbatim (a terminator is added).
    pub fn append_raw(&self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // A poisoned mutex still serializes; the data it guards is just the
        // write order, which a panicked appender cannot corrupt.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per line keeps the O_APPEND no-tearing guarantee.
        file.write_all(buf.as_bytes())
    }
}

/// Formats one record for the current process: `[<ts>] PID=<pid> <msg>`.
pub fn format_record(msg: &str) -> String {
    format!(
        "[{}] PID={} {}",
        timestamp_millis(),
        std::process::id(),
        msg
    )
}

/// Current local time with millisecond precision, `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn timestamp_millis() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Asserts `line` matches `[YYYY-MM-DD HH:MM:SS.mmm] PID=<digits> <msg>`.
    fn assert_record_format(line: &str) {
        let rest = line.strip_prefix('[').expect("leading bracket");
        let (stamp, rest) = rest.split_once("] ").expect("closing bracket");
        assert_eq!(stamp.len(), "2026-08-23 14:03:07.412".len(), "{stamp}");
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[19..20], ".");

        let rest = rest.strip_prefix("PID=").expect("PID field");
        let (pid, msg) = rest.split_once(' ').expect("message after PID");
        assert!(pid.chars().all(|c| c.is_ascii_digit()), "{pid}");
        assert!(!msg.is_empty());
    }

    #[test]
    fn record_format_is_stable() {
        let record = format_record("Program start");
        assert_record_format(&record);
        assert!(record.ends_with("Program start"));
        assert!(record.contains(&format!("PID={}", std::process::id())));
    }

    #[test]
    fn append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = AppendLog::new(dir.path().join("log.txt"));

        log.append("first").expect("append");
        log.append("second").expect("append");

        let content = std::fs::read_to_string(log.path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn concurrent_appends_never_tear_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = Arc::new(AppendLog::new(dir.path().join("log.txt")));
        let writers = 8;
        let per_writer = 50;

        let handles: Vec<_> = (0..writers)
            .map(|w| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..per_writer {
                        log.append(&format!("writer={w} line={i}")).expect("append");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        let content = std::fs::read_to_string(log.path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), writers * per_writer);
        for line in lines {
            assert_record_format(line);
        }
    }
}
