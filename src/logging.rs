//! Conversation transcript and diagnostics persistence layer.
//!
//! Provides file-based logging of the chat session without blocking the
//! UI thread. Logs are stored in XDG_DATA_HOME/chatbubble/logs/ as one
//! file per day: logs/YYYY-MM-DD.log

use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread;

/// A transcript line to be written to disk
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub timestamp: String,
    pub sender: String,
    pub text: String,
}

/// Logger manages file-based transcript logging without blocking the UI
/// thread
pub struct Logger {
    /// Channel to send entries to the background thread
    tx: Sender<TranscriptEntry>,
}

impl Logger {
    /// Create a new logger and spawn background thread for async I/O
    pub fn new() -> Result<Self, String> {
        let log_dir = get_log_directory()?;

        fs::create_dir_all(&log_dir)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;

        let (tx, rx) = unbounded::<TranscriptEntry>();

        thread::spawn(move || {
            run_logger_thread(rx, log_dir);
        });

        Ok(Self { tx })
    }

    /// Log an entry (non-blocking, queued for background writing)
    pub fn log(&self, entry: TranscriptEntry) {
        // If send fails, the logger thread has stopped - silently ignore
        let _ = self.tx.send(entry);
    }
}

/// Background thread that handles all file I/O
fn run_logger_thread(rx: Receiver<TranscriptEntry>, log_dir: PathBuf) {
    // Cache of open file handles, keyed by date
    let mut file_cache: HashMap<String, BufWriter<File>> = HashMap::new();

    while let Ok(entry) = rx.recv() {
        if let Err(e) = write_entry(&mut file_cache, &log_dir, &entry) {
            eprintln!("Logger error: {}", e);
        }
    }

    for (_, mut writer) in file_cache.drain() {
        let _ = writer.flush();
    }
}

/// Write a single entry to today's transcript file
fn write_entry(
    file_cache: &mut HashMap<String, BufWriter<File>>,
    log_dir: &std::path::Path,
    entry: &TranscriptEntry,
) -> Result<(), String> {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let log_file_path = log_dir.join(format!("{}.log", date));

    if !file_cache.contains_key(&date) {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)
            .map_err(|e| format!("Failed to open log file: {}", e))?;
        file_cache.insert(date.clone(), BufWriter::new(file));
    }
    let writer = file_cache
        .get_mut(&date)
        .ok_or_else(|| "Log file handle missing after insert".to_string())?;

    writeln!(writer, "{}", format_line(entry))
        .map_err(|e| format!("Failed to write log entry: {}", e))?;

    writer
        .flush()
        .map_err(|e| format!("Failed to flush log: {}", e))?;

    Ok(())
}

/// Format: [HH:MM:SS] <sender> text (embedded newlines indented so a
/// multi-line message stays one visual entry)
pub fn format_line(entry: &TranscriptEntry) -> String {
    let text = entry.text.replace('\n', "\n    ");
    format!("[{}] <{}> {}", entry.timestamp, entry.sender, text)
}

/// Get the platform-specific log directory using XDG conventions
fn get_log_directory() -> Result<PathBuf, String> {
    let base = directories::BaseDirs::new().ok_or("Failed to determine home directory")?;
    Ok(base.data_dir().join("chatbubble").join("logs"))
}
