//! Operator output mirrored to the execution log

use chrono::{SecondsFormat, Utc};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Terminal writer that copies every line to the log file
///
/// The file is opened in append mode and closed when the console is dropped.
pub struct Console {
    file: Option<Mutex<File>>,
    path: Option<PathBuf>,
    echo: bool,
}

impl Console {
    /// Open (or create) the log file
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Mutex::new(file)),
            path: Some(path.to_path_buf()),
            echo: true,
        })
    }

    /// Console without a log file
    pub fn terminal_only() -> Self {
        Self {
            file: None,
            path: None,
            echo: true,
        }
    }

    /// Stop echoing to the terminal; the log file still receives every line
    pub fn silent(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Line on stdout
    pub fn out(&self, line: &str) {
        if self.echo {
            println!("{line}");
        }
        self.write_file(line);
    }

    /// Line on stderr
    pub fn err(&self, line: &str) {
        if self.echo {
            eprintln!("{line}");
        }
        self.write_file(line);
    }

    /// `Warning: <message>` on stderr
    pub fn warn(&self, message: &str) {
        self.err_labeled("Warning", "33", message);
    }

    /// `<label>: <message>` on stderr, label colored on the terminal only
    pub fn err_labeled(&self, label: &str, ansi_color: &str, message: &str) {
        if self.echo {
            if crate::output::use_color() {
                eprintln!("\x1b[{ansi_color}m{label}:\x1b[0m {message}");
            } else {
                eprintln!("{label}: {message}");
            }
        }
        self.write_file(&format!("{label}: {message}"));
    }

    /// `START: <raw invocation>`
    pub fn start(&self, raw_command: &str) {
        self.marker(&format!("START: {raw_command}"));
    }

    /// `ERROR: <message>`
    pub fn error(&self, message: &str) {
        self.marker(&format!("ERROR: {message}"));
    }

    /// `END: status=<status> dur=<duration>`, then a blank separator line
    pub fn end(&self, status: &str, duration: &str) {
        self.marker(&format!("END: status={status} dur={duration}"));
        self.write_file("");
    }

    fn marker(&self, text: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.write_file(&format!("[{timestamp}] {text}"));
    }

    fn write_file(&self, line: &str) {
        let Some(file) = &self.file else {
            return;
        };
        if let Ok(mut file) = file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_markers_and_lines_reach_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kc.log");

        {
            let console = Console::open(&path).unwrap().silent();
            console.start("./kc roles list");
            console.out("Roles in realm \"demo\":");
            console.error("boom");
            console.end("error", "0.010s");
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] START: ./kc roles list"));
        assert_eq!(lines[1], "Roles in realm \"demo\":");
        assert!(lines[2].ends_with("] ERROR: boom"));
        assert!(lines[3].ends_with("] END: status=error dur=0.010s"));
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_appends_across_invocations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kc.log");

        Console::open(&path).unwrap().silent().start("./kc realms list");
        Console::open(&path).unwrap().silent().start("./kc roles list");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("START:").count(), 2);
    }

    #[test]
    fn test_terminal_only_has_no_path() {
        let console = Console::terminal_only().silent();
        console.out("nothing to write");
        assert!(console.path().is_none());
    }
}
