use crate::error::SubtitleError;
use crate::line::{checked_time, LineId, SubtitleLine};
use crate::parser::Parser;
use crate::serialiser;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Outcome of a successful `SubtitleStore::load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Bracketed lines whose time could not be parsed.
    pub skipped: usize,
    pub ignored: usize,
}

/// The subtitle lines of an editing session, in insertion order.
#[derive(Debug, Default)]
pub struct SubtitleStore {
    lines: Vec<SubtitleLine>,
    next_id: u64,
}

impl SubtitleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line. Lines are not kept sorted by time. A NaN or infinite
    /// time cannot be saved and is stored as `0`.
    pub fn add<S: Into<String>>(&mut self, time: f64, text: S) -> LineId {
        let time = checked_time(time).unwrap_or_else(|| {
            log::warn!("Invalid subtitle time {}, using 0", time);
            0.0
        });
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push(SubtitleLine {
            id,
            time,
            text: text.into(),
        });
        id
    }

    /// Replaces the time and text of a line in place. Returns `false`, and
    /// leaves the store as is, when the handle no longer refers to a line or
    /// the time is NaN or infinite.
    pub fn update<S: Into<String>>(&mut self, id: LineId, time: f64, text: S) -> bool {
        let time = match checked_time(time) {
            Some(time) => time,
            None => {
                log::warn!("Invalid subtitle time {} for {}", time, id);
                return false;
            }
        };
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.time = time;
                line.text = text.into();
                true
            }
            None => {
                log::warn!("Subtitle line not found for update: {}", id);
                false
            }
        }
    }

    pub fn remove(&mut self, id: LineId) -> bool {
        match self.lines.iter().position(|l| l.id == id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Text of the line active at `time`: the one with the greatest start time
    /// not after `time`, the last of them in store order if several share it.
    /// Gives the same answer as a front-to-back scan over a time-sorted list,
    /// whatever order the lines were added in. Empty if no line has started.
    pub fn active_line_at(&self, time: f64) -> &str {
        let mut active: Option<&SubtitleLine> = None;
        for line in &self.lines {
            if line.time <= time && active.map_or(true, |a| line.time >= a.time) {
                active = Some(line);
            }
        }
        active.map_or("", |l| l.text.as_str())
    }

    /// Replaces the contents of the store with the lines of a subtitles file.
    /// The store is untouched if the file cannot be read.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport, SubtitleError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(SubtitleError::FileNotFound(path.to_path_buf()));
        }

        let data = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SubtitleError::FileNotFound(path.to_path_buf()),
            _ => SubtitleError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let parsed = Parser::new().parse(&data);
        self.clear();
        for (time, text) in parsed.entries {
            self.add(time, text);
        }

        let report = LoadReport {
            loaded: self.lines.len(),
            skipped: parsed.skipped,
            ignored: parsed.ignored,
        };
        log::info!(
            "Loaded {} subtitles from '{}' ({} skipped)",
            report.loaded,
            path.display(),
            report.skipped
        );
        Ok(report)
    }

    /// Writes every line, in store order, as `[T]text`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        serialiser::serialise(&self.lines, path)
    }

    /// Stable sort by start time.
    pub fn sort_by_time(&mut self) {
        self.lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn get(&self, id: LineId) -> Option<&SubtitleLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Handle of the line at a zero-based position.
    pub fn id_at(&self, row: usize) -> Option<LineId> {
        self.lines.get(row).map(|l| l.id)
    }

    pub fn lines(&self) -> &[SubtitleLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
