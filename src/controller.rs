use crate::clock::Transport;
use crate::error::SubtitleError;
use crate::line::{LineId, SubtitleLine};
use crate::parser::parse_time;
use crate::serialiser::{format_elapsed, format_time};
use crate::store::{LoadReport, SubtitleStore};

use std::path::{Path, PathBuf};

/// Text given to lines created with the add button.
pub const DEFAULT_TEXT: &str = "New Subtitle";

/// Something the view should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    ActiveText(String),
    Elapsed(String),
    /// Playback position as a fraction of the clip, for the time slider.
    Progress(f64),
    Duration(String),
    RowsCleared,
    RowAdded {
        id: LineId,
        time: String,
        text: String,
    },
    RowTime {
        id: LineId,
        time: String,
    },
    RowRemoved(LineId),
    Warning(String),
}

pub trait EditorView {
    fn apply(&mut self, update: ViewUpdate);
}

impl EditorView for Vec<ViewUpdate> {
    fn apply(&mut self, update: ViewUpdate) {
        self.push(update);
    }
}

/// Edits committed on a single row of the subtitle list.
#[derive(Debug, Clone, PartialEq)]
pub enum RowEvent {
    SetTimeFromPlayback(LineId),
    TextCommitted(LineId, String),
    /// Raw contents of the time field.
    TimeCommitted(LineId, String),
    Remove(LineId),
}

pub struct EditorController<C, V> {
    store: SubtitleStore,
    clock: C,
    view: V,
    subtitle_path: Option<PathBuf>,
}

impl<C: Transport, V: EditorView> EditorController<C, V> {
    pub fn new(store: SubtitleStore, clock: C, view: V) -> Self {
        let mut controller = Self {
            store,
            clock,
            view,
            subtitle_path: None,
        };
        controller.refresh_rows();
        controller
    }

    pub fn store(&self) -> &SubtitleStore {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn subtitle_path(&self) -> Option<&Path> {
        self.subtitle_path.as_deref()
    }

    /// Called once per frame. Does nothing unless audio is playing.
    pub fn tick(&mut self) {
        if !self.clock.is_playing() {
            return;
        }
        let position = self.clock.position();
        let text = self.store.active_line_at(position).to_string();

        self.view.apply(ViewUpdate::ActiveText(text));
        self.view.apply(ViewUpdate::Elapsed(format_elapsed(position)));
        if let Some(duration) = self.clock.duration().filter(|d| *d > 0.0) {
            self.view.apply(ViewUpdate::Progress(position / duration));
        }
    }

    pub fn handle_row(&mut self, event: RowEvent) -> Result<(), SubtitleError> {
        match event {
            RowEvent::SetTimeFromPlayback(id) => {
                let text = self.line(id)?.text.clone();
                let time = self.clock.position();
                self.store.update(id, time, text);
                self.view.apply(ViewUpdate::RowTime {
                    id,
                    time: format_time(time),
                });
            }
            RowEvent::TextCommitted(id, text) => {
                let time = self.line(id)?.time;
                self.store.update(id, time, text);
            }
            RowEvent::TimeCommitted(id, input) => {
                let line = self.line(id)?;
                let (current_time, text) = (line.time, line.text.clone());
                match parse_time(&input) {
                    Some(time) => {
                        self.store.update(id, time, text);
                        self.view.apply(ViewUpdate::RowTime {
                            id,
                            time: format_time(time),
                        });
                    }
                    None => {
                        let err = SubtitleError::InvalidTimeInput(input);
                        log::warn!("{}", err);
                        self.view.apply(ViewUpdate::Warning(err.to_string()));
                        self.view.apply(ViewUpdate::RowTime {
                            id,
                            time: format_time(current_time),
                        });
                        return Err(err);
                    }
                }
            }
            RowEvent::Remove(id) => {
                self.store.remove(id);
                self.view.apply(ViewUpdate::RowRemoved(id));
            }
        }
        Ok(())
    }

    /// Adds a line at the current playback position.
    pub fn add_line(&mut self) -> LineId {
        let time = self.clock.position();
        let id = self.store.add(time, DEFAULT_TEXT);
        self.view.apply(ViewUpdate::RowAdded {
            id,
            time: format_time(time),
            text: DEFAULT_TEXT.to_string(),
        });
        id
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Moves playback to a slider position in `[0, 1]`.
    pub fn seek_normalized(&mut self, position: f64) {
        if let Some(duration) = self.clock.duration() {
            self.clock.seek(position.clamp(0.0, 1.0) * duration);
        }
    }

    /// Completion of an audio file load, with the clip length on success.
    pub fn audio_loaded(&mut self, result: Result<f64, String>) {
        match result {
            Ok(duration) => {
                self.clock.set_clip(duration);
                self.view.apply(ViewUpdate::Duration(format_elapsed(duration)));
            }
            Err(err) => log::error!("Error loading audio: {}", err),
        }
    }

    /// Result of the subtitle file picker. `None` or an empty path means the
    /// picker was cancelled.
    pub fn select_subtitle_file(
        &mut self,
        path: Option<PathBuf>,
    ) -> Result<Option<LoadReport>, SubtitleError> {
        let path = match path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path,
            None => return Ok(None),
        };

        let result = self.store.load(&path);
        self.subtitle_path = Some(path);
        match result {
            Ok(report) => {
                self.refresh_rows();
                Ok(Some(report))
            }
            Err(err) => {
                log::error!("{}", err);
                Err(err)
            }
        }
    }

    /// Writes the store to the file last chosen with `select_subtitle_file`.
    pub fn save(&mut self) -> Result<(), SubtitleError> {
        let result = match &self.subtitle_path {
            Some(path) => self.store.save(path),
            None => Err(SubtitleError::InvalidPath),
        };
        if let Err(err) = &result {
            log::error!("{}", err);
        }
        result
    }

    pub fn sort_by_time(&mut self) {
        self.store.sort_by_time();
        self.refresh_rows();
    }

    fn line(&self, id: LineId) -> Result<&SubtitleLine, SubtitleError> {
        self.store.get(id).ok_or_else(|| {
            log::warn!("Subtitle line not found: {}", id);
            SubtitleError::UnknownLine(id)
        })
    }

    fn refresh_rows(&mut self) {
        self.view.apply(ViewUpdate::RowsCleared);
        for line in self.store.lines() {
            self.view.apply(ViewUpdate::RowAdded {
                id: line.id,
                time: format_time(line.time),
                text: line.text.clone(),
            });
        }
    }
}
