use subcue::clock::{PlaybackClock, SimulatedClock, Transport};
use subcue::controller::{EditorController, EditorView, RowEvent, ViewUpdate};
use subcue::line::LineId;
use subcue::serialiser::format_time;
use subcue::store::SubtitleStore;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use regex::Regex;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Author timed subtitle lines against an audio track")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every subtitle line with its row number.
    List {
        file: PathBuf,
        #[arg(
            short,
            long,
            value_name = "REGEX",
            help = "Only print lines whose text matches the given regular expression."
        )]
        matching: Option<String>,
    },
    /// Print the line shown at the given playback time.
    At { file: PathBuf, time: f64 },
    /// Add a line at the given time and save. The file is created if needed.
    Add {
        file: PathBuf,
        #[arg(short, long, value_name = "SECONDS", help = "Start time of the new line.")]
        at: f64,
        #[arg(short, long, help = "Text of the new line. Defaults to \"New Subtitle\".")]
        text: Option<String>,
    },
    /// Change the time and/or text of a row and save.
    Edit {
        file: PathBuf,
        row: usize,
        #[arg(long, value_name = "SECONDS")]
        time: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Remove a row and save.
    Remove { file: PathBuf, row: usize },
    /// Order the lines by start time and save.
    Sort { file: PathBuf },
    /// Simulate playback, printing the active line whenever it changes.
    Play {
        file: PathBuf,
        #[arg(short, long, value_name = "SECONDS", help = "Length of the audio clip.")]
        duration: f64,
        #[arg(short, long, value_name = "SECONDS", default_value_t = 0.1)]
        step: f64,
        #[arg(short, long, value_name = "SECONDS", default_value_t = 0.0)]
        from: f64,
    },
}

/// Prints the active line as it changes during playback. Row updates are not
/// shown; the file on disk is the list.
#[derive(Default)]
struct TerminalView {
    shown: Option<String>,
    pending: Option<String>,
}

impl EditorView for TerminalView {
    fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::ActiveText(text) => {
                if self.shown.as_ref() != Some(&text) {
                    self.pending = Some(text);
                }
            }
            ViewUpdate::Elapsed(elapsed) => {
                if let Some(text) = self.pending.take() {
                    println!("{:>10}  {}", elapsed, text);
                    self.shown = Some(text);
                }
            }
            ViewUpdate::Duration(duration) => println!("Duration: {}", duration),
            _ => (),
        }
    }
}

type Session = EditorController<SimulatedClock, TerminalView>;

fn open(file: PathBuf, clock: SimulatedClock) -> Result<Session> {
    let mut session = EditorController::new(SubtitleStore::new(), clock, TerminalView::default());
    session
        .select_subtitle_file(Some(file.clone()))
        .context(format!("Failed to open subtitles file: '{}'", file.display()))?;
    Ok(session)
}

fn row_id(session: &Session, row: usize) -> Result<LineId> {
    row.checked_sub(1)
        .and_then(|index| session.store().id_at(index))
        .ok_or_else(|| anyhow!("There is no subtitle at row {}.", row))
}

fn save(session: &mut Session) -> Result<()> {
    let path = session
        .subtitle_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    session
        .save()
        .context(format!("Failed to save subtitles file: '{}'", path))
}

/// Playback only ends if the clip has a finite length and time moves forward.
fn check_playback(duration: f64, step: f64) -> Result<()> {
    if !duration.is_finite() {
        bail!("The clip duration must be a finite number of seconds.");
    }
    if !(step > 0.0 && step.is_finite()) {
        bail!("The playback step must be a positive number of seconds.");
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List { file, matching } => {
            let filter = matching
                .map(|p| Regex::new(&p).context("Invalid regex."))
                .transpose()?;
            let session = open(file, SimulatedClock::new())?;
            for (index, line) in session.store().lines().iter().enumerate() {
                if filter.as_ref().map_or(true, |r| r.is_match(line.text())) {
                    println!("{:>4}  [{}]{}", index + 1, format_time(line.time()), line.text());
                }
            }
        }
        Command::At { file, time } => {
            let session = open(file, SimulatedClock::new())?;
            println!("{}", session.store().active_line_at(time));
        }
        Command::Add { file, at, text } => {
            // New lines are placed at a playback position, which cannot be negative.
            if !at.is_finite() || at < 0.0 {
                bail!("The time of a new subtitle must be a non-negative number of seconds.");
            }
            if !file.exists() {
                log::info!("Starting new subtitles file '{}'", file.display());
                std::fs::write(&file, "")
                    .context(format!("Failed to create subtitles file: '{}'", file.display()))?;
            }
            let mut clock = SimulatedClock::with_clip(at);
            clock.seek(at);
            let mut session = open(file, clock)?;
            let id = session.add_line();
            if let Some(text) = text {
                session.handle_row(RowEvent::TextCommitted(id, text))?;
            }
            save(&mut session)?;
        }
        Command::Edit {
            file,
            row,
            time,
            text,
        } => {
            let mut session = open(file, SimulatedClock::new())?;
            let id = row_id(&session, row)?;
            if let Some(text) = text {
                session.handle_row(RowEvent::TextCommitted(id, text))?;
            }
            if let Some(time) = time {
                // Rejected input leaves the time as it was.
                if let Err(err) = session.handle_row(RowEvent::TimeCommitted(id, time)) {
                    eprintln!("Warning: {}", err);
                }
            }
            save(&mut session)?;
        }
        Command::Remove { file, row } => {
            let mut session = open(file, SimulatedClock::new())?;
            let id = row_id(&session, row)?;
            session.handle_row(RowEvent::Remove(id))?;
            save(&mut session)?;
        }
        Command::Sort { file } => {
            let mut session = open(file, SimulatedClock::new())?;
            session.sort_by_time();
            save(&mut session)?;
        }
        Command::Play {
            file,
            duration,
            step,
            from,
        } => {
            check_playback(duration, step)?;
            let mut session = open(file, SimulatedClock::new())?;
            session.audio_loaded(Ok(duration));
            if duration > 0.0 {
                session.seek_normalized(from / duration);
            }
            session.play();
            while session.clock().is_playing() {
                session.tick();
                session.clock_mut().advance(step);
            }
        }
    }

    Ok(())
}
