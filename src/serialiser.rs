use crate::error::SubtitleError;
use crate::line::SubtitleLine;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn serialise<P: AsRef<Path>>(lines: &[SubtitleLine], output: P) -> Result<(), SubtitleError> {
    let path = output.as_ref();
    if path.as_os_str().is_empty() {
        return Err(SubtitleError::InvalidPath);
    }
    let io_err = |source: io::Error| SubtitleError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, lines).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

fn write_lines<W: Write>(buf: &mut W, lines: &[SubtitleLine]) -> io::Result<()> {
    for line in lines {
        write_line(buf, line)?;
    }
    Ok(())
}

fn write_line<W: Write>(buf: &mut W, line: &SubtitleLine) -> io::Result<()> {
    let text = if line.text.contains(|c: char| c == '\n' || c == '\r') {
        log::warn!(
            "Line breaks in subtitle at {} cannot be stored, writing them as spaces",
            format_time(line.time)
        );
        line.text.replace("\r\n", " ").replace(|c: char| c == '\n' || c == '\r', " ")
    } else {
        line.text.clone()
    };
    writeln!(buf, "[{}]{}", format_time(line.time), text)
}

/// Seconds with exactly three decimals, `.` as separator.
pub fn format_time(time: f64) -> String {
    format!("{:.3}", time)
}

/// Seconds rounded to milliseconds, without trailing zeros: `12.5`, `3`.
pub fn format_elapsed(time: f64) -> String {
    let rounded = (time * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}
