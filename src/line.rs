use std::fmt;

/// Handle to a line owned by a `SubtitleStore`. Issued once, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub(crate) u64);

impl fmt::Display for LineId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "line#{}", self.0)
    }
}

/// A time a line can hold: any finite number of seconds. Negative times
/// (pre-roll) are allowed. `-0` becomes `0` so it is written back as `0.000`.
pub fn checked_time(time: f64) -> Option<f64> {
    if time.is_finite() {
        Some(time + 0.0)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleLine {
    pub(crate) id: LineId,
    /// Seconds from the start of the track at which this line becomes active.
    /// Always finite.
    pub(crate) time: f64,
    pub(crate) text: String,
}

impl SubtitleLine {
    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
