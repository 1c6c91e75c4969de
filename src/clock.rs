/// Read side of the audio playback engine.
pub trait PlaybackClock {
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    /// Length of the loaded clip in seconds, `None` when no clip is loaded.
    fn duration(&self) -> Option<f64>;
    fn is_playing(&self) -> bool;
}

/// Playback controls. Without a loaded clip every control is a no-op.
pub trait Transport: PlaybackClock {
    fn set_clip(&mut self, duration: f64);
    fn play(&mut self);
    fn pause(&mut self);
    /// Stops playback and rewinds to the start.
    fn stop(&mut self);
    fn seek(&mut self, position: f64);
}

/// A clock that only moves when told to. Stands in for a real audio engine.
#[derive(Debug, Default, Clone)]
pub struct SimulatedClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(duration: f64) -> Self {
        let mut clock = Self::new();
        clock.set_clip(duration);
        clock
    }

    /// Moves time forward while playing. Playback ends at the end of the clip.
    pub fn advance(&mut self, seconds: f64) {
        if !self.playing {
            return;
        }
        if let Some(duration) = self.duration {
            self.position += seconds;
            if self.position >= duration {
                self.position = duration;
                self.playing = false;
            }
        }
    }
}

impl PlaybackClock for SimulatedClock {
    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Transport for SimulatedClock {
    fn set_clip(&mut self, duration: f64) {
        self.duration = Some(duration.max(0.0));
        self.position = 0.0;
        self.playing = false;
    }

    fn play(&mut self) {
        if self.duration.is_some() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
    }

    fn seek(&mut self, position: f64) {
        if let Some(duration) = self.duration {
            self.position = position.max(0.0).min(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_inert_without_clip() {
        let mut clock = SimulatedClock::new();

        clock.play();
        clock.seek(3.0);
        clock.advance(1.0);

        assert!(!clock.is_playing());
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn playback_stops_at_end_of_clip() {
        let mut clock = SimulatedClock::with_clip(2.0);

        clock.play();
        clock.advance(1.5);
        assert_eq!(clock.position(), 1.5);
        clock.advance(1.5);

        assert!(!clock.is_playing());
        assert_eq!(clock.position(), 2.0);
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = SimulatedClock::with_clip(10.0);
        clock.play();
        clock.advance(1.0);
        clock.pause();
        clock.advance(1.0);

        assert_eq!(clock.position(), 1.0);
    }

    #[test]
    fn stop_rewinds() {
        let mut clock = SimulatedClock::with_clip(10.0);
        clock.play();
        clock.advance(4.0);

        clock.stop();

        assert!(!clock.is_playing());
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn seek_is_clamped() {
        let mut clock = SimulatedClock::with_clip(10.0);

        clock.seek(12.0);
        assert_eq!(clock.position(), 10.0);
        clock.seek(-1.0);
        assert_eq!(clock.position(), 0.0);
    }
}
