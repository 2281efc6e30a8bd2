//! Single-slot playback facade over the rodio mixer.
//!
//! One track at a time: starting a new one stops the previous. Position is
//! tracked by a pure clock (rodio sinks do not report elapsed time) so pause
//! gaps are excluded from the reported progress.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
}

/// Elapsed-play-time accounting. All methods take the current instant so the
/// arithmetic stays deterministic under test.
#[derive(Debug, Clone, Copy)]
struct PlaybackClock {
    started_at: Instant,
    accumulated: Duration,
    paused_at: Option<Instant>,
}

impl PlaybackClock {
    fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            accumulated: Duration::ZERO,
            paused_at: None,
        }
    }

    fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.accumulated += now.saturating_duration_since(self.started_at);
            self.paused_at = Some(now);
        }
    }

    fn resume(&mut self, now: Instant) {
        if self.paused_at.take().is_some() {
            self.started_at = now;
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        if self.paused_at.is_some() {
            self.accumulated
        } else {
            self.accumulated + now.saturating_duration_since(self.started_at)
        }
    }
}

struct Playback {
    _stream: OutputStream,
    sink: Sink,
    clock: PlaybackClock,
}

/// Facade over an audio output: play one file, toggle pause, report whole
/// seconds of position and length.
pub struct Player {
    playback: Option<Playback>,
    track_len: Option<u64>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            playback: None,
            track_len: None,
        }
    }

    /// Stop whatever is playing, then load and start the given track.
    pub fn play(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let reader = BufReader::new(
            File::open(path).with_context(|| format!("Opening audio file {}", path.display()))?,
        );
        let source = Decoder::new(reader)
            .with_context(|| format!("Decoding audio file {}", path.display()))?;
        let length = source.total_duration().map(whole_seconds);
        if length.is_none() {
            debug!(path = %path.display(), "Decoder reports no track length");
        }

        let (stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = Sink::try_new(&handle).context("Creating sink")?;
        sink.append(source);
        sink.play();

        info!(path = %path.display(), length_secs = ?length, "Started playback");
        self.playback = Some(Playback {
            _stream: stream,
            sink,
            clock: PlaybackClock::start(Instant::now()),
        });
        self.track_len = Some(length.unwrap_or(0));
        Ok(())
    }

    /// Toggle between pause and resume; no-op while idle.
    pub fn pause(&mut self) {
        let Some(playback) = &mut self.playback else {
            return;
        };
        let now = Instant::now();
        if playback.sink.is_paused() {
            debug!("Resuming playback");
            playback.sink.play();
            playback.clock.resume(now);
        } else {
            debug!("Pausing playback");
            playback.sink.pause();
            playback.clock.pause(now);
        }
    }

    /// Halt playback and clear the recorded length.
    pub fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.sink.stop();
            debug!("Stopped playback");
        }
        self.track_len = None;
    }

    /// Elapsed whole seconds, or `None` while idle.
    pub fn position(&self) -> Option<u64> {
        self.playback
            .as_ref()
            .map(|playback| whole_seconds(playback.clock.elapsed(Instant::now())))
    }

    /// Track length in whole seconds, or `None` while idle.
    pub fn length(&self) -> Option<u64> {
        self.track_len
    }

    pub fn is_paused(&self) -> bool {
        self.playback
            .as_ref()
            .map(|playback| playback.sink.is_paused())
            .unwrap_or(false)
    }

    /// The sink drained its queue: the track reached its natural end.
    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .map(|playback| playback.sink.empty())
            .unwrap_or(false)
    }

    pub fn state(&self) -> PlayerState {
        match &self.playback {
            None => PlayerState::Idle,
            Some(playback) if playback.sink.is_paused() => PlayerState::Paused,
            Some(_) => PlayerState::Playing,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate, never round: 2.9s is reported as 2.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_seconds_truncates() {
        assert_eq!(whole_seconds(Duration::from_millis(2900)), 2);
        assert_eq!(whole_seconds(Duration::from_millis(2000)), 2);
        assert_eq!(whole_seconds(Duration::from_millis(999)), 0);
    }

    #[test]
    fn clock_counts_only_play_time() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::start(t0);

        let t5 = t0 + Duration::from_secs(5);
        assert_eq!(clock.elapsed(t5), Duration::from_secs(5));

        clock.pause(t5);
        let t9 = t0 + Duration::from_secs(9);
        assert_eq!(clock.elapsed(t9), Duration::from_secs(5));

        clock.resume(t9);
        let t12 = t0 + Duration::from_secs(12);
        assert_eq!(clock.elapsed(t12), Duration::from_secs(8));
    }

    #[test]
    fn clock_ignores_duplicate_transitions() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::start(t0);
        let t3 = t0 + Duration::from_secs(3);

        clock.resume(t3);
        assert_eq!(clock.elapsed(t3), Duration::from_secs(3));

        clock.pause(t3);
        clock.pause(t0 + Duration::from_secs(7));
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(9)), Duration::from_secs(3));
    }
}
