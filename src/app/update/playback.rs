use super::super::state::App;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_audio_wait_elapsed(&mut self, path: String, token: u64) {
        if token != self.playback.run_token || !self.playback.running {
            debug!(token, "Dropping stale audio start");
            return;
        }
        let expanded = self.catalog.expand_path(&path);
        match self.playback.player.play(Path::new(&expanded)) {
            Ok(()) => {
                let length = self.playback.player.length().unwrap_or(0);
                self.console.push(format!("Playing ({length} s)"));
            }
            Err(err) => self.report_error("Cannot play audio", err),
        }
    }

    pub(super) fn handle_stop(&mut self) {
        if !self.playback.running {
            return;
        }
        self.playback.run_token = self.playback.run_token.wrapping_add(1);
        self.playback.player.stop();
        self.playback.running = false;
        self.viewer.close();
        self.console.push("Finished");
        info!("Stopped current item");
    }

    pub(super) fn handle_pause(&mut self) {
        if !self.playback.running {
            return;
        }
        self.playback.player.pause();
        self.console.push(if self.playback.player.is_paused() {
            "Paused.."
        } else {
            "Playing.."
        });
    }

    /// 1 Hz while an item runs: the view re-reads the player position, and a
    /// drained sink resets the progress state.
    pub(super) fn handle_tick(&mut self, _now: Instant) {
        if !self.playback.running {
            return;
        }
        if self.playback.player.is_finished() {
            self.playback.player.stop();
            self.console.push("Track finished");
        }
    }
}
