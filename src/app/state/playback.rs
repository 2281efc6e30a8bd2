use crate::player::Player;

/// Playback model plus the `running` flag that gates most of the UI: an item
/// is "running" from a successful Run until Stop, whether or not it carries
/// audio.
pub struct PlaybackState {
    pub(in crate::app) player: Player,
    pub(in crate::app) running: bool,
    /// Bumped on every run and stop; delayed audio starts carrying an older
    /// token are ignored.
    pub(in crate::app) run_token: u64,
}

impl PlaybackState {
    pub(in crate::app) fn new() -> Self {
        Self {
            player: Player::new(),
            running: false,
            run_token: 0,
        }
    }
}
