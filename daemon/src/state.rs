use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ddc::{DisplayControl, DisplaySetting, HardwareError};

/// The two operating profiles the daemon switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Desktop,
    Game,
}

/// What a completed cycle changed, for logging and the status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EnteredGame,
    ExitedGame,
}

/// The configured profile pair, resolved once from the config at startup.
#[derive(Debug, Clone, Copy)]
pub struct Profiles {
    pub game: DisplaySetting,
    pub desktop: DisplaySetting,
}

/// Owns the current [`Mode`] and the setting saved on Game entry.
///
/// Invariant: `saved` is `Some` exactly while `mode == Game`. The daemon
/// always starts Desktop-assumed; nothing is persisted across restarts, and
/// the first poll reconciles the real world against that assumption.
#[derive(Debug)]
pub struct ModeState {
    mode: Mode,
    saved: Option<DisplaySetting>,
}

impl ModeState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Desktop,
            saved: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn saved(&self) -> Option<DisplaySetting> {
        self.saved
    }

    /// Feeds one detection result through the state machine, performing at
    /// most one hardware write attempt per cycle.
    ///
    /// - Desktop + detected: capture the monitor's current setting (falling
    ///   back to the desktop profile when the read fails), then apply the
    ///   game profile. The transition is only recorded after a successful
    ///   apply; on failure the state stays Desktop and the still-true
    ///   detection result retries the whole entry on the next cycle.
    /// - Game + not detected: apply the saved setting; discard it and return
    ///   to Desktop only on success.
    /// - Anything else: no-op. In particular, repeated detections while
    ///   already in Game mode never issue additional writes.
    ///
    /// There is no retry counter or backoff: the poll interval itself
    /// throttles re-attempts.
    pub fn observe(
        &mut self,
        detected: bool,
        profiles: &Profiles,
        hw: &mut dyn DisplayControl,
    ) -> Result<Option<Transition>, HardwareError> {
        match (self.mode, detected) {
            (Mode::Desktop, true) => {
                // Capture whatever the panel actually shows right now; the
                // user may have adjusted it away from the desktop profile.
                let saved = match hw.read() {
                    Ok(current) => current,
                    Err(e) => {
                        warn!("could not read current monitor settings ({e}); will restore the desktop profile instead");
                        profiles.desktop
                    }
                };
                hw.apply(profiles.game)?;
                self.saved = Some(saved);
                self.mode = Mode::Game;
                Ok(Some(Transition::EnteredGame))
            }
            (Mode::Game, false) => {
                let target = self.saved.unwrap_or(profiles.desktop);
                hw.apply(target)?;
                self.saved = None;
                self.mode = Mode::Desktop;
                Ok(Some(Transition::ExitedGame))
            }
            _ => Ok(None),
        }
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new()
    }
}
