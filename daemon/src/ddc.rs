use std::sync::mpsc;
use std::time::Duration;

use ddc_hi::{Ddc, Display};
use thiserror::Error;

/// VCP feature code for luminance (brightness).
pub const VCP_BRIGHTNESS: u8 = 0x10;
/// VCP feature code for contrast.
pub const VCP_CONTRAST: u8 = 0x12;

/// Upper bound on a single DDC/CI operation. Some monitors stop answering
/// the I2C bus entirely (sleep, input switch); expiry is reported as
/// [`HardwareError::Unavailable`] so the cycle can end instead of stalling.
const HARDWARE_TIMEOUT: Duration = Duration::from_secs(3);

/// A brightness/contrast pair, both in the 0–100 range DDC/CI monitors use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySetting {
    pub brightness: u16,
    pub contrast: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("no DDC/CI-capable display responded")]
    Unavailable,
    #[error("failed to read a VCP feature: {0}")]
    ReadFailure(String),
    #[error("failed to write a VCP feature: {0}")]
    WriteFailure(String),
}

/// The seam between the mode state machine and the physical monitor.
/// Production code uses [`DdcDisplay`]; tests substitute a fake.
pub trait DisplayControl {
    /// Queries the display for its current brightness and contrast.
    /// All-or-nothing: a failure on either feature returns no partial result.
    fn read(&mut self) -> Result<DisplaySetting, HardwareError>;

    /// Writes brightness, then contrast. Not atomic: the brightness write can
    /// land while the contrast write fails, and callers must tolerate that
    /// partially-applied outcome rather than retry mid-write.
    fn apply(&mut self, setting: DisplaySetting) -> Result<(), HardwareError>;
}

/// DDC/CI adapter addressing the first enumerated display.
///
/// Only the first display is ever controlled; any others attached stay
/// untouched. This matches the single-monitor use case the daemon targets
/// and is a documented scope limitation, not a bug.
///
/// The device handle is opened, used, and released within each call — it is
/// never held across poll cycles, since DDC/CI device nodes can be
/// exclusive-access on some platforms.
pub struct DdcDisplay;

impl DisplayControl for DdcDisplay {
    fn read(&mut self) -> Result<DisplaySetting, HardwareError> {
        run_with_timeout(HARDWARE_TIMEOUT, || {
            let mut display = first_display()?;
            let brightness = get_feature(&mut display, VCP_BRIGHTNESS)?;
            let contrast = get_feature(&mut display, VCP_CONTRAST)?;
            Ok(DisplaySetting {
                brightness,
                contrast,
            })
        })
    }

    fn apply(&mut self, setting: DisplaySetting) -> Result<(), HardwareError> {
        run_with_timeout(HARDWARE_TIMEOUT, move || {
            let mut display = first_display()?;
            set_feature(&mut display, VCP_BRIGHTNESS, setting.brightness)?;
            set_feature(&mut display, VCP_CONTRAST, setting.contrast)?;
            Ok(())
        })
    }
}

fn first_display() -> Result<Display, HardwareError> {
    Display::enumerate()
        .into_iter()
        .next()
        .ok_or(HardwareError::Unavailable)
}

fn get_feature(display: &mut Display, code: u8) -> Result<u16, HardwareError> {
    display
        .handle
        .get_vcp_feature(code)
        .map(|v| v.value())
        .map_err(|e| HardwareError::ReadFailure(format!("vcp 0x{code:02x}: {e}")))
}

fn set_feature(display: &mut Display, code: u8, value: u16) -> Result<(), HardwareError> {
    display
        .handle
        .set_vcp_feature(code, value)
        .map_err(|e| HardwareError::WriteFailure(format!("vcp 0x{code:02x}: {e}")))
}

/// Runs `op` on a fresh thread and waits at most `timeout` for its result.
/// A blocked DDC/CI transaction past the deadline is reported as
/// [`HardwareError::Unavailable`]; the orphaned thread finishes (or hangs)
/// on its own without holding up the poll loop.
fn run_with_timeout<T, F>(timeout: Duration, op: F) -> Result<T, HardwareError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, HardwareError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(op());
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(HardwareError::Unavailable),
    }
}
