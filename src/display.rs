use anyhow::Result;
use opencv::core::Mat;
use opencv::highgui;

pub const ESCAPE: i32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

impl KeyAction {
    /// Map a `wait_key` result; only Escape quits
    pub fn from_key(key: i32) -> Self {
        if key == ESCAPE {
            KeyAction::Quit
        } else {
            KeyAction::Continue
        }
    }
}

/// A highgui window, destroyed on drop
pub struct Display {
    name: String,
}

impl Display {
    pub fn open(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        highgui::named_window(&name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self { name })
    }

    /// Show `frame` and wait up to `delay_ms` for a key press (0 waits forever)
    pub fn show(&self, frame: &Mat, delay_ms: i32) -> Result<KeyAction> {
        highgui::imshow(&self.name, frame)?;
        Ok(KeyAction::from_key(highgui::wait_key(delay_ms)?))
    }

    /// Keep the last frame on screen until a key is pressed
    pub fn hold(&self) -> Result<()> {
        highgui::wait_key(0)?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            log::warn!("failed to close window {}: {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_escape_quits() {
        assert_eq!(KeyAction::from_key(27), KeyAction::Quit);
        assert_eq!(KeyAction::from_key(-1), KeyAction::Continue);
        assert_eq!(KeyAction::from_key('q' as i32), KeyAction::Continue);
    }
}
