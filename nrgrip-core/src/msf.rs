//! Minute/second/frame addressing.
//!
//! Audio CDs address sectors as MSF with 75 frames per second. LBA 0 is
//! MSF 00:02:00, so the 150-frame lead-in maps to negative LBAs.

use std::fmt;

/// Frames (sectors) per second of CD audio.
pub const FRAMES_PER_SECOND: u32 = 75;

/// Offset between MSF and LBA addressing: 2 seconds of lead-in.
pub const LEAD_IN_FRAMES: i32 = 150;

/// An absolute MSF address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

impl Msf {
    pub fn new(minutes: u8, seconds: u8, frames: u8) -> Self {
        Self {
            minutes,
            seconds,
            frames,
        }
    }

    /// Convert to an LBA, applying the lead-in offset.
    pub fn to_lba(self) -> i32 {
        self.to_frames() as i32 - LEAD_IN_FRAMES
    }

    /// Total frames with no lead-in offset (used for durations).
    pub fn to_frames(self) -> u32 {
        (self.minutes as u32 * 60 + self.seconds as u32) * FRAMES_PER_SECOND + self.frames as u32
    }

    /// Absolute address of an LBA. `None` below the lead-in or beyond 99:59:74.
    pub fn from_lba(lba: i32) -> Option<Self> {
        let frames = lba.checked_add(LEAD_IN_FRAMES)?;
        Self::from_frames(u32::try_from(frames).ok()?)
    }

    /// Duration-style address of a frame count.
    pub fn from_frames(frames: u32) -> Option<Self> {
        let minutes = frames / (60 * FRAMES_PER_SECOND);
        if minutes > 99 {
            return None;
        }
        let seconds = (frames / FRAMES_PER_SECOND) % 60;
        let frames = frames % FRAMES_PER_SECOND;
        Some(Self::new(minutes as u8, seconds as u8, frames as u8))
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}
