//! Wire record: one flat JSON object per line, `{"time":<s>,"current":<A>}\r\n`.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::LINE_BUFFER_SIZE;

pub const LINE_TERMINATOR: &[u8] = b"\r\n";

pub type Line = Vec<u8, LINE_BUFFER_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Sample {
    /// Uptime in seconds
    pub time: f64,
    /// Amps
    pub current: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum EncodeError {
    BufferFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum DecodeError {
    Malformed,
}

impl From<serde_json_core::ser::Error> for EncodeError {
    fn from(_: serde_json_core::ser::Error) -> Self {
        // BufferFull is the only failure mode for a struct of two floats
        Self::BufferFull
    }
}

impl From<serde_json_core::de::Error> for DecodeError {
    fn from(_: serde_json_core::de::Error) -> Self {
        Self::Malformed
    }
}

impl Sample {
    pub fn new(uptime_ms: u64, current: f32) -> Self {
        Self {
            time: uptime_ms as f64 / 1000.0,
            current,
        }
    }

    pub fn encode_line(&self) -> Result<Line, EncodeError> {
        self.encode_into::<LINE_BUFFER_SIZE>()
    }

    /// Serialize into an `N`-byte line, terminator included. Never truncates: a line
    /// that does not fit in full is `BufferFull`.
    pub fn encode_into<const N: usize>(&self) -> Result<Vec<u8, N>, EncodeError> {
        let mut line: Vec<u8, N> = serde_json_core::to_vec(self)?;
        line.extend_from_slice(LINE_TERMINATOR)
            .map_err(|_| EncodeError::BufferFull)?;
        Ok(line)
    }

    /// Parse one received line; trailing `\r`/`\n` are ignored.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let body = line.trim_end_matches(['\r', '\n']);
        let (sample, used) = serde_json_core::from_str::<Sample>(body)?;
        if used != body.len() {
            return Err(DecodeError::Malformed);
        }
        Ok(sample)
    }
}
