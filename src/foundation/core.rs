use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MvError, MvResult};

/// Frame rate of the raw stream produced by the rendering engine.
pub const RAW_FRAME_RATE: u32 = 30;

/// Pixel format of the raw stream produced by the rendering engine (32-bit BGR).
pub const RAW_PIXEL_FORMAT: &str = "bgr32";

/// Output frame dimensions in pixels, written as `WxH` on both command lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution.
    ///
    /// Both dimensions must be non-zero and even: the transcoder converts to 4:2:0 chroma
    /// subsampling, which cannot represent odd sizes.
    pub fn new(width: u32, height: u32) -> MvResult<Self> {
        if width == 0 || height == 0 {
            return Err(MvError::validation("resolution width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(MvError::validation(format!(
                "resolution {width}x{height} must have even width/height (required for yuv420p output)"
            )));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = MvError;

    fn from_str(s: &str) -> MvResult<Self> {
        let (w, h) = s
            .trim()
            .split_once('x')
            .ok_or_else(|| MvError::validation(format!("resolution '{s}' is not of the form WxH")))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|e| MvError::validation(format!("resolution '{s}': {e}")))
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
