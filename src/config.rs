use crate::error::{GazeError, GazeResult};

/// Frame rate as an exact rational, so fractional rates like 12.5 fps
/// survive the trip into GIF frame delays without rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32,
}

impl Fps {
    pub fn new(num: u32, den: u32) -> GazeResult<Self> {
        if num == 0 || den == 0 {
            return Err(GazeError::validation("fps must have num>0 and den>0"));
        }
        Ok(Self { num, den })
    }

    /// Per-frame delay in milliseconds, as a (numerator, denominator) pair.
    pub fn frame_delay_ms(&self) -> (u32, u32) {
        (1000 * self.den, self.num)
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Immutable per-run rendering configuration. Constructed once at process
/// start and passed by reference; no component reads ambient globals.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_frames: usize,
    pub fps: Fps,
}

impl RenderConfig {
    pub fn validate(&self) -> GazeResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(GazeError::validation("canvas width/height must be > 0"));
        }
        if self.max_frames == 0 {
            return Err(GazeError::validation("max_frames must be > 0"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(GazeError::validation("fps must have num>0 and den>0"));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    /// Matches the recording setup: 2560x1600 screen, 100-frame GIF budget,
    /// 12.5 fps playback.
    fn default() -> Self {
        Self {
            canvas_width: 2560,
            canvas_height: 1600,
            max_frames: 100,
            fps: Fps { num: 25, den: 2 },
        }
    }
}
