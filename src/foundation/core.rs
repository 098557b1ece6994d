use crate::foundation::error::{TrackerError, TrackerResult};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rational frame rate, e.g. `30000/1001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

impl Fps {
    pub fn new(num: u32, den: u32) -> TrackerResult<Self> {
        if den == 0 {
            return Err(TrackerError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TrackerError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Multiplier that maps frame numbers sampled at `self` onto frame numbers at `timeline`.
    pub fn time_scale_to(self, timeline: Fps) -> f64 {
        timeline.as_f64() / self.as_f64()
    }
}

/// Parses `num/den` (e.g. `30000/1001`) or a bare integer rate such as `25`.
impl std::str::FromStr for Fps {
    type Err = TrackerError;

    fn from_str(s: &str) -> TrackerResult<Self> {
        let (num, den) = s.trim().split_once('/').unwrap_or((s.trim(), "1"));
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| TrackerError::validation(format!("invalid fps '{s}': {e}")))
        };
        Self::new(parse(num)?, parse(den)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
