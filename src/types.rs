use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::OptimizeError;

// ---------- Reference data ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Driver {
    pub id: &'static str,
    pub display_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circuit {
    pub name: &'static str,
    pub image_key: &'static str,
    pub lap_count: u32,
}

impl Circuit {
    /// Asset path handed to whatever serves the track images.
    pub fn image_path(&self) -> String {
        format!("tracks/{}", self.image_key)
    }
}

// ---------- Strategy data ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCompound(pub String);

impl fmt::Display for UnknownCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tyre compound '{}'", self.0)
    }
}

impl std::error::Error for UnknownCompound {}

impl FromStr for Compound {
    type Err = UnknownCompound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Compound::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCompound(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stint {
    pub compound: Compound,
    pub length: u32, // laps, always > 0
}

impl Stint {
    pub fn new(compound: Compound, length: u32) -> Self {
        Self { compound, length }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub stints: Vec<Stint>,
    pub total_time_s: f64,
}

impl Strategy {
    pub fn total_laps(&self) -> u32 {
        self.stints.iter().map(|s| s.length).sum()
    }

    pub fn pit_stops(&self) -> usize {
        self.stints.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub best: Strategy,
    /// Ranked by the service, best first. Shown as received.
    pub alternatives: Vec<Strategy>,
    pub driver_pace_delta: Option<f64>,
    pub track_laps: Option<u32>,
    /// Inclusive (start, end) laps.
    pub safety_car_periods: Vec<(u32, u32)>,
}

// ---------- Wire types ----------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OptimizeRequest {
    pub driver: String,
    pub track: String,
}

#[derive(Deserialize, Debug)]
pub struct OptimizeResponse {
    pub best_strategy: WireStrategy,
    pub top_5_strategies: Option<Vec<WireStrategy>>,
    pub driver_delta: Option<f64>,
    pub track_laps: Option<i64>,
    pub safety_car_periods: Option<Vec<(i64, i64)>>,
}

#[derive(Deserialize, Debug)]
pub struct WireStrategy {
    pub strategy: Vec<WireStint>,
    pub total_time: f64,
}

#[derive(Deserialize, Debug)]
pub struct WireStint {
    pub compound: String,
    pub length: i64,
}

fn malformed(msg: impl Into<String>) -> OptimizeError {
    OptimizeError::MalformedResponse(msg.into())
}

fn positive_laps(value: i64, what: &str) -> Result<u32, OptimizeError> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(malformed(format!("{what} must be a positive lap count, got {value}"))),
    }
}

impl TryFrom<WireStint> for Stint {
    type Error = OptimizeError;

    fn try_from(raw: WireStint) -> Result<Self, Self::Error> {
        let compound = raw
            .compound
            .parse::<Compound>()
            .map_err(|e| malformed(e.to_string()))?;
        let length = positive_laps(raw.length, "stint length")?;
        Ok(Stint { compound, length })
    }
}

impl TryFrom<WireStrategy> for Strategy {
    type Error = OptimizeError;

    fn try_from(raw: WireStrategy) -> Result<Self, Self::Error> {
        if !raw.total_time.is_finite() {
            return Err(malformed("total_time is not a finite number"));
        }
        let stints = raw
            .strategy
            .into_iter()
            .map(Stint::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Strategy {
            stints,
            total_time_s: raw.total_time,
        })
    }
}

impl TryFrom<OptimizeResponse> for OptimizationResult {
    type Error = OptimizeError;

    fn try_from(raw: OptimizeResponse) -> Result<Self, Self::Error> {
        let best = Strategy::try_from(raw.best_strategy)?;
        if best.stints.is_empty() {
            return Err(malformed("best_strategy has no stints"));
        }
        let alternatives = raw
            .top_5_strategies
            .unwrap_or_default()
            .into_iter()
            .map(Strategy::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let driver_pace_delta = match raw.driver_delta {
            Some(d) if !d.is_finite() => return Err(malformed("driver_delta is not finite")),
            other => other,
        };
        let track_laps = raw
            .track_laps
            .map(|laps| positive_laps(laps, "track_laps"))
            .transpose()?;
        let safety_car_periods = raw
            .safety_car_periods
            .unwrap_or_default()
            .into_iter()
            .map(|(start, end)| {
                let start = positive_laps(start, "safety car start")?;
                let end = positive_laps(end, "safety car end")?;
                if end < start {
                    return Err(malformed(format!("safety car period {start}-{end} is reversed")));
                }
                Ok((start, end))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OptimizationResult {
            best,
            alternatives,
            driver_pace_delta,
            track_laps,
            safety_car_periods,
        })
    }
}

impl OptimizationResult {
    /// Parse and validate a raw response body.
    pub fn from_json(body: &[u8]) -> Result<Self, OptimizeError> {
        let raw: OptimizeResponse =
            serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
        Self::try_from(raw)
    }
}
