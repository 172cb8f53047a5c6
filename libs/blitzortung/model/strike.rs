//! Lightning strike records
//!
//! Every inflated frame is one JSON object describing a single strike and the
//! detector stations that contributed to locating it. Fields missing from the
//! payload decode to zero, matching what the feed producer expects from its
//! own clients.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Polarity reported by a station for its signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Positive,
    Unknown,
}

/// A detector station that reported a given strike
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    /// Station identifier
    #[serde(rename = "sta")]
    pub id: i64,

    /// Signal status bit field
    /// - bit 1: polarity negative
    /// - bit 2: polarity positive
    /// - bit 3: signal used for the computation
    pub status: i64,

    /// Time difference to the strike, in nanoseconds
    #[serde(rename = "time")]
    pub time_delta: i64,

    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Altitude of the detector in meters
    #[serde(rename = "alt")]
    pub altitude: i64,
}

impl Station {
    pub fn polarity(&self) -> Polarity {
        match self.status & 0b11 {
            0b01 => Polarity::Negative,
            0b10 => Polarity::Positive,
            _ => Polarity::Unknown,
        }
    }

    /// Whether the signal was used to locate the strike
    pub fn is_used(&self) -> bool {
        self.status & 0b100 != 0
    }
}

/// A single lightning strike as reported by the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strike {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(rename = "pol")]
    pub polarity: i64,

    #[serde(rename = "sig")]
    pub signals: Vec<Station>,

    /// Strike time in nanoseconds since the Unix epoch
    #[serde(rename = "time")]
    pub time_ns: i64,
    /// Delay of the report, in seconds
    #[serde(rename = "delay")]
    pub delay_secs: f64,

    /// Maximal deviation span in nanoseconds
    #[serde(rename = "mds")]
    pub max_deviation_span: i64,
    /// Maximal circular gap between two stations, in degrees
    #[serde(rename = "mcg", skip_serializing_if = "Option::is_none")]
    pub max_circular_gap: Option<i64>,

    pub region: i64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Altitude in meters
    #[serde(rename = "alt")]
    pub altitude: i64,
}

impl Strike {
    /// Report delay, truncated to whole milliseconds
    pub fn delay(&self) -> Duration {
        Duration::milliseconds((self.delay_secs * 1e3) as i64)
    }

    /// Absolute strike time
    pub fn time(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.time_ns)
    }
}
