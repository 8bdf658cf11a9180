//! # Seat Classifier
//!
//! A drifting boat under a stern sail points its bow into the wind, so the
//! wind direction is taken as the bow heading. The current direction is then
//! rotated into the boat's frame:
//!
//! ```text
//! relative = (tide_dir - wind_dir) mod 360
//! ```
//!
//! and the relative bearing picks one of six seats. Starboard covers
//! [0, 180), port covers [180, 360). Sectors are half-open, so a bearing that
//! sits exactly on a boundary belongs to the following sector.
//!
//! | relative | starboard | relative | port |
//! |---|---|---|---|
//! | [0, 45) | bow | [180, 225) | stern |
//! | [45, 135) | mid | [225, 315) | mid |
//! | [135, 180) | stern | [315, 360) | bow |

use serde::{Deserialize, Serialize};

/// Wind speed in m/s below which the boat does not reliably weathervane.
pub const MIN_HEADING_WIND: f32 = 1.0;

/// Side of the boat, used for colour coding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Starboard,
    Port,
    Unknown,
}

/// One of the six seat zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Seat {
    BowStarboard,
    MidStarboard,
    SternStarboard,
    SternPort,
    MidPort,
    BowPort,
}

impl Seat {
    /// Seat for a relative bearing in degrees; any integer is accepted and
    /// reduced modulo 360 first.
    pub fn from_relative(relative: i32) -> Self {
        match relative.rem_euclid(360) {
            0..=44 => Seat::BowStarboard,
            45..=134 => Seat::MidStarboard,
            135..=179 => Seat::SternStarboard,
            180..=224 => Seat::SternPort,
            225..=314 => Seat::MidPort,
            _ => Seat::BowPort,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seat::BowStarboard => "bow-starboard",
            Seat::MidStarboard => "mid-starboard",
            Seat::SternStarboard => "stern-starboard",
            Seat::SternPort => "stern-port",
            Seat::MidPort => "mid-port",
            Seat::BowPort => "bow-port",
        }
    }

    pub fn side(self) -> Side {
        match self {
            Seat::BowStarboard | Seat::MidStarboard | Seat::SternStarboard => Side::Starboard,
            Seat::SternPort | Seat::MidPort | Seat::BowPort => Side::Port,
        }
    }

    /// Badge colour, greens for starboard and reds/purples for port.
    pub fn color(self) -> &'static str {
        match self {
            Seat::BowStarboard => "#00b894",
            Seat::MidStarboard => "#55efc4",
            Seat::SternStarboard => "#00cec9",
            Seat::SternPort => "#6c5ce7",
            Seat::MidPort => "#fab1a0",
            Seat::BowPort => "#e17055",
        }
    }
}

/// Outcome of seat classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatResult {
    Seat(Seat),
    /// Slack water or too little wind to know the heading
    Undeterminable,
}

impl SeatResult {
    pub fn label(&self) -> &'static str {
        match self {
            SeatResult::Seat(seat) => seat.label(),
            SeatResult::Undeterminable => "undeterminable",
        }
    }

    pub fn side(&self) -> Side {
        match self {
            SeatResult::Seat(seat) => seat.side(),
            SeatResult::Undeterminable => Side::Unknown,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeatResult::Seat(seat) => seat.color(),
            SeatResult::Undeterminable => "#b2bec3",
        }
    }
}

/// Current direction relative to the bow, in [0, 360).
pub fn relative_bearing(wind_dir: u16, tide_dir: u16) -> u16 {
    (tide_dir as i32 - wind_dir as i32).rem_euclid(360) as u16
}

/// Pick the up-current seat.
///
/// # Example
/// ```
/// use tide_seat_lib::seat::{classify, Seat, SeatResult};
///
/// // Bearing 45 is the first degree of mid-starboard
/// assert_eq!(classify(0, Some(45), 5.0), SeatResult::Seat(Seat::MidStarboard));
/// assert_eq!(classify(0, None, 5.0), SeatResult::Undeterminable);
/// assert_eq!(classify(0, Some(90), 0.9), SeatResult::Undeterminable);
/// ```
pub fn classify(wind_dir: u16, tide_dir: Option<u16>, wind_speed: f32) -> SeatResult {
    let tide_dir = match tide_dir {
        Some(dir) if wind_speed >= MIN_HEADING_WIND => dir,
        _ => return SeatResult::Undeterminable,
    };
    let relative = relative_bearing(wind_dir, tide_dir);
    SeatResult::Seat(Seat::from_relative(relative as i32))
}
