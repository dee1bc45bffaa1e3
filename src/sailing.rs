use serde::{Serialize, Deserialize};

use std::fmt;

// fold_twa {{{1
/// Wrap an angle into 0..360 and fold port angles onto starboard, giving
/// 0..=180.
///
pub fn fold_twa(twa: f64) -> f64 {
    let twa = twa.rem_euclid(360.0);
    if twa > 180.0 { 360.0 - twa } else { twa }
}

// PointOfSail {{{1
/// Heading relative to the true wind.
///
#[derive(PartialEq, Eq, Serialize, Deserialize, Clone, Copy, Debug)]
pub enum PointOfSail {
    /// Upwind, inside the beat angle.
    Beating,
    /// Between the beat angle and the beam.
    CloseReach,
    /// Wind exactly abeam.
    BeamReach,
    /// Between the beam and the gybe angle.
    BroadReach,
    /// Downwind, past the gybe angle.
    Running,
}

impl fmt::Display for PointOfSail { // {{{2
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}",
            match self {
                Self::Beating    => "beating (upwind)",
                Self::CloseReach => "close reach",
                Self::BeamReach  => "beam reach",
                Self::BroadReach => "broad reach",
                Self::Running    => "running (downwind)",
            }
        )
    }
}

impl PointOfSail { // {{{2
    /// Beat angle used when none is known, and the smallest one accepted.
    pub const BEAT_MIN: f64 = 45.0;
    /// Gybe angle used when none is known, and the smallest one accepted.
    pub const GYBE_MIN: f64 = 135.0;

    // classify {{{3
    /// Classify a true wind angle against the boat's beat and gybe angles.
    ///
    /// Angles outside 0..360 are wrapped and port angles are folded onto
    /// starboard. Head to wind has no point of sail.
    ///
    pub fn classify(twa: f64, beat: Option<f64>, gybe: Option<f64>) -> Option<PointOfSail> {
        let beat = beat.unwrap_or(Self::BEAT_MIN).max(Self::BEAT_MIN);
        let gybe = gybe.unwrap_or(Self::GYBE_MIN).max(Self::GYBE_MIN);

        let twa = fold_twa(twa);

             if twa <= 0.0   { None }
        else if twa < beat   { Some(Self::Beating) }
        else if twa < 90.0   { Some(Self::CloseReach) }
        else if twa == 90.0  { Some(Self::BeamReach) }
        else if twa < gybe   { Some(Self::BroadReach) }
        else                 { Some(Self::Running) }
    }
}
