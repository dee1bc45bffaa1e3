//! Sailing polar tables.
//!
//! A small reference table of measured boat speeds is interpolated into a
//! dense table of predicted speed by whole true wind speed (1 to 20 kn) and
//! true wind angle (1 to 180 degrees).
//!
pub const POLAR_TABLE_FILE: &str = "polarTable.json";

mod interp;
mod polar;
mod reference;
mod sailing;

pub use interp::{bounds, interp_tws, interp_twa, to_hundredths};
pub use polar::{PolarTable, SpeedRow};
pub use reference::{Curve, ReferenceTable};
pub use sailing::{fold_twa, PointOfSail};

// Error {{{1
/// Everything that can go wrong building, saving or loading a table.
///
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("curve '{curve}' has {found} values but there are {expected} wind speeds")]
    CurveLength { curve: Curve, expected: usize, found: usize },

    #[error("wind speeds must be strictly ascending with at least two points: {0:?}")]
    WindSpeeds(Vec<f64>),

    #[error("invalid polar table key '{0}'")]
    Key(String),
}

pub type Result<T> = std::result::Result<T, Error>;
