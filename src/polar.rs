use crate::{Error, Result};
use crate::interp::{bounds, interp_tws, interp_twa, to_hundredths};
use crate::reference::ReferenceTable;

use format_num::format_num;
use log::{debug, info};
use serde::ser::{Serialize, SerializeMap, Serializer};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// SpeedRow {{{1
/// Predicted boat speeds at one true wind speed.
///
#[derive(PartialEq, Clone, Debug)]
pub struct SpeedRow {
    /// True wind speed (kn).
    pub tws: u32,
    /// Boat speed at each true wind angle; index 0 is 1 degree.
    speeds: Vec<Option<f64>>,
    /// Gybe angle, only at sampled wind speeds.
    pub gybe_angle: Option<f64>,
}

impl SpeedRow { // {{{2
    fn empty(tws: u32) -> SpeedRow {
        SpeedRow {
            tws,
            speeds: vec![None; PolarTable::TWA_MAX as usize],
            gybe_angle: None,
        }
    }

    // speed {{{3
    /// Boat speed at a true wind angle in 1..=180.
    ///
    pub fn speed(&self, twa: u32) -> Option<f64> {
        match twa {
            0 => None,
            _ => self.speeds.get(twa as usize - 1).copied().flatten(),
        }
    }

    fn set(&mut self, twa: u32, speed: Option<f64>) {
        self.speeds[twa as usize - 1] = speed.map(to_hundredths);
    }

    // speeds {{{3
    /// Every defined (angle, speed) pair in ascending angle order.
    ///
    pub fn speeds(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        (1..=PolarTable::TWA_MAX).filter_map(|twa| self.speed(twa).map(|s| (twa, s)))
    }

    // best {{{3
    /// Fastest angle and its speed.
    ///
    pub fn best(&self) -> Option<(u32, f64)> {
        self.speeds().max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl Serialize for SpeedRow { // {{{2
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.speeds.len() + 1))?;
        for (i, speed) in self.speeds.iter().enumerate() {
            map.serialize_entry(&(i + 1).to_string(), speed)?;
        }
        map.serialize_entry(PolarTable::GYBE_ANGLE_KEY, &self.gybe_angle)?;
        map.end()
    }
}

// PolarTable {{{1
/// Predicted boat speed by whole true wind speed and angle.
///
#[derive(PartialEq, Clone, Debug)]
pub struct PolarTable {
    rows: Vec<SpeedRow>,
}

impl PolarTable {
    /// Largest wind speed generated (kn).
    pub const TWS_MAX: u32 = 20;
    /// Largest true wind angle.
    pub const TWA_MAX: u32 = 180;
    /// Key holding the gybe angle in each serialized row.
    pub const GYBE_ANGLE_KEY: &'static str = "gybe_angle";

    // build {{{2
    /// Interpolate a full table from reference measurements.
    ///
    pub fn build(reference: &ReferenceTable) -> PolarTable {
        let angles = reference.reference_angles();

        let rows = (1..=Self::TWS_MAX)
            .map(|tws| Self::build_row(reference, &angles, tws))
            .collect();

        PolarTable { rows }
    }

    // build_row {{{2
    /// Fill one wind speed.
    ///
    /// Reference angles come straight from their curves. The angles between
    /// them are then filled in ascending order from the reference speeds
    /// already in the row.
    ///
    fn build_row(reference: &ReferenceTable, angles: &[u32], tws: u32) -> SpeedRow {
        let x = tws as f64;
        let mut row = SpeedRow::empty(tws);

        for &twa in angles.iter().filter(|a| (1..=Self::TWA_MAX).contains(*a)) {
            let speed = reference.curve_for(twa)
                .and_then(|curve| reference.values(curve))
                .map(|ys| interp_tws(x, reference.tws(), ys));
            row.set(twa, speed);
        }

        for twa in (1..=Self::TWA_MAX).filter(|a| !angles.contains(a)) {
            let (lower, upper) = bounds(twa, angles);
            let speed = interp_twa(
                twa,
                (lower, row.speed(lower)),
                (upper, row.speed(upper)),
            );
            row.set(twa, speed);
        }

        row.gybe_angle = reference.gybe_angle_at(x);

        debug!("tws {}: {} angles defined, gybe angle {:?}",
            tws, row.speeds().count(), row.gybe_angle);

        row
    }

    // rows {{{2
    pub fn rows(&self) -> &[SpeedRow] { &self.rows }

    // row {{{2
    pub fn row(&self, tws: u32) -> Option<&SpeedRow> {
        self.rows.iter().find(|r| r.tws == tws)
    }

    // wind_speeds {{{2
    pub fn wind_speeds(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.tws).collect()
    }

    // speed {{{2
    /// Boat speed at a whole wind speed and angle, if defined.
    ///
    pub fn speed(&self, tws: u32, twa: u32) -> Option<f64> {
        self.row(tws).and_then(|r| r.speed(twa))
    }

    // gybe_angle {{{2
    pub fn gybe_angle(&self, tws: u32) -> Option<f64> {
        self.row(tws).and_then(|r| r.gybe_angle)
    }

    // gybe_angle_near {{{2
    /// Gybe angle of the closest wind speed that has one. Ties go to the
    /// lower speed.
    ///
    pub fn gybe_angle_near(&self, tws: u32) -> Option<f64> {
        let mut best: Option<(u32, f64)> = None;
        for row in self.rows.iter() {
            let Some(g) = row.gybe_angle else { continue };
            let d = row.tws.abs_diff(tws);
            if best.is_none_or(|(bd, _)| d < bd) { best = Some((d, g)); }
        }

        best.map(|(_, g)| g)
    }

    // to_json {{{2
    /// Indented JSON text of the table.
    ///
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    // save {{{2
    /// Save table to a file, replacing anything already there.
    ///
    pub fn save<P: AsRef<Path>>(&self, p: P) -> Result<()> {
        let s = self.to_json()?;
        fs::write(&p, s)?;

        info!("saved {} wind speeds to {}", self.rows.len(), p.as_ref().display());
        Ok(())
    }

    // load {{{2
    /// Load table from a file written by save().
    ///
    pub fn load<P: AsRef<Path>>(p: P) -> Result<PolarTable> {
        let s = fs::read_to_string(&p)?;
        let raw: BTreeMap<String, BTreeMap<String, Option<f64>>> = serde_json::from_str(&s)?;
        let table = PolarTable::try_from(raw)?;

        info!("loaded {} wind speeds from {}", table.rows.len(), p.as_ref().display());
        Ok(table)
    }

    // report {{{2
    /// Summary of the table, one line per wind speed.
    ///
    pub fn report(&self) -> String {
        let mut report: Vec<String> = Vec::new();

        let speed = |s: Option<f64>| match s {
            Some(s) => format_num!(".2", s),
            None    => "-".to_string(),
        };

        report.push(format!("Polar table: {} wind speeds", self.rows.len()));
        report.push("".to_string());
        report.push(format!("{:>5}  {:>8}  {:>14}  {:>8}  {:>6}",
            "TWS", "Beat VMG", "Best speed", "Run VMG", "Gybe"));

        for row in self.rows.iter() {
            report.push(format!("{:>5}  {:>8}  {:>14}  {:>8}  {:>6}",
                row.tws,
                speed(row.speed(ReferenceTable::TWA_BEAT)),
                match row.best() {
                    Some((twa, s)) => format!("{} @ {:>3}°", format_num!(".2", s), twa),
                    None => "-".to_string(),
                },
                speed(row.speed(ReferenceTable::TWA_RUN)),
                match row.gybe_angle {
                    Some(g) => format_num!(".1", g),
                    None    => "-".to_string(),
                },
            ));
        }

        report.join("\n")
    }
}

impl Serialize for PolarTable { // {{{2
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in self.rows.iter() {
            map.serialize_entry(&row.tws.to_string(), row)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, Option<f64>>>> for PolarTable { // {{{2
    type Error = Error;

    fn try_from(raw: BTreeMap<String, BTreeMap<String, Option<f64>>>) -> Result<PolarTable> {
        let mut rows = Vec::with_capacity(raw.len());

        for (tws_key, entries) in raw {
            let tws: u32 = tws_key.parse().map_err(|_| Error::Key(tws_key.clone()))?;
            let mut row = SpeedRow::empty(tws);

            for (key, value) in entries {
                if key == Self::GYBE_ANGLE_KEY {
                    row.gybe_angle = value;
                    continue;
                }

                match key.parse::<u32>() {
                    Ok(twa) if (1..=Self::TWA_MAX).contains(&twa) =>
                        row.speeds[twa as usize - 1] = value,
                    _ => return Err(Error::Key(format!("{}/{}", tws_key, key))),
                }
            }

            rows.push(row);
        }

        rows.sort_by_key(|r| r.tws);
        Ok(PolarTable { rows })
    }
}
