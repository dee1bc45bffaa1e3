use crate::{Error, Result};

use serde::{Serialize, Deserialize};

use std::fmt;

// Curve {{{1
/// One column of the reference table.
///
#[derive(PartialEq, Eq, Serialize, Deserialize, Clone, Copy, Debug)]
pub enum Curve {
    /// Optimal upwind angle.
    BeatAngle,
    /// Upwind VMG. Also the boat speed at 45 degrees.
    BeatVmg,
    /// Measured boat speed at an explicit true wind angle.
    Twa(u32),
    /// Downwind VMG. Also the boat speed at 180 degrees.
    RunVmg,
    /// Optimal downwind gybe angle.
    GybeAngle,
}

impl fmt::Display for Curve { // {{{2
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BeatAngle => write!(f, "Beat Angle"),
            Self::BeatVmg   => write!(f, "Beat VMG"),
            Self::Twa(a)    => write!(f, "{}", a),
            Self::RunVmg    => write!(f, "Run VMG"),
            Self::GybeAngle => write!(f, "Gybe Angle"),
        }
    }
}

// ReferenceTable {{{1
/// Measured boat speeds at a handful of wind speeds and angles.
///
/// Every curve is aligned index for index with `tws`.
///
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReferenceTable {
    /// Sampled true wind speeds (kn), strictly ascending.
    tws: Vec<f64>,
    beat_angle: Vec<f64>,
    beat_vmg: Vec<f64>,
    /// Explicit angle columns, ascending by angle.
    twa: Vec<(u32, Vec<f64>)>,
    run_vmg: Vec<f64>,
    gybe_angle: Vec<f64>,
}

impl Default for ReferenceTable { // {{{2
    fn default() -> ReferenceTable {
        ReferenceTable {
            tws:        vec![6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 20.0],
            beat_angle: vec![42.6, 40.2, 38.4, 37.2, 36.9, 36.9, 37.0],
            beat_vmg:   vec![3.26, 3.94, 4.39, 4.60, 4.68, 4.73, 4.74],
            twa: vec![
                ( 52, vec![4.93, 5.76, 6.20, 6.39, 6.48, 6.53, 6.58]),
                ( 60, vec![5.18, 5.95, 6.34, 6.54, 6.64, 6.70, 6.77]),
                ( 75, vec![5.32, 6.08, 6.46, 6.69, 6.86, 6.97, 7.09]),
                ( 90, vec![5.23, 6.12, 6.55, 6.78, 6.96, 7.15, 7.42]),
                (110, vec![5.20, 6.15, 6.63, 6.97, 7.26, 7.51, 7.86]),
                (120, vec![5.01, 6.00, 6.54, 6.91, 7.24, 7.56, 8.26]),
                (135, vec![4.46, 5.49, 6.21, 6.64, 7.00, 7.36, 8.19]),
                (150, vec![3.76, 4.80, 5.67, 6.28, 6.67, 7.01, 7.71]),
            ],
            run_vmg:    vec![3.25, 4.16, 4.94, 5.61, 6.17, 6.57, 7.22],
            gybe_angle: vec![145.3, 150.5, 155.0, 163.7, 177.2, 179.0, 179.0],
        }
    }
}

impl ReferenceTable { // {{{2
    /// Smallest true wind angle.
    pub const TWA_MIN: u32 = 0;
    /// Angle whose speed is the Beat VMG curve.
    pub const TWA_BEAT: u32 = 45;
    /// Largest true wind angle; its speed is the Run VMG curve.
    pub const TWA_RUN: u32 = 180;

    // new {{{3
    /// Build a reference table, checking that every curve lines up with
    /// `tws`.
    ///
    pub fn new(
        tws: Vec<f64>,
        beat_angle: Vec<f64>,
        beat_vmg: Vec<f64>,
        mut twa: Vec<(u32, Vec<f64>)>,
        run_vmg: Vec<f64>,
        gybe_angle: Vec<f64>,
    ) -> Result<ReferenceTable> {
        if tws.len() < 2 || tws.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::WindSpeeds(tws));
        }

        twa.sort_by_key(|(angle, _)| *angle);

        let table = ReferenceTable { tws, beat_angle, beat_vmg, twa, run_vmg, gybe_angle };
        table.validate()?;

        Ok(table)
    }

    // validate {{{3
    fn validate(&self) -> Result<()> {
        let expected = self.tws.len();

        let mut curves: Vec<(Curve, &[f64])> = vec![
            (Curve::BeatAngle, self.beat_angle.as_slice()),
            (Curve::BeatVmg, self.beat_vmg.as_slice()),
            (Curve::RunVmg, self.run_vmg.as_slice()),
            (Curve::GybeAngle, self.gybe_angle.as_slice()),
        ];
        for (angle, values) in self.twa.iter() {
            curves.push((Curve::Twa(*angle), values.as_slice()));
        }

        match curves.into_iter().find(|(_, v)| v.len() != expected) {
            Some((curve, v)) => Err(Error::CurveLength { curve, expected, found: v.len() }),
            None => Ok(()),
        }
    }

    // tws {{{3
    /// Sampled true wind speeds.
    ///
    pub fn tws(&self) -> &[f64] { &self.tws }

    // values {{{3
    /// Values of a curve, if the table has it.
    ///
    pub fn values(&self, curve: Curve) -> Option<&[f64]> {
        match curve {
            Curve::BeatAngle => Some(self.beat_angle.as_slice()),
            Curve::BeatVmg   => Some(self.beat_vmg.as_slice()),
            Curve::RunVmg    => Some(self.run_vmg.as_slice()),
            Curve::GybeAngle => Some(self.gybe_angle.as_slice()),
            Curve::Twa(a)    => self.twa.iter()
                .find(|(angle, _)| *angle == a)
                .map(|(_, v)| v.as_slice()),
        }
    }

    // reference_angles {{{3
    /// Reference angles in ascending order: 0, the beat, every explicit
    /// column and the run.
    ///
    pub fn reference_angles(&self) -> Vec<u32> {
        let mut angles = vec![Self::TWA_MIN, Self::TWA_BEAT];
        angles.extend(self.twa.iter().map(|(angle, _)| *angle));
        angles.push(Self::TWA_RUN);

        angles
    }

    // curve_for {{{3
    /// Curve giving boat speed at a reference angle. Angle 0 has none.
    ///
    pub fn curve_for(&self, angle: u32) -> Option<Curve> {
        match angle {
            Self::TWA_BEAT => Some(Curve::BeatVmg),
            Self::TWA_RUN  => Some(Curve::RunVmg),
            a if self.twa.iter().any(|(angle, _)| *angle == a) => Some(Curve::Twa(a)),
            _ => None,
        }
    }

    // sampled {{{3
    /// Value of `curve` at `tws` only if `tws` is one of the sampled wind
    /// speeds.
    ///
    fn sampled(&self, curve: Curve, tws: f64) -> Option<f64> {
        let i = self.tws.iter().position(|s| *s == tws)?;
        self.values(curve).and_then(|v| v.get(i).copied())
    }

    // gybe_angle_at {{{3
    /// Gybe angle at an exactly sampled wind speed. Never interpolated.
    ///
    pub fn gybe_angle_at(&self, tws: f64) -> Option<f64> {
        self.sampled(Curve::GybeAngle, tws)
    }

    // nearest_index {{{3
    /// Index of the sampled wind speed closest to `tws`. Ties go to the
    /// lower speed.
    ///
    pub fn nearest_index(&self, tws: f64) -> usize {
        let mut best = 0;
        for (i, s) in self.tws.iter().enumerate() {
            if (tws - s).abs() < (tws - self.tws[best]).abs() { best = i; }
        }

        best
    }

    // near {{{3
    fn near(&self, curve: Curve, tws: f64) -> Option<f64> {
        let i = self.nearest_index(tws);
        self.values(curve).and_then(|v| v.get(i).copied())
    }

    // beat_angle_near {{{3
    /// Beat angle at the closest sampled wind speed.
    ///
    pub fn beat_angle_near(&self, tws: f64) -> Option<f64> {
        self.near(Curve::BeatAngle, tws)
    }

    // gybe_angle_near {{{3
    /// Gybe angle at the closest sampled wind speed.
    ///
    pub fn gybe_angle_near(&self, tws: f64) -> Option<f64> {
        self.near(Curve::GybeAngle, tws)
    }
}

#[cfg(test)] // ReferenceTable {{{1
mod reference_table {
    use super::*;

    #[test]
    fn sample_is_valid() {
        assert!(ReferenceTable::default().validate().is_ok());
    }

    #[test]
    fn eleven_reference_angles() {
        assert_eq!(
            vec![0, 45, 52, 60, 75, 90, 110, 120, 135, 150, 180],
            ReferenceTable::default().reference_angles()
        );
    }

    #[test]
    fn mismatched_curve_rejected() {
        let t = ReferenceTable::default();
        let mut short = t.run_vmg.clone();
        short.pop();

        match ReferenceTable::new(t.tws, t.beat_angle, t.beat_vmg, t.twa, short, t.gybe_angle) {
            Err(Error::CurveLength { curve, expected, found }) => {
                assert_eq!(Curve::RunVmg, curve);
                assert_eq!(7, expected);
                assert_eq!(6, found);
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unordered_wind_speeds_rejected() {
        let t = ReferenceTable::default();
        let mut tws = t.tws.clone();
        tws.swap(0, 1);

        assert!(matches!(
            ReferenceTable::new(tws, t.beat_angle, t.beat_vmg, t.twa, t.run_vmg, t.gybe_angle),
            Err(Error::WindSpeeds(_))
        ));
    }

    #[test]
    fn columns_sorted_on_new() {
        let t = ReferenceTable::default();
        let mut twa = t.twa.clone();
        twa.reverse();

        let table = ReferenceTable::new(t.tws, t.beat_angle, t.beat_vmg, twa, t.run_vmg, t.gybe_angle)
            .expect("valid table");
        assert_eq!(ReferenceTable::default().reference_angles(), table.reference_angles());
    }

    // Test curve_for {{{2
    macro_rules! test_curve_for {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (expected, angle) = $value;

                    assert_eq!(expected, ReferenceTable::default().curve_for(angle));
                }
            )*
        }
    }

    test_curve_for! {
        // name:          (curve, angle)
        curve_for_zero:   (None, 0),
        curve_for_beat:   (Some(Curve::BeatVmg), 45),
        curve_for_column: (Some(Curve::Twa(90)), 90),
        curve_for_run:    (Some(Curve::RunVmg), 180),
        curve_for_other:  (None, 91),
    }

    // Test gybe_angle_at {{{2
    macro_rules! test_gybe_angle_at {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (expected, tws) = $value;

                    assert_eq!(expected, ReferenceTable::default().gybe_angle_at(tws));
                }
            )*
        }
    }

    test_gybe_angle_at! {
        // name:            (gybe angle, tws)
        gybe_angle_at_6:    (Some(145.3), 6.0),
        gybe_angle_at_12:   (Some(163.7), 12.0),
        gybe_angle_at_13:   (None, 13.0),
        gybe_angle_at_20:   (Some(179.0), 20.0),
        gybe_angle_at_1:    (None, 1.0),
    }

    // Test nearest_index {{{2
    macro_rules! test_nearest_index {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (expected, tws) = $value;

                    assert_eq!(expected, ReferenceTable::default().nearest_index(tws));
                }
            )*
        }
    }

    test_nearest_index! {
        // name:                 (index, tws)
        nearest_index_below:     (0, 1.0),
        nearest_index_exact:     (3, 12.0),
        nearest_index_tie_low:   (3, 13.0),
        nearest_index_wide_tie:  (5, 18.0),
        nearest_index_closer_hi: (6, 19.0),
        nearest_index_above:     (6, 25.0),
    }

    #[test]
    fn angles_between_samples() {
        let t = ReferenceTable::default();

        assert_eq!(Some(37.2), t.beat_angle_near(13.0));
        assert_eq!(Some(163.7), t.gybe_angle_near(13.0));
        assert_eq!(None, t.gybe_angle_at(13.0));
    }

    #[test]
    fn curve_labels() {
        assert_eq!("Beat VMG", Curve::BeatVmg.to_string());
        assert_eq!("135", Curve::Twa(135).to_string());
        assert_eq!("Gybe Angle", Curve::GybeAngle.to_string());
    }
}
