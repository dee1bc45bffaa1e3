// to_hundredths {{{1
/// Round to two decimal places from the exact binary value.
///
/// Scaling by 100 first would round twice and push values just under a
/// half (6.894999...) up.
///
pub fn to_hundredths(n: f64) -> f64 {
    format!("{:.2}", n).parse().unwrap_or(n)
}

// interp_tws {{{1
/// Piecewise-linear interpolation of `ys` over the ascending points `xs`.
///
/// Outside the sampled range the first or last segment is extended, so the
/// result is unbounded and may not be physically meaningful.
///
/// `xs` and `ys` must be the same length with at least two points; the
/// reference table guarantees this.
///
pub fn interp_tws(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;

    // Index of the upper end of the segment containing x
    let hi = match xs.iter().position(|s| *s >= x) {
        Some(i) if xs[i] == x => return ys[i],
        Some(0)  => 1,
        Some(i)  => i,
        None     => last,
    };
    let lo = hi - 1;

    let slope = (ys[hi] - ys[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + slope * (x - xs[lo])
}

// bounds {{{1
/// Nearest reference angles strictly below and strictly above `twa`.
///
/// Defaults to 0 below and 180 above when there is no such angle.
///
pub fn bounds(twa: u32, reference: &[u32]) -> (u32, u32) {
    let lower = reference.iter().copied().filter(|a| *a < twa).max().unwrap_or(0);
    let upper = reference.iter().copied().filter(|a| *a > twa).min().unwrap_or(180);

    (lower, upper)
}

// interp_twa {{{1
/// Interpolate boat speed at `twa` from speeds at the bounding reference
/// angles, weighted by angular distance.
///
/// A missing or zero bounding speed yields None. A genuine zero speed is
/// therefore indistinguishable from a gap.
///
pub fn interp_twa(
    twa: u32,
    (lower, lower_speed): (u32, Option<f64>),
    (upper, upper_speed): (u32, Option<f64>),
) -> Option<f64> {
    let lo = lower_speed.filter(|s| *s != 0.0)?;
    let hi = upper_speed.filter(|s| *s != 0.0)?;

    if upper == lower { return Some(lo); } // Catch divide by zero

    let frac = (twa as f64 - lower as f64) / (upper as f64 - lower as f64);
    Some(lo + (hi - lo) * frac)
}
