//! Axis tick generation and label formatting.
//!
//! [`Units`] maps a numeric data range to "nice" tick positions; category
//! mode ([`categories::CategoryMap`]) bypasses numeric ticks entirely.

pub mod categories;

use crate::foundation::error::{PlotError, PlotResult};

/// Upper bound of the tick-count band; the chosen increment is the smallest
/// nice step whose bracketing tick count does not exceed it.
const MAX_TICKS: i64 = 10;

/// Tick generator for one axis direction.
///
/// The increment is a power of ten times 1, 2 or 5 such that the bracketing
/// tick count stays within a 4–10 band. Marks are addressed by an integer
/// index range `[begin, end]` (inclusive) with `mark_value(i) = i * inc`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Units {
    inf: i64,
    sup: i64,
    inc: f64,
    decimals: usize,
}

impl Default for Units {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Units {
    /// Build a tick scale bracketing `[lo, hi]`.
    ///
    /// Degenerate ranges (`lo == hi`, including NaN spans) are widened by
    /// one unit before the increment search, so a single bracketing step is
    /// produced instead of dividing by zero.
    pub fn new(lo: f64, hi: f64) -> Self {
        let (mut lo, mut hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if hi == lo {
            hi = lo + 1.0;
        }

        let span = hi - lo;
        // First candidate is guaranteed below span/10, so the accepted
        // increment always has a rejected predecessor and the count lands in
        // the 4..=10 band.
        let mut base = 10f64.powf((span / MAX_TICKS as f64).log10().floor());
        loop {
            for major in [1.0, 2.0, 5.0] {
                let inc = major * base;
                let inf = (lo / inc).floor() as i64;
                let sup = (hi / inc).ceil() as i64;
                if sup - inf + 1 <= MAX_TICKS {
                    let decimals = if inc >= 1.0 {
                        0
                    } else {
                        (-inc.log10()).ceil() as usize
                    };
                    return Self {
                        inf,
                        sup,
                        inc,
                        decimals,
                    };
                }
            }
            base *= 10.0;
        }
    }

    /// Index of the first mark.
    pub fn begin(&self) -> i64 {
        self.inf
    }

    /// Index of the last mark (inclusive).
    pub fn end(&self) -> i64 {
        self.sup
    }

    /// Value of the mark at index `i`.
    pub fn mark_value(&self, i: i64) -> f64 {
        i as f64 * self.inc
    }

    /// Grid limits for pad-to-units mode: `(i_inf, i_sup, increment)`.
    pub fn limits(&self) -> (i64, i64, f64) {
        (self.inf, self.sup, self.inc)
    }

    /// Number of marks produced.
    pub fn mark_count(&self) -> usize {
        (self.sup - self.inf + 1) as usize
    }

    /// All `(value, label)` pairs, formatted with `format` or the default
    /// increment-derived precision.
    pub fn ticks(&self, format: Option<LabelFormat>) -> Vec<(f64, String)> {
        (self.inf..=self.sup)
            .map(|i| {
                let v = self.mark_value(i);
                let label = match format {
                    Some(f) => f.apply(v),
                    None => format!("{:.*}", self.decimals, v),
                };
                (v, label)
            })
            .collect()
    }
}

/// Validated axis label format, parsed from a printf-style tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LabelFormat {
    /// `%d`: rounded integer.
    Int,
    /// `%f` / `%.Nf`: fixed decimals.
    Fixed(u8),
    /// `%e` / `%.Ne`: scientific notation.
    Sci(u8),
    /// `%g`: shortest reasonable representation.
    General,
}

impl LabelFormat {
    /// Render a tick value with this format.
    pub fn apply(&self, v: f64) -> String {
        match *self {
            Self::Int => format!("{}", v.round() as i64),
            Self::Fixed(n) => format!("{:.*}", usize::from(n), v),
            Self::Sci(n) => format!("{:.*e}", usize::from(n), v),
            Self::General => format_general(v),
        }
    }
}

/// Parse a label format tag.
///
/// The recognized set is fixed: `%d`, `%f`, `%.Nf`, `%e`, `%.Ne`, `%g`.
/// Anything else is rejected so the caller can keep its previous format.
pub fn parse_label_format(tag: &str) -> PlotResult<LabelFormat> {
    let invalid = || PlotError::format(format!("unrecognized label format '{tag}'"));

    let rest = tag.strip_prefix('%').ok_or_else(invalid)?;
    match rest {
        "d" => return Ok(LabelFormat::Int),
        "f" => return Ok(LabelFormat::Fixed(6)),
        "e" => return Ok(LabelFormat::Sci(6)),
        "g" => return Ok(LabelFormat::General),
        _ => {}
    }

    let body = rest.strip_prefix('.').ok_or_else(invalid)?;
    let mut chars = body.chars();
    let conv = chars.next_back().ok_or_else(invalid)?;
    let precision: u8 = chars.as_str().parse().map_err(|_| invalid())?;
    match conv {
        'f' => Ok(LabelFormat::Fixed(precision)),
        'e' => Ok(LabelFormat::Sci(precision)),
        _ => Err(invalid()),
    }
}

fn format_general(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if (1e-4..1e6).contains(&a) {
        let s = format!("{v:.6}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        s.to_string()
    } else {
        format!("{v:e}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/units.rs"]
mod tests;
