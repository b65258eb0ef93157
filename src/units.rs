//! Unit selection for axis labels and tick formatting.

/// Time units from finest to coarsest, each 1000 times the previous. Timings are in picoseconds.
pub const TIME_UNITS: [&str; 4] = ["ps", "ns", "μs", "ms"];

/// Unit returned once [`TIME_UNITS`] is exhausted.
pub const TERMINAL_UNIT: &str = "s";

pub const PICOS_PER_SEC: f64 = 1e12;

/// A display unit and the multiplier that brings values into it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitScale {
    pub unit: String,
    pub scale: f64,
}

impl UnitScale {
    pub fn new(unit: impl Into<String>, scale: f64) -> Self {
        Self {
            unit: unit.into(),
            scale,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.scale
    }
}

/// Picks the first unit of `ladder` at which `max_value` (scaled) is at least 1, multiplying
/// the scale by 1000 at each step. Past the end of the ladder, [`TERMINAL_UNIT`] is returned
/// with the accumulated scale.
///
/// A `max_value` that is not positive and finite gets the first unit of `ladder` with scale 1,
/// so an all-zero series is drawn unscaled rather than in the coarsest unit.
pub fn choose_unit(max_value: f64, ladder: &[&str]) -> UnitScale {
    let first = ladder.first().copied().unwrap_or(TERMINAL_UNIT);
    if !max_value.is_finite() || max_value <= 0.0 {
        log::debug!("no positive maximum ({max_value}), using `{first}` unscaled");
        return UnitScale::new(first, 1.0);
    }

    let mut scale = 1.0;
    for unit in ladder {
        if max_value * scale >= 1.0 {
            return UnitScale::new(*unit, scale);
        }
        scale *= 1000.0;
    }
    UnitScale::new(TERMINAL_UNIT, scale)
}

/// [`choose_unit`] over [`TIME_UNITS`].
pub fn choose_time_unit(max_value: f64) -> UnitScale {
    choose_unit(max_value, &TIME_UNITS)
}

/// Formats a picosecond value in the largest unit that keeps it below 1000, e.g. `12.5 μs`.
pub fn format_time(picos: f64) -> String {
    let mut value = picos;
    for unit in TIME_UNITS {
        if value.abs() < 1000.0 {
            return format!("{} {unit}", trim_float(value));
        }
        value /= 1000.0;
    }
    format!("{} {TERMINAL_UNIT}", trim_float(value))
}

/// Formats an axis parameter with no decimals.
pub fn format_param(value: f64) -> String {
    format!("{value:.0}")
}

/// Formats an integer with `,` thousands separators, e.g. `1,048,576`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a speedup multiplier, e.g. `3.25x`.
pub fn format_multiplier(value: f64) -> String {
    format!("{value:.2}x")
}

/// At most 2 decimals, without trailing zeros.
fn trim_float(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_owned()
    } else {
        s.to_owned()
    }
}
