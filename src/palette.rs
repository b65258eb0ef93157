//! Variant colours used by the charts.

use crate::ReportError;
use indexmap::IndexMap;
use plotters::style::{Color, Palette, Palette99, RGBColor};

/// Colours of one variant: `mean` for bars, lines and bands, `median` for median markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantColours {
    pub mean: RGBColor,
    pub median: RGBColor,
}

impl VariantColours {
    fn single(colour: RGBColor) -> Self {
        Self {
            mean: colour,
            median: colour,
        }
    }
}

/// Explicit mapping from variant name to colours. Variants not in the map get a colour picked
/// from [`Palette99`] by their index in the chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartPalette {
    entries: IndexMap<String, VariantColours>,
}

impl ChartPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// The colours used for the database comparison charts.
    pub fn databases() -> Self {
        let hex = |s: &str| parse_hex(s).unwrap_or(RGBColor(0, 0, 0));
        let mut entries = IndexMap::new();
        for (name, mean, median) in [
            ("EmDB", "#800080", "#4b0082"),
            ("EmDBCopy", "#008000", "#006400"),
            ("EmDBRef", "#ff0000", "#8b0000"),
            ("DuckDB", "#ffff00", "#daa520"),
            ("SQLite", "#0000ff", "#008b8b"),
            ("EmDBIter", "#800080", "#4b0082"),
            ("EmDBThunderdome", "#008000", "#006400"),
        ] {
            entries.insert(
                name.to_owned(),
                VariantColours {
                    mean: hex(mean),
                    median: hex(median),
                },
            );
        }
        Self { entries }
    }

    /// Sets the colours of `variant`, replacing any previous entry.
    pub fn with_variant(mut self, variant: &str, colours: VariantColours) -> Self {
        self.entries.insert(variant.to_owned(), colours);
        self
    }

    /// Builds a palette from `variant -> (mean, median)` hex strings such as `"#800080"`.
    /// A missing median colour defaults to the mean colour.
    pub fn from_hex<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str, Option<&'a str>)>,
    ) -> Result<Self, ReportError> {
        let mut palette = Self::new();
        for (variant, mean, median) in entries {
            let mean = parse_hex(mean)?;
            let median = median.map(parse_hex).transpose()?.unwrap_or(mean);
            palette = palette.with_variant(variant, VariantColours { mean, median });
        }
        Ok(palette)
    }

    /// Colours for `variant`, the `index`-th variant drawn in its chart.
    pub fn colours(&self, variant: &str, index: usize) -> VariantColours {
        match self.entries.get(variant) {
            Some(colours) => *colours,
            None => {
                let (r, g, b) = Palette99::pick(index).to_backend_color().rgb;
                VariantColours::single(RGBColor(r, g, b))
            }
        }
    }

    pub fn mean(&self, variant: &str, index: usize) -> RGBColor {
        self.colours(variant, index).mean
    }

    pub fn median(&self, variant: &str, index: usize) -> RGBColor {
        self.colours(variant, index).median
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn parse_hex(s: &str) -> Result<RGBColor, ReportError> {
    let digits = s.trim().trim_start_matches('#');
    let bad = || ReportError::Config(format!("`{s}` is not a #rrggbb colour"));
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(bad());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
