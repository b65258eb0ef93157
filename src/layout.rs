//! X-axis positions of bars and points in grouped charts.

/// Spacing parameters for bar and line charts, in x-axis units.
///
/// Bars are laid out query by query, then scale factor by scale factor, then variant by
/// variant. Every scale factor group is followed by `scale_spacing`, every query group by
/// `query_spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub width: f64,
    pub spacing: f64,
    pub scale_spacing: f64,
    pub query_spacing: f64,
    /// Width of the caps on whiskers in line charts.
    pub whisker_width: f64,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            width: 0.1,
            spacing: 0.0,
            scale_spacing: 0.05,
            query_spacing: 0.3,
            whisker_width: 0.01,
        }
    }
}

impl BarLayout {
    fn step(&self) -> f64 {
        self.width + self.spacing
    }

    /// Centre of the bar for `(query_idx, sf_idx, variant_idx)` in a chart of all queries with
    /// `n_sf` scale factors and `n_variants` variants each.
    pub fn grouped(
        &self,
        query_idx: usize,
        sf_idx: usize,
        variant_idx: usize,
        n_sf: usize,
        n_variants: usize,
    ) -> f64 {
        let group = (query_idx * n_sf + sf_idx) as f64;
        query_idx as f64 * self.query_spacing
            + group * self.scale_spacing
            + (group * n_variants as f64 + variant_idx as f64) * self.step()
    }

    /// Midpoint between the first and last bar of a scale factor group.
    pub fn grouped_tick(&self, query_idx: usize, sf_idx: usize, n_sf: usize, n_variants: usize) -> f64 {
        let last = n_variants.saturating_sub(1);
        midpoint(
            self.grouped(query_idx, sf_idx, 0, n_sf, n_variants),
            self.grouped(query_idx, sf_idx, last, n_sf, n_variants),
        )
    }

    /// Midpoint between the first and last bar of a query group.
    pub fn query_tick(&self, query_idx: usize, n_sf: usize, n_variants: usize) -> f64 {
        midpoint(
            self.grouped(query_idx, 0, 0, n_sf, n_variants),
            self.grouped(
                query_idx,
                n_sf.saturating_sub(1),
                n_variants.saturating_sub(1),
                n_sf,
                n_variants,
            ),
        )
    }

    /// Bar centre within a single-query panel.
    pub fn separate(&self, sf_idx: usize, variant_idx: usize, n_variants: usize) -> f64 {
        let sf = sf_idx as f64;
        sf * self.scale_spacing + n_variants as f64 * self.step() * sf + variant_idx as f64 * self.step()
    }

    pub fn separate_tick(&self, sf_idx: usize, n_variants: usize) -> f64 {
        midpoint(
            self.separate(sf_idx, 0, n_variants),
            self.separate(sf_idx, n_variants.saturating_sub(1), n_variants),
        )
    }

    /// Point position within a single-query line panel; all variants share it.
    pub fn line(&self, sf_idx: usize) -> f64 {
        sf_idx as f64 * self.scale_spacing
    }

    /// Extent `(min, max)` of the x axis covering positions `0..=last_pos` plus a margin on each side.
    pub fn x_range(&self, last_pos: f64) -> (f64, f64) {
        let margin = self.width.max(self.scale_spacing);
        (-margin, last_pos + margin)
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}
