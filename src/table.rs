//! Ordered table of rows with the grouping helpers charts need.

use crate::normalize::Row;
use std::{
    fmt::Debug,
    ops::{Deref, DerefMut},
};

/// Wrapper of [`Vec`]`<R>` that adds grouping methods; derefs to the vector, so all slice
/// methods and `for` loops work on it.
///
/// "Unique" methods return values in order of first appearance, which after
/// [`sorted_by_scale_factor`](Self::sorted_by_scale_factor) is ascending for scale factors.
#[derive(PartialEq, Clone, Default)]
pub struct BenchTable<R>(pub Vec<R>);

impl<R> BenchTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self(rows)
    }

    pub fn into_inner(self) -> Vec<R> {
        self.0
    }
}

impl<R> Debug for BenchTable<R>
where
    R: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (&self.0 as &dyn Debug).fmt(f)
    }
}

impl<R> From<Vec<R>> for BenchTable<R> {
    fn from(value: Vec<R>) -> Self {
        Self(value)
    }
}

impl<R> Deref for BenchTable<R> {
    type Target = Vec<R>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<R> DerefMut for BenchTable<R> {
    fn deref_mut(&mut self) -> &mut Vec<R> {
        &mut self.0
    }
}

impl<R> IntoIterator for BenchTable<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a BenchTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn push_unique<T: PartialEq>(acc: &mut Vec<T>, value: T) {
    if !acc.contains(&value) {
        acc.push(value);
    }
}

impl<R: Row + Clone> BenchTable<R> {
    pub fn queries(&self) -> Vec<&str> {
        let mut acc = Vec::new();
        for row in &self.0 {
            push_unique(&mut acc, row.query());
        }
        acc
    }

    pub fn variants(&self) -> Vec<&str> {
        let mut acc = Vec::new();
        for row in &self.0 {
            push_unique(&mut acc, row.variant());
        }
        acc
    }

    pub fn scale_factors(&self) -> Vec<u64> {
        let mut acc = Vec::new();
        for row in &self.0 {
            push_unique(&mut acc, row.scale_factor());
        }
        acc
    }

    /// Returns a new table with the rows for which `pred` holds.
    pub fn filtered(&self, mut pred: impl FnMut(&R) -> bool) -> Self {
        self.0.iter().filter(|r| pred(r)).cloned().collect::<Vec<_>>().into()
    }

    pub fn for_query(&self, query: &str) -> Self {
        self.filtered(|r| r.query() == query)
    }

    /// The row for `(query, variant, scale_factor)`, if any.
    pub fn find(&self, query: &str, variant: &str, scale_factor: u64) -> Option<&R> {
        self.0.iter().find(|r| {
            r.query() == query && r.variant() == variant && r.scale_factor() == scale_factor
        })
    }

    /// Stable sort by ascending scale factor; rows with equal scale factors keep document order.
    pub fn sorted_by_scale_factor(&self) -> Self {
        let mut rows = self.0.clone();
        rows.sort_by_key(|r| r.scale_factor());
        rows.into()
    }

    /// Splits the table into tables covering at most `queries_per_chunk` queries each, in
    /// query order.
    pub fn split_by_queries(&self, queries_per_chunk: usize) -> Vec<Self> {
        let chunk = queries_per_chunk.max(1);
        self.queries()
            .chunks(chunk)
            .map(|names| self.filtered(|r| names.contains(&r.query())))
            .collect()
    }

    /// Maximum of `f` over all rows; `None` for an empty table.
    pub fn max_by_field(&self, f: impl Fn(&R) -> f64) -> Option<f64> {
        self.0.iter().map(f).reduce(f64::max)
    }
}
