use crate::models::SeriesRecord;
use crate::reconstruction::grouping::{group_by_comuna, median};
use crate::reconstruction::GapFiller;
use chrono::Datelike;
use rayon::prelude::*;
use std::collections::HashMap;

/// Seasonal-pattern substitution, one comuna at a time.
///
/// A missing day takes the median of that comuna's known values on the same
/// day of year, then of the same calendar month, then of the whole series.
/// Year-to-year trend is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalPattern;

/// Median lookups for one comuna, built from known values only
#[derive(Debug, Clone, Default)]
pub struct SeasonalProfile {
    by_day_of_year: HashMap<u32, f64>,
    by_month: HashMap<u32, f64>,
    overall: Option<f64>,
}

impl SeasonalProfile {
    pub fn build(records: &[SeriesRecord], indices: &[usize]) -> Self {
        let mut by_day: HashMap<u32, Vec<f64>> = HashMap::new();
        let mut by_month: HashMap<u32, Vec<f64>> = HashMap::new();
        let mut all = Vec::new();

        for &i in indices {
            let record = &records[i];
            if let Some(t) = record.temperature {
                let t = f64::from(t);
                by_day.entry(record.day_of_year()).or_default().push(t);
                by_month.entry(record.date.month()).or_default().push(t);
                all.push(t);
            }
        }

        let collapse = |groups: HashMap<u32, Vec<f64>>| -> HashMap<u32, f64> {
            groups
                .into_iter()
                .filter_map(|(key, mut values)| median(&mut values).map(|m| (key, m)))
                .collect()
        };

        Self {
            by_day_of_year: collapse(by_day),
            by_month: collapse(by_month),
            overall: median(&mut all),
        }
    }

    pub fn day_of_year_median(&self, day_of_year: u32) -> Option<f64> {
        self.by_day_of_year.get(&day_of_year).copied()
    }

    pub fn month_median(&self, month: u32) -> Option<f64> {
        self.by_month.get(&month).copied()
    }

    pub fn overall_median(&self) -> Option<f64> {
        self.overall
    }

    /// Value for a missing row, falling back day → month → overall
    pub fn estimate(&self, record: &SeriesRecord) -> Option<f64> {
        self.day_of_year_median(record.day_of_year())
            .or_else(|| self.month_median(record.date.month()))
            .or(self.overall)
    }
}

impl SeasonalPattern {
    pub fn new() -> Self {
        Self
    }

    fn fill_comuna(&self, records: &[SeriesRecord], indices: &[usize]) -> Vec<(usize, f32)> {
        let profile = SeasonalProfile::build(records, indices);
        if profile.overall_median().is_none() {
            return Vec::new();
        }

        indices
            .iter()
            .filter(|&&i| records[i].is_missing())
            .filter_map(|&i| profile.estimate(&records[i]).map(|v| (i, v as f32)))
            .collect()
    }
}

impl GapFiller for SeasonalPattern {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn fill(&self, records: &[SeriesRecord]) -> Vec<(usize, f32)> {
        group_by_comuna(records)
            .par_iter()
            .flat_map_iter(|(_, indices)| self.fill_comuna(records, indices))
            .collect()
    }
}
