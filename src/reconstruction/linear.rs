use crate::models::SeriesRecord;
use crate::reconstruction::grouping::{chronological, group_by_comuna};
use crate::reconstruction::GapFiller;
use chrono::Datelike;
use rayon::prelude::*;

/// Temporal linear interpolation, one comuna at a time.
///
/// Interior gaps are interpolated against the date axis. Leading gaps take
/// the first known value and trailing gaps the last one. A comuna with no
/// known value stays entirely missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolation;

impl LinearInterpolation {
    pub fn new() -> Self {
        Self
    }

    fn fill_comuna(&self, records: &[SeriesRecord], indices: &[usize]) -> Vec<(usize, f32)> {
        let ordered = chronological(records, indices);
        let values: Vec<Option<f64>> = ordered
            .iter()
            .map(|&i| records[i].temperature.map(f64::from))
            .collect();

        if values.iter().all(Option::is_none) {
            return Vec::new();
        }

        // Nearest known position on each side
        let mut previous = vec![None; values.len()];
        let mut last = None;
        for (pos, value) in values.iter().enumerate() {
            if value.is_some() {
                last = Some(pos);
            }
            previous[pos] = last;
        }

        let mut next = vec![None; values.len()];
        let mut upcoming = None;
        for (pos, value) in values.iter().enumerate().rev() {
            if value.is_some() {
                upcoming = Some(pos);
            }
            next[pos] = upcoming;
        }

        let day = |pos: usize| records[ordered[pos]].date.num_days_from_ce() as f64;

        let mut fills = Vec::new();
        for (pos, value) in values.iter().enumerate() {
            if value.is_some() {
                continue;
            }

            let filled = match (previous[pos], next[pos]) {
                (Some(p), Some(n)) => {
                    let (v0, v1) = (values[p].unwrap_or_default(), values[n].unwrap_or_default());
                    let span = day(n) - day(p);
                    if span <= 0.0 {
                        v0
                    } else {
                        v0 + (v1 - v0) * (day(pos) - day(p)) / span
                    }
                }
                (Some(p), None) => values[p].unwrap_or_default(),
                (None, Some(n)) => values[n].unwrap_or_default(),
                (None, None) => continue,
            };

            fills.push((ordered[pos], filled as f32));
        }

        fills
    }
}

impl GapFiller for LinearInterpolation {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn fill(&self, records: &[SeriesRecord]) -> Vec<(usize, f32)> {
        group_by_comuna(records)
            .par_iter()
            .flat_map_iter(|(_, indices)| self.fill_comuna(records, indices))
            .collect()
    }
}
