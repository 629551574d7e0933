//! Group indices over a series: each group is an ordered list of row
//! indices into the original record slice, so groups can be processed
//! independently and their results written back by index.

use crate::models::SeriesRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Row indices per comuna, comunas in first-seen order, rows in input order
pub fn group_by_comuna(records: &[SeriesRecord]) -> Vec<(&str, Vec<usize>)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let comuna = record.comuna.as_str();
        let slot = *position.entry(comuna).or_insert_with(|| {
            groups.push((comuna, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(index);
    }

    groups
}

/// Row indices per date, dates ascending, rows in input order
pub fn group_by_date(records: &[SeriesRecord]) -> BTreeMap<NaiveDate, Vec<usize>> {
    let mut groups: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        groups.entry(record.date).or_default().push(index);
    }
    groups
}

/// Indices sorted chronologically; equal dates keep their input order
pub fn chronological(records: &[SeriesRecord], indices: &[usize]) -> Vec<usize> {
    let mut ordered = indices.to_vec();
    ordered.sort_by_key(|&i| records[i].date);
    ordered
}

/// Median of a sample; the mean of the two middle values for even sizes
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
