use crate::models::ComunaSeries;
use crate::reconstruction::grouping::{chronological, group_by_comuna};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct GapReport {
    pub total_records: usize,
    pub missing_records: usize,
    pub comuna_statistics: Vec<ComunaGapStatistics>,
    pub gaps: Vec<Gap>,
}

/// A run of consecutive missing days in one comuna, in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    pub comuna: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub len: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComunaGapStatistics {
    pub comuna: String,
    pub total_records: usize,
    pub missing_records: usize,
    pub longest_gap: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ComunaGapStatistics {
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_records, self.total_records)
    }

    /// No value at all; no strategy can fill this comuna
    pub fn is_fully_missing(&self) -> bool {
        self.total_records > 0 && self.missing_records == self.total_records
    }
}

impl GapReport {
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_records, self.total_records)
    }

    pub fn longest_gap(&self) -> Option<&Gap> {
        self.gaps.iter().max_by(|a, b| a.len.cmp(&b.len).then(b.start.cmp(&a.start)))
    }
}

/// Missing-value counts before and after reconstruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionComparison {
    pub missing_before: usize,
    pub missing_after: usize,
}

impl ReconstructionComparison {
    pub fn filled(&self) -> usize {
        self.missing_before.saturating_sub(self.missing_after)
    }

    pub fn reduction_percentage(&self) -> f64 {
        if self.missing_before == 0 {
            return 0.0;
        }
        100.0 * self.filled() as f64 / self.missing_before as f64
    }
}

pub struct GapAnalyzer {
    max_listed_gaps: usize,
}

impl GapAnalyzer {
    pub fn new() -> Self {
        Self {
            max_listed_gaps: 10,
        }
    }

    pub fn with_max_listed_gaps(mut self, max_listed_gaps: usize) -> Self {
        self.max_listed_gaps = max_listed_gaps;
        self
    }

    /// Count nulls per comuna and locate every run of them
    pub fn analyze(&self, series: &ComunaSeries) -> GapReport {
        let records = series.records();
        let mut report = GapReport {
            total_records: records.len(),
            missing_records: series.missing_count(),
            comuna_statistics: Vec::new(),
            gaps: Vec::new(),
        };

        for (comuna, indices) in group_by_comuna(records) {
            let ordered = chronological(records, &indices);
            let mut stats = ComunaGapStatistics {
                comuna: comuna.to_string(),
                total_records: ordered.len(),
                first_date: ordered.first().map(|&i| records[i].date),
                last_date: ordered.last().map(|&i| records[i].date),
                ..Default::default()
            };

            let mut open: Option<Gap> = None;
            for &index in &ordered {
                let record = &records[index];
                if record.is_missing() {
                    stats.missing_records += 1;
                    match open.as_mut() {
                        Some(gap) => {
                            gap.end = record.date;
                            gap.len += 1;
                        }
                        None => {
                            open = Some(Gap {
                                comuna: comuna.to_string(),
                                start: record.date,
                                end: record.date,
                                len: 1,
                            });
                        }
                    }
                } else if let Some(gap) = open.take() {
                    stats.longest_gap = stats.longest_gap.max(gap.len);
                    report.gaps.push(gap);
                }
            }

            if let Some(gap) = open.take() {
                stats.longest_gap = stats.longest_gap.max(gap.len);
                report.gaps.push(gap);
            }

            report.comuna_statistics.push(stats);
        }

        report
    }

    pub fn compare(&self, before: &ComunaSeries, after: &ComunaSeries) -> ReconstructionComparison {
        ReconstructionComparison {
            missing_before: before.missing_count(),
            missing_after: after.missing_count(),
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &GapReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Gap Report ===\n");
        summary.push_str(&format!("Comunas: {}\n", report.comuna_statistics.len()));
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Missing Records: {} ({:.1}%)\n",
            report.missing_records,
            report.missing_percentage()
        ));
        summary.push_str(&format!("Gaps: {}\n", report.gaps.len()));

        let empty: Vec<&str> = report
            .comuna_statistics
            .iter()
            .filter(|s| s.is_fully_missing())
            .map(|s| s.comuna.as_str())
            .collect();
        if !empty.is_empty() {
            summary.push_str(&format!("Comunas without any value: {}\n", empty.join(", ")));
        }

        if !report.comuna_statistics.is_empty() {
            summary.push_str("\nPer Comuna:\n");
            for stats in &report.comuna_statistics {
                summary.push_str(&format!(
                    "  {}: {} / {} missing ({:.1}%), longest gap {} days\n",
                    stats.comuna,
                    stats.missing_records,
                    stats.total_records,
                    stats.missing_percentage(),
                    stats.longest_gap
                ));
            }
        }

        if !report.gaps.is_empty() && self.max_listed_gaps > 0 {
            let mut longest: Vec<&Gap> = report.gaps.iter().collect();
            longest.sort_by(|a, b| b.len.cmp(&a.len));

            summary.push_str(&format!("\nTop {} Gaps:\n", self.max_listed_gaps));
            for (i, gap) in longest.iter().take(self.max_listed_gaps).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} from {} to {} ({} days)\n",
                    i + 1,
                    gap.comuna,
                    gap.start,
                    gap.end,
                    gap.len
                ));
            }
        }

        summary
    }

    pub fn summarize_comparison(&self, comparison: &ReconstructionComparison) -> String {
        format!(
            "Missing values: {} before, {} after ({} filled, {:.1}% reduction)",
            comparison.missing_before,
            comparison.missing_after,
            comparison.filled(),
            comparison.reduction_percentage()
        )
    }
}

impl Default for GapAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::fixtures::daily;
    use pretty_assertions::assert_eq;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_gap_runs_are_located() {
        let series = ComunaSeries::new(daily(
            "Lampa",
            jan(1),
            &[None, Some(12.0), None, None, None, Some(15.0), None],
        ));

        let report = GapAnalyzer::new().analyze(&series);

        assert_eq!(report.total_records, 7);
        assert_eq!(report.missing_records, 5);
        assert_eq!(
            report.gaps,
            vec![
                Gap { comuna: "Lampa".into(), start: jan(1), end: jan(1), len: 1 },
                Gap { comuna: "Lampa".into(), start: jan(3), end: jan(5), len: 3 },
                Gap { comuna: "Lampa".into(), start: jan(7), end: jan(7), len: 1 },
            ]
        );
        assert_eq!(report.comuna_statistics[0].longest_gap, 3);
        assert_eq!(report.longest_gap().map(|g| g.start), Some(jan(3)));
    }

    #[test]
    fn test_gaps_follow_dates_not_row_order() {
        let mut records = daily("Buin", jan(1), &[Some(10.0), None, None, Some(13.0)]);
        records.swap(0, 2);
        let series = ComunaSeries::new(records);

        let report = GapAnalyzer::new().analyze(&series);

        assert_eq!(report.gaps.len(), 1);
        assert_eq!((report.gaps[0].start, report.gaps[0].end), (jan(2), jan(3)));
    }

    #[test]
    fn test_statistics_per_comuna() {
        let mut records = daily("A", jan(1), &[Some(1.0), Some(2.0)]);
        records.extend(daily("B", jan(1), &[None, None]));
        let series = ComunaSeries::new(records);

        let report = GapAnalyzer::new().analyze(&series);

        assert_eq!(report.comuna_statistics.len(), 2);
        assert_eq!(report.comuna_statistics[0].missing_records, 0);
        assert!(!report.comuna_statistics[0].is_fully_missing());
        assert!(report.comuna_statistics[1].is_fully_missing());
        assert_eq!(report.comuna_statistics[1].last_date, Some(jan(2)));
        assert!((report.missing_percentage() - 50.0).abs() < 1e-9);

        let summary = GapAnalyzer::new().generate_summary(&report);
        assert!(summary.contains("Comunas without any value: B"));
    }

    #[test]
    fn test_comparison_reduction() {
        let before = ComunaSeries::new(daily("A", jan(1), &[None, None, None, None]));
        let after = ComunaSeries::new(daily("A", jan(1), &[Some(1.0), Some(1.0), Some(1.0), None]));

        let comparison = GapAnalyzer::new().compare(&before, &after);

        assert_eq!(comparison.filled(), 3);
        assert!((comparison.reduction_percentage() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_report() {
        let report = GapAnalyzer::new().analyze(&ComunaSeries::default());

        assert_eq!(report.total_records, 0);
        assert_eq!(report.missing_percentage(), 0.0);
        assert!(report.gaps.is_empty());
    }
}
