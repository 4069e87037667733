//! Main-detector results query over a run-number range.

use crate::error::MollerDbError;
use crate::types::RowValues;

/// Per-subblock main-detector results for every runlet in the run range.
///
/// `$1`/`$2` bound the run number (inclusive), `$3` selects the detector by its
/// `main_detector.quantity` name.
pub const MAIN_DETECTOR_RESULTS_SQL: &str = "\
SELECT r.run_number, rl.segment_number, md.subblock, md.n, md.value, md.error
FROM md_data md
JOIN main_detector d ON d.main_detector_id = md.main_detector_id
JOIN analysis a ON a.analysis_id = md.analysis_id
JOIN runlet rl ON rl.runlet_id = a.runlet_id
JOIN run r ON r.run_id = rl.run_id
WHERE r.run_number BETWEEN $1 AND $2
  AND d.quantity = $3
ORDER BY r.run_number, rl.segment_number, md.subblock";

/// A validated request for main-detector results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorQuery {
    start_run: i32,
    end_run: i32,
    detector: String,
}

impl DetectorQuery {
    /// # Errors
    /// Returns `MollerDbError::InvalidQuery` for a negative start run, an inverted
    /// range, or a blank detector name.
    pub fn new(start_run: i32, end_run: i32, detector: &str) -> Result<Self, MollerDbError> {
        if start_run < 0 {
            return Err(MollerDbError::InvalidQuery(format!(
                "start run {start_run} is negative"
            )));
        }
        if start_run > end_run {
            return Err(MollerDbError::InvalidQuery(format!(
                "start run {start_run} is after end run {end_run}"
            )));
        }
        let detector = detector.trim();
        if detector.is_empty() {
            return Err(MollerDbError::InvalidQuery(
                "detector name is empty".to_string(),
            ));
        }
        Ok(DetectorQuery {
            start_run,
            end_run,
            detector: detector.to_string(),
        })
    }

    #[must_use]
    pub fn start_run(&self) -> i32 {
        self.start_run
    }

    #[must_use]
    pub fn end_run(&self) -> i32 {
        self.end_run
    }

    #[must_use]
    pub fn detector(&self) -> &str {
        &self.detector
    }

    #[must_use]
    pub fn sql(&self) -> &'static str {
        MAIN_DETECTOR_RESULTS_SQL
    }

    /// Bind parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(i64::from(self.start_run)),
            RowValues::Int(i64::from(self.end_run)),
            RowValues::Text(self.detector.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_params_in_placeholder_order() {
        let query = DetectorQuery::new(5408, 5410, " mdallbars ").unwrap();
        assert_eq!(query.detector(), "mdallbars");
        assert_eq!(
            query.params(),
            vec![
                RowValues::Int(5408),
                RowValues::Int(5410),
                RowValues::Text("mdallbars".into()),
            ]
        );
    }

    #[test]
    fn single_run_range_is_allowed() {
        assert!(DetectorQuery::new(7, 7, "md1").is_ok());
    }

    #[test]
    fn rejects_bad_ranges_and_names() {
        for (start, end, name) in [(10, 9, "md1"), (-1, 5, "md1"), (1, 2, "  ")] {
            assert!(matches!(
                DetectorQuery::new(start, end, name),
                Err(MollerDbError::InvalidQuery(_))
            ));
        }
    }

    #[test]
    fn detector_is_bound_not_interpolated() {
        let query = DetectorQuery::new(1, 2, "x'; DROP TABLE run; --").unwrap();
        assert!(!query.sql().contains("DROP"));
        assert_eq!(query.sql().matches('$').count(), 3);
    }
}
