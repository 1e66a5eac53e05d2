//! Fit records, run reports and tabular persistence.
//!
//! Purpose
//! -------
//! One [`FitRecord`] per (analysis, window) pair, aggregated in window
//! order into an [`AnalysisReport`]. The report is the whole user-visible
//! output of a run: it carries the failed-window count and writes the
//! successful rows as a CSV table with a column set that is stable across
//! runs, so downstream regression tests can diff output files directly.
//!
//! Conventions
//! -----------
//! - Failed windows are counted and logged but excluded from the persisted
//!   rows; their records are kept in memory for inspection.
//! - Lab-frame runs write under a distinct table name so simulation-frame
//!   and lab-frame results never collide.
use serde::Serialize;

use crate::analysis::errors::AnalysisResult;

/// Reference frame the analyzed field was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frame {
    Simulation,
    Lab,
}

impl Frame {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frame::Simulation => "sim",
            Frame::Lab => "lab",
        }
    }
}

/// One window's fit outcome: the fitted parameters on success, the guess
/// that seeded the attempt either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitRecord {
    pub window: usize,
    #[serde(skip)]
    pub guess: Vec<f64>,
    pub params: Vec<f64>,
    pub label: Option<&'static str>,
    pub success: bool,
}

impl FitRecord {
    pub fn success(window: usize, guess: Vec<f64>, params: Vec<f64>) -> FitRecord {
        FitRecord { window, guess, params, label: None, success: true }
    }

    pub fn failure(window: usize, guess: Vec<f64>) -> FitRecord {
        FitRecord { window, guess, params: Vec::new(), label: None, success: false }
    }

    pub fn with_label(mut self, label: &'static str) -> FitRecord {
        self.label = Some(label);
        self
    }
}

/// Ordered fit records of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub analysis: &'static str,
    pub frame: Frame,
    pub param_columns: &'static [&'static str],
    pub label_column: Option<&'static str>,
    pub records: Vec<FitRecord>,
}

impl AnalysisReport {
    /// Number of windows whose fit failed.
    pub fn n_failed(&self) -> usize {
        self.records.iter().filter(|r| !r.success).count()
    }

    /// Successful records in window order; these are the persisted rows.
    pub fn rows(&self) -> impl Iterator<Item = &FitRecord> {
        self.records.iter().filter(|r| r.success)
    }

    /// Stem for the output table, namespaced by frame:
    /// `perp_fit_sim`, `time_fit_lab`, ...
    pub fn table_name(&self) -> String {
        format!("{}_fit_{}", self.analysis, self.frame.as_str())
    }

    /// Write the successful rows as CSV.
    ///
    /// The header is `window`, then the per-analysis parameter columns,
    /// then the label column when the analysis carries one. The column set
    /// depends only on the analysis type, never on this run's data.
    ///
    /// Failed windows are excluded from the table rather than flagged in
    /// it: a failed window has no fitted parameters to put in the
    /// parameter columns, so presence in the table doubles as the success
    /// flag. The failure count is reported through
    /// [`AnalysisReport::n_failed`] and the in-memory records keep their
    /// per-window flags.
    ///
    /// # Errors
    /// [`crate::analysis::AnalysisError::Csv`] on any write failure.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> AnalysisResult<()> {
        let mut out = csv::WriterBuilder::new().from_writer(writer);

        let mut header = vec!["window"];
        header.extend_from_slice(self.param_columns);
        if let Some(label) = self.label_column {
            header.push(label);
        }
        out.write_record(&header)?;

        for record in self.rows() {
            let mut row = vec![record.window.to_string()];
            row.extend(record.params.iter().map(|p| p.to_string()));
            if self.label_column.is_some() {
                row.push(record.label.unwrap_or("").to_string());
            }
            out.write_record(&row)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AnalysisReport {
        AnalysisReport {
            analysis: "perp",
            frame: Frame::Simulation,
            param_columns: &["lx", "ly", "kx", "ky", "theta"],
            label_column: None,
            records: vec![
                FitRecord::success(0, vec![1.0; 5], vec![2.0, 3.0, 0.1, 2.1, 0.05]),
                FitRecord::failure(1, vec![1.0; 5]),
                FitRecord::success(2, vec![2.0; 5], vec![2.1, 3.1, 0.1, 2.0, 0.04]),
            ],
        }
    }

    #[test]
    fn failed_windows_are_counted_and_excluded_from_rows() {
        let report = report();
        assert_eq!(report.n_failed(), 1);
        let windows: Vec<usize> = report.rows().map(|r| r.window).collect();
        assert_eq!(windows, vec![0, 2]);
    }

    #[test]
    // Header stability: the column set depends on the analysis type only.
    fn csv_header_is_stable() {
        let mut buf = Vec::new();
        report().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "window,lx,ly,kx,ky,theta");
        // Two successful rows, none for the failed window.
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn labelled_report_appends_label_column() {
        let mut report = report();
        report.analysis = "time";
        report.param_columns = &["tau"];
        report.label_column = Some("flow");
        report.records = vec![
            FitRecord::success(0, vec![1.0, 10.0], vec![8.5]).with_label("stationary"),
        ];
        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next().unwrap(), "window,tau,flow");
        assert!(text.lines().nth(1).unwrap().ends_with(",stationary"));
    }

    #[test]
    fn table_name_is_namespaced_by_frame() {
        let mut report = report();
        assert_eq!(report.table_name(), "perp_fit_sim");
        report.frame = Frame::Lab;
        assert_eq!(report.table_name(), "perp_fit_lab");
    }
}
