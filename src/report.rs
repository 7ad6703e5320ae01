//! Plain-text tables and CSV export for search results.

use std::{
    fmt,
    fs::File,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::estimate::{Candidate, DiagnosticMetrics, MetricPair, ResultSet};

/// The lowest-error rows of a result set as an aligned table.
pub struct ResultsTable<'a> {
    pub pair: MetricPair,
    pub results: &'a ResultSet,
    pub top_k: usize,
}

impl fmt::Display for ResultsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            return writeln!(f, "no candidates found");
        }
        let (a, b) = self.pair.labels();
        writeln!(
            f,
            "{:>4} {:>6} {:>6} {:>6} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12}  exact",
            "rank", "TP", "TN", "FP", "FN", a, b, "err", "err", "total"
        )?;
        for (rank, row) in self.results.top(self.top_k).iter().enumerate() {
            let c = &row.candidate;
            writeln!(
                f,
                "{:>4} {:>6} {:>6} {:>6} {:>6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}  {}",
                rank + 1,
                c.true_pos,
                c.true_neg,
                c.false_pos,
                c.false_neg,
                row.calculated_a,
                row.calculated_b,
                row.error_a,
                row.error_b,
                row.total_error,
                if row.exact_match { "yes" } else { "" }
            )?;
        }
        Ok(())
    }
}

/// Headline error statistics.
pub struct SummaryView<'a>(pub &'a ResultSet);

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(summary) = self.0.summary() else {
            return Ok(());
        };
        writeln!(f, "combinations tested: {}", summary.candidates)?;
        writeln!(f, "exact matches:       {}", summary.exact_matches)?;
        writeln!(f, "best total error:    {:.8}", summary.best)?;
        writeln!(f, "mean total error:    {:.8}", summary.mean)?;
        writeln!(f, "median total error:  {:.8}", summary.median)?;
        if !self.0.is_complete() {
            writeln!(f, "search was cancelled; results are partial")?;
        }
        Ok(())
    }
}

/// All six point metrics for a set of counts.
pub struct MetricsTable<'a> {
    pub counts: &'a Candidate,
    pub metrics: &'a DiagnosticMetrics,
}

impl fmt::Display for MetricsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.counts;
        writeln!(
            f,
            "TP {}  TN {}  FP {}  FN {}",
            c.true_pos, c.true_neg, c.false_pos, c.false_neg
        )?;
        for (label, value) in self.metrics.ordered() {
            writeln!(f, "{label:<12} {value:.6}")?;
        }
        Ok(())
    }
}

/// Write every row of a result set as CSV with pair-specific headers.
pub fn write_csv<W: Write>(writer: W, pair: MetricPair, results: &ResultSet) -> Result<()> {
    let (a, b) = pair.labels();
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "TP".to_string(),
        "TN".to_string(),
        "FP".to_string(),
        "FN".to_string(),
        format!("Calculated_{a}"),
        format!("Calculated_{b}"),
        format!("{a}_Error"),
        format!("{b}_Error"),
        "Total_Error".to_string(),
        "Exact_Match".to_string(),
    ])?;
    for row in results.rows() {
        let c = &row.candidate;
        csv.write_record([
            c.true_pos.to_string(),
            c.true_neg.to_string(),
            c.false_pos.to_string(),
            c.false_neg.to_string(),
            row.calculated_a.to_string(),
            row.calculated_b.to_string(),
            row.error_a.to_string(),
            row.error_b.to_string(),
            row.total_error.to_string(),
            row.exact_match.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Export a result set to `path`, creating parent folders as needed.
pub fn export_csv(path: &Path, pair: MetricPair, results: &ResultSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, pair, results)?;
    info!(path = %path.display(), rows = results.len(), "wrote ranked candidates");
    Ok(())
}
