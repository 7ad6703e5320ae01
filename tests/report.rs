use confusion_estimator::{
    estimate::{metrics_from_counts, search, Candidate, MetricPair, SearchQuery},
    report::{self, MetricsTable, ResultsTable, SummaryView},
};

#[test]
fn csv_export_writes_every_row_with_pair_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/sens_spec.csv");
    let results = search(
        &SearchQuery::new(0.5, 0.5, 4),
        &MetricPair::SensitivitySpecificity,
    );
    report::export_csv(&path, MetricPair::SensitivitySpecificity, &results).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        [
            "TP",
            "TN",
            "FP",
            "FN",
            "Calculated_Sensitivity",
            "Calculated_Specificity",
            "Sensitivity_Error",
            "Specificity_Error",
            "Total_Error",
            "Exact_Match"
        ]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 35);
    assert_eq!(records[0].iter().take(4).collect::<Vec<_>>(), ["1", "1", "1", "1"]);
    assert_eq!(&records[0][9], "true");
}

#[test]
fn likelihood_ratio_csv_keeps_infinities() {
    let results = search(&SearchQuery::new(5.0, 0.2, 1), &MetricPair::LikelihoodRatios);
    let mut buffer = Vec::new();
    report::write_csv(&mut buffer, MetricPair::LikelihoodRatios, &results).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("TP,TN,FP,FN,Calculated_PLR,Calculated_NLR,PLR_Error,NLR_Error"));
    assert!(text.contains("inf"));
}

#[test]
fn empty_results_render_a_message() {
    let results = search(
        &SearchQuery::new(0.5, 0.5, 10).with_disease_count(Some(15)),
        &MetricPair::SensitivitySpecificity,
    );
    let table = ResultsTable {
        pair: MetricPair::SensitivitySpecificity,
        results: &results,
        top_k: 10,
    };
    assert_eq!(table.to_string(), "no candidates found\n");
    assert_eq!(SummaryView(&results).to_string(), "");
}

#[test]
fn table_shows_top_k_rows() {
    let results = search(&SearchQuery::new(0.9, 0.9, 6), &MetricPair::PpvNpv);
    let rendered = ResultsTable {
        pair: MetricPair::PpvNpv,
        results: &results,
        top_k: 3,
    }
    .to_string();
    assert_eq!(rendered.lines().count(), 4);
    assert!(rendered.lines().next().unwrap().contains("PPV"));
    assert!(SummaryView(&results).to_string().contains("combinations tested: 84"));
}

#[test]
fn metrics_table_lists_all_six_metrics() {
    let counts = Candidate::new(0, 5, 0, 0);
    let metrics = metrics_from_counts(&counts);
    let rendered = MetricsTable {
        counts: &counts,
        metrics: &metrics,
    }
    .to_string();
    for label in ["Sensitivity", "Specificity", "PPV", "NPV", "+LR", "-LR"] {
        assert!(rendered.contains(label), "missing {label}");
    }
    assert!(rendered.contains("inf"));
}
