//! Input routing: decide which calculation a filled-in form asks for.
//!
//! A form carries four mutually exclusive groups. Rate and ratio groups need
//! the sample size; the counts group needs it left blank because the counts
//! already fix it.

use clap::Args as ClapArgs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    config::Settings,
    error::{EstimateError, Result},
    estimate::{Candidate, MetricPair, SearchQuery},
};

/// Raw user input, shared by the CLI flags and the JSON API body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ClapArgs)]
#[serde(default, deny_unknown_fields)]
pub struct InputForm {
    /// Total sample size n.
    #[arg(short = 'n', long = "sample-size")]
    pub sample_size: Option<f64>,
    /// Subjects with the condition (TP + FN); 0 is a real constraint.
    #[arg(long, allow_negative_numbers = true)]
    pub diseased: Option<f64>,
    /// Reported sensitivity, 0-1.
    #[arg(long)]
    pub sensitivity: Option<f64>,
    /// Reported specificity, 0-1.
    #[arg(long)]
    pub specificity: Option<f64>,
    /// Reported positive predictive value, 0-1.
    #[arg(long)]
    pub ppv: Option<f64>,
    /// Reported negative predictive value, 0-1.
    #[arg(long)]
    pub npv: Option<f64>,
    /// Reported positive likelihood ratio.
    #[arg(long)]
    pub plr: Option<f64>,
    /// Reported negative likelihood ratio.
    #[arg(long)]
    pub nlr: Option<f64>,
    /// True positives.
    #[arg(long = "tp")]
    #[serde(rename = "tp")]
    pub true_pos: Option<f64>,
    /// True negatives.
    #[arg(long = "tn")]
    #[serde(rename = "tn")]
    pub true_neg: Option<f64>,
    /// False positives.
    #[arg(long = "fp")]
    #[serde(rename = "fp")]
    pub false_pos: Option<f64>,
    /// False negatives.
    #[arg(long = "fn")]
    #[serde(rename = "fn")]
    pub false_neg: Option<f64>,
    /// Total error at or below which a candidate counts as an exact match.
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// A validated calculation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    /// Back-solve counts from a metric pair.
    Estimate { pair: MetricPair, query: SearchQuery },
    /// Forward conversion of known counts.
    Counts(Candidate),
}

#[derive(Debug, Clone, Copy)]
enum Group {
    Rates(MetricPair, [Option<f64>; 2]),
    Counts([Option<f64>; 4]),
}

impl Group {
    fn name(&self) -> &'static str {
        match self {
            Self::Rates(MetricPair::SensitivitySpecificity, _) => "sensitivity & specificity",
            Self::Rates(MetricPair::PpvNpv, _) => "PPV & NPV",
            Self::Rates(MetricPair::LikelihoodRatios, _) => "PLR & NLR",
            Self::Counts(_) => "TP, TN, FP, FN",
        }
    }

    fn touched(&self) -> bool {
        match self {
            Self::Rates(_, values) => values.iter().any(Option::is_some),
            Self::Counts(values) => values.iter().any(Option::is_some),
        }
    }
}

impl InputForm {
    /// Validate the form and pick the single calculation it describes.
    ///
    /// Counts and sample sizes must be whole numbers; fractional values are
    /// rejected, never truncated.
    pub fn resolve(&self, settings: &Settings) -> Result<Request> {
        let groups = [
            Group::Rates(
                MetricPair::SensitivitySpecificity,
                [self.sensitivity, self.specificity],
            ),
            Group::Rates(MetricPair::PpvNpv, [self.ppv, self.npv]),
            Group::Rates(MetricPair::LikelihoodRatios, [self.plr, self.nlr]),
            Group::Counts([self.true_pos, self.true_neg, self.false_pos, self.false_neg]),
        ];
        let touched: Vec<Group> = groups.into_iter().filter(Group::touched).collect();
        let group = match touched.as_slice() {
            [] => return Err(EstimateError::NoInputGroup),
            [single] => *single,
            many => {
                let names: Vec<&str> = many.iter().map(Group::name).collect();
                return Err(EstimateError::AmbiguousInput(names.join(", ")));
            }
        };

        match group {
            Group::Rates(pair, [Some(a), Some(b)]) => self.estimate_request(settings, pair, a, b),
            Group::Rates(..) => Err(EstimateError::InvalidInput(format!(
                "{} needs both values",
                group.name()
            ))),
            Group::Counts([Some(tp), Some(tn), Some(fp), Some(fneg)]) => {
                self.counts_request([("TP", tp), ("TN", tn), ("FP", fp), ("FN", fneg)])
            }
            Group::Counts(_) => Err(EstimateError::InvalidInput(
                "TP, TN, FP and FN must all be given".into(),
            )),
        }
    }

    fn estimate_request(
        &self,
        settings: &Settings,
        pair: MetricPair,
        target_a: f64,
        target_b: f64,
    ) -> Result<Request> {
        let (label_a, label_b) = pair.labels();
        check_target(pair, label_a, target_a)?;
        check_target(pair, label_b, target_b)?;

        let sample_size = self.sample_size.ok_or_else(|| {
            EstimateError::InvalidInput(format!("sample size n is required with {pair}"))
        })?;
        let sample_size = whole_number("n", sample_size)?;
        if sample_size < 0 {
            return Err(EstimateError::InvalidInput(
                "sample size n must not be negative".into(),
            ));
        }
        if sample_size > i64::from(settings.max_sample_size) {
            return Err(EstimateError::SampleSizeLimit {
                requested: sample_size as u64,
                limit: settings.max_sample_size,
            });
        }

        let disease_count = self
            .diseased
            .map(|value| whole_number("n pathology", value))
            .transpose()?;

        let tolerance = self.threshold.unwrap_or(settings.default_tolerance);
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(EstimateError::InvalidInput(
                "threshold must be a nonnegative number".into(),
            ));
        }

        let query = SearchQuery::new(target_a, target_b, sample_size as u32)
            .with_tolerance(tolerance)
            .with_disease_count(disease_count);
        Ok(Request::Estimate { pair, query })
    }

    fn counts_request(&self, cells: [(&'static str, f64); 4]) -> Result<Request> {
        if self.sample_size.is_some() {
            return Err(EstimateError::AmbiguousInput(
                "TP, TN, FP, FN already fix n; leave the sample size blank".into(),
            ));
        }
        if self.diseased.is_some() {
            warn!("ignoring n pathology for a counts conversion");
        }
        let mut counts = [0u32; 4];
        for (slot, (field, value)) in counts.iter_mut().zip(cells) {
            let whole = whole_number(field, value)?;
            *slot = u32::try_from(whole).map_err(|_| {
                EstimateError::InvalidInput(format!("{field} must be between 0 and {}", u32::MAX))
            })?;
        }
        let [tp, tn, fp, fneg] = counts;
        Ok(Request::Counts(Candidate::new(tp, tn, fp, fneg)))
    }
}

/// Largest integer every f64 below it represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn whole_number(field: &'static str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_INTEGER {
        return Err(EstimateError::NotAnInteger { field, value });
    }
    Ok(value as i64)
}

fn check_target(pair: MetricPair, label: &str, value: f64) -> Result<()> {
    let valid = match pair {
        MetricPair::SensitivitySpecificity | MetricPair::PpvNpv => (0.0..=1.0).contains(&value),
        MetricPair::LikelihoodRatios => value >= 0.0,
    };
    if valid {
        Ok(())
    } else {
        Err(EstimateError::InvalidInput(format!(
            "{label} is out of range: {value}"
        )))
    }
}
