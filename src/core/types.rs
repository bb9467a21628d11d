use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::{horizon_months, validate_ages};
use super::locale::parse_number;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub age_now: u32,
    pub age_retire: u32,
    pub present_value: f64,
    pub monthly_contribution: f64,
    /// Zero means no goal was given.
    pub income_goal: f64,
}

impl ProjectionInput {
    pub fn has_goal(&self) -> bool {
        self.income_goal > 0.0
    }
}

impl TryFrom<&InputRecord> for ProjectionInput {
    type Error = ProjectionError;

    /// Ages are floored to whole years and must form a valid horizon.
    /// Amounts that do not parse, or parse negative, read as zero.
    fn try_from(record: &InputRecord) -> Result<Self, Self::Error> {
        let age_now = parse_number(&record.age_now).floor();
        let age_retire = parse_number(&record.age_retire).floor();
        let (whole_now, whole_retire) = validate_ages(age_now, age_retire)?;
        horizon_months(age_now, age_retire)?;

        Ok(Self {
            age_now: whole_now,
            age_retire: whole_retire,
            present_value: parse_amount(&record.pv),
            monthly_contribution: parse_amount(&record.pmt),
            income_goal: parse_amount(&record.income_goal),
        })
    }
}

fn parse_amount(text: &str) -> f64 {
    let value = parse_number(text);
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub months: u32,
    pub future_value: f64,
    pub passive_income: f64,
    pub target_capital: Option<f64>,
    pub required_contribution: Option<f64>,
    pub gap: Option<f64>,
}

/// Raw form values exactly as typed, keyed the way they are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    #[serde(alias = "ageNow")]
    pub age_now: String,
    #[serde(alias = "ageRetire")]
    pub age_retire: String,
    #[serde(alias = "presentValue")]
    pub pv: String,
    #[serde(alias = "monthlyContribution")]
    pub pmt: String,
    #[serde(alias = "incomeGoal")]
    pub income_goal: String,
}

impl InputRecord {
    pub fn is_empty(&self) -> bool {
        [
            &self.age_now,
            &self.age_retire,
            &self.pv,
            &self.pmt,
            &self.income_goal,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("Preencha idades válidas (a aposentadoria deve ser maior que a idade atual).")]
    InvalidHorizon { age_now: f64, age_retire: f64 },
}
