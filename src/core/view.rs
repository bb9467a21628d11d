use serde::Serialize;

use super::engine::monthly_rate;
use super::locale::{
    UNAVAILABLE, format_currency, format_integer, format_percent, format_years,
};
use super::types::{ProjectionInput, ProjectionResult};

/// Display-ready strings for one projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionView {
    pub months: String,
    pub years: String,
    pub future_value: String,
    pub passive_income: String,
    pub required_contribution: String,
    pub goal: String,
    pub tips: Vec<String>,
}

pub fn render_projection(input: &ProjectionInput, result: &ProjectionResult) -> ProjectionView {
    let goal = match result.gap {
        Some(gap) if input.has_goal() => format!(
            "Meta: {} • Gap: {}",
            format_currency(input.income_goal),
            format_currency(gap)
        ),
        _ => "Sem meta informada".to_string(),
    };

    ProjectionView {
        months: format_integer(u64::from(result.months)),
        years: format_years(result.months),
        future_value: format_currency(result.future_value),
        passive_income: format_currency(result.passive_income),
        required_contribution: result
            .required_contribution
            .map(format_currency)
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        goal,
        tips: advisory_tips(input, result),
    }
}

fn advisory_tips(input: &ProjectionInput, result: &ProjectionResult) -> Vec<String> {
    let mut tips = Vec::with_capacity(4);
    tips.push(format!(
        "Horizonte de {} anos ({} meses).",
        (f64::from(result.months) / 12.0).round(),
        result.months
    ));
    tips.push(format!(
        "Com {} por mês a {}% a.m. (~15% a.a.), você projeta {}.",
        format_currency(input.monthly_contribution),
        format_percent(monthly_rate()),
        format_currency(result.future_value)
    ));
    tips.push(format!(
        "Renda de {} a 0,6% a.m.",
        format_currency(result.passive_income)
    ));
    if input.has_goal() {
        let target = result.target_capital.unwrap_or(f64::NAN);
        tips.push(format!(
            "Para atingir renda de {} (capital alvo {}), o aporte mensal necessário seria {}.",
            format_currency(input.income_goal),
            format_currency(target),
            format_currency(result.required_contribution.unwrap_or(0.0))
        ));
    }
    tips
}
