//! Helpers to convert prediction data into egui-facing view structs.

use crate::prediction::PredictionResponse;

/// One card in the "Detected Conditions" grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionCardView {
    pub disease: String,
    pub label: String,
    /// Bar fill in `[0, 1]`.
    pub fraction: f32,
    pub selected: bool,
    pub has_heatmap: bool,
}

/// One row of the expandable full-probability list.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityRowView {
    pub disease: String,
    pub label: String,
    pub fraction: f32,
    pub predicted: bool,
}

/// Confidence label with one decimal, e.g. `0.873` → `87.3%`.
pub fn percent_label(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Two-decimal label used in the full-probability list.
pub fn detail_percent_label(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Threshold badge text, e.g. `0.5` → `≥50%`.
pub fn threshold_badge(threshold: f64) -> String {
    format!("≥{}%", (threshold * 100.0).round() as i64)
}

/// Bar fill for painting; the only place probabilities narrow to `f32`.
pub fn bar_fraction(probability: f64) -> f32 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Placeholder shown in the heatmap frame when no heatmap could be shown.
pub fn missing_heatmap_label(disease: &str) -> String {
    format!("No heatmap available for {disease}")
}

pub fn all_predictions_toggle_label(expanded: bool, count: usize) -> String {
    if expanded {
        "Hide all predictions".to_string()
    } else {
        format!("Show all predictions ({count})")
    }
}

/// Disease whose heatmap is on screen: the explicit pick, else the first prediction.
pub fn display_disease<'a>(
    response: &'a PredictionResponse,
    selected: Option<&'a str>,
) -> Option<&'a str> {
    selected.or_else(|| response.default_disease())
}

/// Build cards for every predicted disease in service order.
pub fn prediction_cards(
    response: &PredictionResponse,
    display: Option<&str>,
) -> Vec<PredictionCardView> {
    response
        .predictions
        .iter()
        .map(|(disease, probability)| PredictionCardView {
            disease: disease.to_string(),
            label: percent_label(probability),
            fraction: bar_fraction(probability),
            selected: display == Some(disease),
            has_heatmap: response.heatmap_for(disease).is_some(),
        })
        .collect()
}

/// Sorted rows for the full-probability panel, or `None` when the service sent none.
pub fn all_prediction_rows(response: &PredictionResponse) -> Option<Vec<ProbabilityRowView>> {
    response.sorted_all_predictions().map(|pairs| {
        pairs
            .into_iter()
            .map(|(disease, probability)| ProbabilityRowView {
                label: detail_percent_label(probability),
                fraction: bar_fraction(probability),
                predicted: response.predictions.contains_key(&disease),
                disease,
            })
            .collect()
    })
}
