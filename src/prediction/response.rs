//! Typed view of the prediction service's JSON payloads.
//!
//! Every field is optional on the wire; absent fields deserialize to empty
//! values so the presenter can omit dependent sections instead of failing.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

/// Threshold assumed when the service does not report one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Disease → probability pairs in the order the service listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbabilityMap(Vec<(String, f64)>);

impl ProbabilityMap {
    /// Build from pairs; a repeated key keeps its first position and takes the last value.
    #[cfg(test)]
    pub(crate) fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut map = Self::default();
        for (key, value) in pairs {
            map.insert(key.into(), value);
        }
        map
    }

    fn insert(&mut self, key: String, value: f64) {
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| *value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.0.first().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Pairs ordered by probability, highest first; ties keep service order.
    pub fn sorted_descending(&self) -> Vec<(String, f64)> {
        let mut pairs = self.0.clone();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }
}

impl<'de> Deserialize<'de> for ProbabilityMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ProbabilityMap;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of disease names to probabilities")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = ProbabilityMap(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((key, value)) = access.next_entry::<String, f64>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Successful `/predict` body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PredictionResponse {
    /// Diseases at or above the threshold.
    #[serde(default)]
    pub predictions: ProbabilityMap,
    /// Every class the model scored, when the service includes it.
    #[serde(default)]
    pub all_predictions: Option<ProbabilityMap>,
    /// Base64 PNG heatmaps keyed by disease.
    #[serde(default)]
    pub gradcam_images: HashMap<String, String>,
    /// Base64 PNG of the preprocessed input image.
    #[serde(default)]
    pub original_image: String,
    #[serde(default)]
    pub threshold_used: Option<f64>,
}

impl PredictionResponse {
    /// Disease shown when the user has not picked one.
    pub fn default_disease(&self) -> Option<&str> {
        self.predictions.first_key()
    }

    /// Full probability list sorted high to low, or `None` when not supplied.
    pub fn sorted_all_predictions(&self) -> Option<Vec<(String, f64)>> {
        self.all_predictions
            .as_ref()
            .map(ProbabilityMap::sorted_descending)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold_used.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn heatmap_for(&self, disease: &str) -> Option<&str> {
        self.gradcam_images
            .get(disease)
            .map(String::as_str)
            .filter(|encoded| !encoded.trim().is_empty())
    }

    /// Predicted diseases the service returned no heatmap for.
    pub fn missing_heatmaps(&self) -> Vec<&str> {
        self.predictions
            .keys()
            .filter(|disease| self.heatmap_for(disease).is_none())
            .collect()
    }
}

/// `/health` body.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub device: Option<String>,
}

impl ServiceHealth {
    pub fn is_ready(&self) -> bool {
        self.model_loaded && self.status.eq_ignore_ascii_case("healthy")
    }
}
