use log::debug;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::dataset::MenuItem;

/// Upper bound on how many items a single recommendation returns.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Caller-supplied constraints for one recommendation request. Empty
/// lists mean "no constraint". The price bounds stay as raw JSON values
/// here because a malformed bound (`"abc"`, a negative number) must be
/// ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub food_types: Vec<String>,
    pub cuisines: Vec<String>,
    pub min_price: Option<Value>,
    pub max_price: Option<Value>,
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("menu dataset is empty or was not loaded")]
    DatasetUnavailable,
}

/// Interpret a price bound leniently: numbers and numeric strings are
/// accepted when finite and non-negative, everything else counts as "no
/// bound".
fn numeric_bound(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite() && *p >= 0.0)
}

/// Filter the dataset by the caller's constraints and draw a uniform
/// random sample, without replacement, of at most
/// [`MAX_RECOMMENDATIONS`] items. Every call re-samples independently.
/// An empty candidate set is a normal empty result; only a missing
/// dataset is an error.
pub fn recommend<'a>(
    items: &'a [MenuItem],
    spec: &FilterSpec,
) -> Result<Vec<&'a MenuItem>, RecommendError> {
    if items.is_empty() {
        return Err(RecommendError::DatasetUnavailable);
    }

    let min_price = numeric_bound(spec.min_price.as_ref());
    let max_price = numeric_bound(spec.max_price.as_ref());

    let candidates: Vec<&MenuItem> = items
        .iter()
        .filter(|item| {
            spec.food_types.is_empty()
                || spec.food_types.iter().any(|ft| ft.as_str() == item.food_type.as_str())
        })
        .filter(|item| spec.cuisines.is_empty() || spec.cuisines.contains(&item.cuisine))
        .filter(|item| min_price.map_or(true, |min| item.price >= min))
        .filter(|item| max_price.map_or(true, |max| item.price <= max))
        .collect();

    debug!(
        "{} of {} items match the filter (min_price: {:?}, max_price: {:?})",
        candidates.len(),
        items.len(),
        min_price,
        max_price
    );

    let picks = candidates
        .choose_multiple(&mut rand::thread_rng(), MAX_RECOMMENDATIONS)
        .copied()
        .collect();
    Ok(picks)
}
