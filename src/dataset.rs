use log::{info, warn};
use serde::Serialize;
use std::path::Path;

use crate::classifier::{self, FoodType};

/// Placeholder for a missing text field; keeps the row usable instead
/// of dropping it.
pub const UNKNOWN: &str = "Unknown";

/// One cleaned, labeled menu row. Field names on the wire follow the
/// dataset's column headers so existing consumers keep working.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    #[serde(rename = "Item_Name")]
    pub item_name: String,
    #[serde(rename = "Restaurant_Name")]
    pub restaurant_name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Food Type")]
    pub food_type: FoodType,
    #[serde(rename = "Cuisine")]
    pub cuisine: String,
    #[serde(rename = "Area", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// The full menu collection, loaded once at startup and read-only
/// afterwards. An empty dataset means the load failed and the service
/// is degraded.
#[derive(Debug, Default)]
pub struct Dataset {
    items: Vec<MenuItem>,
}

impl Dataset {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Dataset { items }
    }

    pub fn empty() -> Self {
        Dataset::default()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Reduce a scraped price cell ("₹250", "250.50 for one") to a finite
/// non-negative number. Strips everything that is not an ASCII digit or
/// a dot before parsing; `None` means the row is unusable.
pub fn clean_price(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    let price = digits.parse::<f64>().ok()?;
    if price.is_finite() && price >= 0.0 {
        Some(price)
    } else {
        None
    }
}

fn clean_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Load and clean the menu CSV.
///
/// Required columns: `Item_Name`, `Restaurant_Name`, `Price`; `Area` is
/// optional pass-through metadata. Pre-labeled `Food Type` / `Cuisine`
/// columns are ignored: both labels are re-derived from the item name so
/// the dataset and the classifier can never disagree. Rows whose price
/// does not clean to a valid number are dropped; missing text fields get
/// the `Unknown` sentinel.
pub fn load_dataset(path: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    info!("Loading menu data from {}", path.display());

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let item_idx = column("Item_Name").ok_or("CSV is missing the 'Item_Name' column")?;
    let restaurant_idx =
        column("Restaurant_Name").ok_or("CSV is missing the 'Restaurant_Name' column")?;
    let price_idx = column("Price").ok_or("CSV is missing the 'Price' column")?;
    let area_idx = column("Area");

    let mut items = Vec::new();
    let mut dropped_prices = 0usize;
    let mut unreadable_rows = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable CSV row {}: {}", row_no, e);
                unreadable_rows += 1;
                continue;
            }
        };

        let price = match clean_price(record.get(price_idx).unwrap_or("")) {
            Some(price) => price,
            None => {
                dropped_prices += 1;
                continue;
            }
        };

        let item_name = clean_text(record.get(item_idx).unwrap_or(""));
        let restaurant_name = clean_text(record.get(restaurant_idx).unwrap_or(""));
        let (food_type, cuisine) = classifier::classify(&item_name);
        let area = area_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from);

        items.push(MenuItem {
            item_name,
            restaurant_name,
            price,
            food_type,
            cuisine,
            area,
        });
    }

    info!(
        "Menu data ready: {} usable rows ({} dropped for unusable prices, {} unreadable)",
        items.len(),
        dropped_prices,
        unreadable_rows
    );

    Ok(Dataset::new(items))
}
