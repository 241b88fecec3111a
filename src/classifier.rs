use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Dietary label for a menu item. Anything without a non-veg indicator
/// word in its name counts as Veg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FoodType {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Veg => "Veg",
            FoodType::NonVeg => "Non-Veg",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label returned when no cuisine category matches.
pub const FALLBACK_CUISINE: &str = "Other";

/// Indicator words that mark an item as Non-Veg. Matched as whole words,
/// case-insensitively; a single hit is enough.
const NON_VEG_KEYWORDS: &[&str] = &[
    "chicken",
    "mutton",
    "lamb",
    "fish",
    "prawn",
    "shrimp",
    "egg",
    "keema",
    "kheema",
    "bacon",
    "ham",
    "sausage",
    "pork",
    "beef",
    "salami",
    "pepperoni",
];

/// Cuisine categories paired with their keyword sets.
///
/// The order of this list is a contract: categories are tested top to
/// bottom and the first match wins. Keyword sets overlap, so narrow
/// categories must stay above the generic "Indian (General)" catch-all
/// ("Masala Dosa" is South Indian, not North Indian, because South
/// Indian is tested first). Reordering changes classification output.
const CUISINE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "tea", "coffee", "lassi", "juice", "shake", "soda", "mocktail", "cooler", "sharbat",
            "drink",
        ],
    ),
    (
        "Desserts",
        &[
            "cake",
            "pastry",
            "ice cream",
            "brownie",
            "sundae",
            "muffin",
            "kulfi",
            "gulab jamun",
            "jalebi",
            "rasgulla",
            "falooda",
            "dessert",
        ],
    ),
    (
        "South Indian",
        &["dosa", "idli", "vada", "uttapam", "sambhar", "rasam", "upma"],
    ),
    (
        "Maharashtrian",
        &["misal", "pav bhaji", "vada pav", "thalipeeth", "pithla", "sabudana"],
    ),
    (
        "Mughlai",
        &["kebab", "korma", "mughlai", "shahi", "nawabi", "haleem"],
    ),
    (
        "Italian",
        &[
            "pasta",
            "pizza",
            "risotto",
            "lasagna",
            "ravioli",
            "spaghetti",
            "penne",
            "macaroni",
            "bruschetta",
            "pesto",
            "alfredo",
            "carbonara",
        ],
    ),
    (
        "Chinese",
        &[
            "noodles",
            "manchurian",
            "schezwan",
            "hakka",
            "chow mein",
            "dim sum",
            "spring roll",
            "szechuan",
            "momos",
            "wonton",
        ],
    ),
    (
        "North Indian",
        &[
            "tandoori",
            "masala",
            "naan",
            "roti",
            "paratha",
            "tikka",
            "dal makhani",
            "chole",
            "bhature",
            "kulcha",
            "paneer",
        ],
    ),
    (
        "Continental",
        &[
            "burger", "sandwich", "steak", "fries", "salad", "soup", "bread", "grill", "wrap",
            "hot dog", "tacos",
        ],
    ),
    (
        "Indian (General)",
        &["biryani", "curry", "thali", "khichdi", "pakora", "samosa", "bhaji"],
    ),
];

/// Build a `\b(kw1|kw2|...)\b` pattern so keywords only match as whole
/// words ("egg" must not hit inside "eggplant"). Multi-word keywords
/// match as phrases.
fn whole_word_pattern(keywords: &[&str]) -> String {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b({})\b", alternation)
}

lazy_static! {
    static ref NON_VEG_RE: Regex = Regex::new(&whole_word_pattern(NON_VEG_KEYWORDS))
        .expect("non-veg keyword pattern must compile");
    static ref CUISINE_RES: Vec<(&'static str, Regex)> = CUISINE_CATEGORIES
        .iter()
        .map(|(label, keywords)| {
            let re = Regex::new(&whole_word_pattern(keywords))
                .expect("cuisine keyword pattern must compile");
            (*label, re)
        })
        .collect();
}

/// Veg unless the name contains at least one non-veg indicator word.
pub fn classify_food_type(item_name: &str) -> FoodType {
    let lowered = item_name.to_lowercase();
    if NON_VEG_RE.is_match(&lowered) {
        FoodType::NonVeg
    } else {
        FoodType::Veg
    }
}

/// First category in declared order whose keyword set matches the name;
/// `Other` when nothing matches (including empty names).
pub fn classify_cuisine(item_name: &str) -> String {
    let lowered = item_name.to_lowercase();
    for (label, re) in CUISINE_RES.iter() {
        if re.is_match(&lowered) {
            return (*label).to_string();
        }
    }
    FALLBACK_CUISINE.to_string()
}

/// Both labels in one pass. Pure function of the name and the static
/// keyword tables, so reclassifying any name is idempotent.
pub fn classify(item_name: &str) -> (FoodType, String) {
    (classify_food_type(item_name), classify_cuisine(item_name))
}
