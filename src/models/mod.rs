use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input to the nutrition lookup. Quantity is free text ("2", "1 cup", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodQuery {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
}

pub fn default_quantity() -> String {
    "1".to_string()
}

impl FoodQuery {
    pub fn new(description: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
        }
    }

    /// Natural-language query sent to the nutrition provider.
    pub fn to_query_string(&self) -> String {
        format!("{} {}", self.quantity, self.description)
    }
}

/// Normalized nutrition record. Every value the provider did not send stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub total_fat: Option<f64>,
    #[serde(default)]
    pub saturated_fat: Option<f64>,
    #[serde(default)]
    pub cholesterol: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub total_carbohydrate: Option<f64>,
    #[serde(default)]
    pub dietary_fiber: Option<f64>,
    #[serde(default)]
    pub sugars: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub p_percentage: Option<f64>,
    #[serde(default)]
    pub full_nutrients: Vec<FullNutrient>,
    #[serde(default)]
    pub photo: Option<FoodPhoto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullNutrient {
    pub attr_id: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodPhoto {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub highres: Option<String>,
    #[serde(default)]
    pub is_user_uploaded: Option<bool>,
}

/// Result of a nutrition lookup.
///
/// `Error` keeps the upstream failure reason for logging only; callers are
/// expected to treat it the same as `NotFound`.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(NutritionRecord),
    NotFound,
    Error(String),
}

impl LookupOutcome {
    pub fn into_record(self) -> Option<NutritionRecord> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            LookupOutcome::NotFound | LookupOutcome::Error(_) => None,
        }
    }
}

/// Food name plus how much we trust it. Fallback guesses carry a low confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationOutcome {
    pub food_name: String,
    pub confidence: f64,
}

/// Response envelope for the image recognition path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub success: bool,
    #[serde(default)]
    pub foods: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_info: Option<NutritionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecognitionResult {
    pub fn recognized(outcome: &IdentificationOutcome) -> Self {
        Self {
            success: true,
            foods: vec![outcome.food_name.clone()],
            confidence: outcome.confidence,
            message: format!(
                "Food recognized with {:.1}% confidence",
                outcome.confidence * 100.0
            ),
            nutrition_info: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            foods: Vec::new(),
            confidence: 0.0,
            message: "Could not recognize food in image. Try another image or enter food manually."
                .to_string(),
            nutrition_info: None,
            error: Some(error.into()),
        }
    }
}

/// A logged food entry as stored in the history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub food_name: String,
    pub quantity: String,
    pub nutrition_data: NutritionRecord,
    pub timestamp: DateTime<Utc>,
}
