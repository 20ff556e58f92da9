use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::NutritionixConfig;
use crate::models::{FoodPhoto, FoodQuery, FullNutrient, LookupOutcome, NutritionRecord};

/// Resolves a food description to a nutrition record.
#[async_trait::async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, query: &FoodQuery) -> LookupOutcome;
}

#[derive(Debug, Serialize)]
struct NutrientsRequest<'a> {
    query: String,
    timezone: &'a str,
}

#[derive(Debug, Deserialize)]
struct NutrientsResponse {
    #[serde(default)]
    foods: Vec<NutritionixFood>,
}

/// One entry of the provider's `foods` array, as sent upstream.
#[derive(Debug, Deserialize)]
struct NutritionixFood {
    food_name: Option<String>,
    serving_qty: Option<f64>,
    serving_unit: Option<String>,
    serving_weight_grams: Option<f64>,
    nf_calories: Option<f64>,
    nf_total_fat: Option<f64>,
    nf_saturated_fat: Option<f64>,
    nf_cholesterol: Option<f64>,
    nf_sodium: Option<f64>,
    nf_total_carbohydrate: Option<f64>,
    nf_dietary_fiber: Option<f64>,
    nf_sugars: Option<f64>,
    nf_protein: Option<f64>,
    nf_potassium: Option<f64>,
    nf_p: Option<f64>,
    #[serde(default)]
    full_nutrients: Option<Vec<FullNutrient>>,
    photo: Option<FoodPhoto>,
}

impl From<NutritionixFood> for NutritionRecord {
    fn from(food: NutritionixFood) -> Self {
        NutritionRecord {
            food_name: food.food_name,
            serving_qty: food.serving_qty,
            serving_unit: food.serving_unit,
            serving_weight_grams: food.serving_weight_grams,
            calories: food.nf_calories,
            total_fat: food.nf_total_fat,
            saturated_fat: food.nf_saturated_fat,
            cholesterol: food.nf_cholesterol,
            sodium: food.nf_sodium,
            total_carbohydrate: food.nf_total_carbohydrate,
            dietary_fiber: food.nf_dietary_fiber,
            sugars: food.nf_sugars,
            protein: food.nf_protein,
            potassium: food.nf_potassium,
            p_percentage: food.nf_p,
            full_nutrients: food.full_nutrients.unwrap_or_default(),
            photo: food.photo,
        }
    }
}

/// Nutritionix natural-language nutrients API client
pub struct NutritionixClient {
    config: NutritionixConfig,
    client: reqwest::Client,
}

impl NutritionixClient {
    pub fn new(config: NutritionixConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// `Ok(None)` when the provider answered but has no data for the query.
    async fn fetch(&self, query: &str) -> Result<Option<NutritionRecord>> {
        let url = format!(
            "{}/v2/natural/nutrients",
            self.config.base_url.trim_end_matches('/')
        );

        let request = NutrientsRequest {
            query: query.to_string(),
            timezone: &self.config.timezone,
        };

        log::info!("🥗 Querying Nutritionix: '{}'", query);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-app-id", &self.config.app_id)
            .header("x-app-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("⚠️ Nutritionix API error ({}): {}", status, error_text);
            return Ok(None);
        }

        let data: NutrientsResponse = response.json().await?;

        // Only the first match is used; alternative matches are dropped.
        match data.foods.into_iter().next() {
            Some(food) => Ok(Some(food.into())),
            None => {
                log::info!("🔍 No food data found for query: {}", query);
                Ok(None)
            }
        }
    }
}

#[async_trait::async_trait]
impl NutritionLookup for NutritionixClient {
    async fn lookup(&self, query: &FoodQuery) -> LookupOutcome {
        let query_string = query.to_query_string();

        match self.fetch(&query_string).await {
            Ok(Some(record)) => {
                log::info!(
                    "✅ Nutrition data found for '{}': {:?} kcal",
                    query_string,
                    record.calories
                );
                LookupOutcome::Found(record)
            }
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => {
                log::error!("❌ Error getting nutrition info for '{}': {}", query_string, e);
                LookupOutcome::Error(e.to_string())
            }
        }
    }
}
