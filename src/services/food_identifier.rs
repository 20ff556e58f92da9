use rand::Rng;
use std::sync::Arc;

use super::VisionService;
use crate::models::IdentificationOutcome;

pub const IDENTIFY_PROMPT: &str = "Identify the main food item in this image. \
                                   Only respond with a two words naming the food.";

/// The vision service gives no score of its own, so a successful answer gets this one.
pub const PRIMARY_CONFIDENCE: f64 = 0.85;
pub const FALLBACK_CONFIDENCE: f64 = 0.30;

/// Substring -> canonical name. Scanned in order; the first hit wins.
pub const FOOD_CATEGORIES: &[(&str, &str)] = &[
    ("apple", "apple"),
    ("banana", "banana"),
    ("orange", "orange"),
    ("pizza", "pizza"),
    ("hamburger", "hamburger"),
    ("hot dog", "hot dog"),
    ("sandwich", "sandwich"),
    ("broccoli", "broccoli"),
    ("carrot", "carrot"),
    ("ice cream", "ice cream"),
    ("cake", "cake"),
    ("donut", "donut"),
    ("spaghetti", "spaghetti"),
    ("taco", "taco"),
    ("salad", "salad"),
];

pub const FALLBACK_FOODS: &[&str] = &["apple", "banana", "sandwich", "salad", "pasta", "chicken"];

/// Source of randomness for the fallback guess.
pub trait FoodPicker: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

pub struct RandomPicker;

impl FoodPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Lower-cases the answer and maps it onto the category table when possible.
pub fn normalize_food_name(raw: &str) -> String {
    let food_name = raw.trim().to_lowercase();

    FOOD_CATEGORIES
        .iter()
        .find(|(category, _)| food_name.contains(category))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(food_name)
}

/// Names the dominant food in an image. Never fails: any problem with the
/// vision service ends in a low-confidence fallback guess.
pub struct FoodIdentifier {
    vision: Option<Arc<dyn VisionService>>,
    picker: Arc<dyn FoodPicker>,
}

impl FoodIdentifier {
    pub fn new(vision: Option<Arc<dyn VisionService>>, picker: Arc<dyn FoodPicker>) -> Self {
        if vision.is_none() {
            log::warn!("⚠️ No vision API key configured, image recognition will use fallback guesses");
        }
        Self { vision, picker }
    }

    pub async fn identify(&self, image: &[u8], mime_type: &str) -> IdentificationOutcome {
        let vision = match &self.vision {
            Some(vision) => vision,
            None => {
                log::warn!("⚠️ Using fallback recognition: vision service not configured");
                return self.fallback();
            }
        };

        match vision.describe_image(IDENTIFY_PROMPT, image, mime_type).await {
            Ok(text) if !text.trim().is_empty() => {
                let food_name = normalize_food_name(&text);
                log::info!("🍽️ Vision service identified food as: {}", food_name);
                IdentificationOutcome {
                    food_name,
                    confidence: PRIMARY_CONFIDENCE,
                }
            }
            Ok(_) => {
                log::warn!("⚠️ Using fallback recognition: vision service returned empty text");
                self.fallback()
            }
            Err(e) => {
                log::error!("❌ Error in vision food recognition: {}", e);
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> IdentificationOutcome {
        let index = self.picker.pick(FALLBACK_FOODS.len()) % FALLBACK_FOODS.len();
        IdentificationOutcome {
            food_name: FALLBACK_FOODS[index].to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
