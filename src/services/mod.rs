pub mod database;
pub mod food_identifier; // Vision identification with fallback guesses
pub mod gemini; // Google Gemini vision API
pub mod nutritionix; // Nutritionix nutrients API
pub mod recognition;

pub use database::Database;
pub use food_identifier::{FoodIdentifier, RandomPicker};
pub use gemini::{GeminiService, VisionService};
pub use nutritionix::{NutritionLookup, NutritionixClient};
pub use recognition::RecognitionService;
