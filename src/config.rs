use std::env;

pub const DEFAULT_NUTRITIONIX_URL: &str = "https://trackapi.nutritionix.com";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Process-wide settings, loaded once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub nutritionix: NutritionixConfig,
    pub gemini: GeminiConfig,
    pub database_url: String,
    pub bind_addr: String,
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NutritionixConfig {
    pub app_id: String,
    pub api_key: String,
    pub base_url: String,
    pub timezone: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` means image recognition runs on the fallback identifier only.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let nutritionix = NutritionixConfig {
            app_id: env::var("NUTRITIONIX_APP_ID").unwrap_or_else(|_| {
                log::warn!("⚠️ NUTRITIONIX_APP_ID not set, nutrition lookups will fail");
                String::new()
            }),
            api_key: env::var("NUTRITIONIX_API_KEY").unwrap_or_default(),
            base_url: env::var("NUTRITIONIX_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NUTRITIONIX_URL.to_string()),
            timezone: env::var("NUTRITIONIX_TIMEZONE").unwrap_or_else(|_| "US/Eastern".to_string()),
        };

        let gemini = GeminiConfig {
            api_key: non_empty(env::var("GEMINI_API_KEY").ok()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
        };

        Self {
            nutritionix,
            gemini,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://food_history.db".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string()),
            static_dir: non_empty(env::var("STATIC_DIR").ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
