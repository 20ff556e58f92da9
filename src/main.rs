mod api; // HTTP routes
mod config;
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use api::{server::create_router, AppState};
use config::Config;
use services::{
    Database, FoodIdentifier, GeminiService, NutritionixClient, RandomPicker, RecognitionService,
    VisionService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting food logger...");

    let config = Config::from_env();

    let db = Arc::new(Database::new(&config.database_url).await?);
    log::info!("✅ SQLite history store initialized: {}", config.database_url);

    let nutrition = Arc::new(NutritionixClient::new(config.nutritionix.clone()));
    log::info!("✅ Nutritionix client initialized");

    let vision = GeminiService::from_config(&config.gemini)
        .map(|service| Arc::new(service) as Arc<dyn VisionService>);
    if vision.is_some() {
        log::info!("✅ Gemini vision service initialized with model: {}", config.gemini.model);
    }

    let identifier = FoodIdentifier::new(vision, Arc::new(RandomPicker));
    let recognition = Arc::new(RecognitionService::new(identifier, nutrition));

    let state = Arc::new(AppState { recognition, db });
    let app = create_router(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("❌ Failed to listen for shutdown signal: {}", e);
            }
            log::info!("🛑 Shutting down...");
        })
        .await?;

    Ok(())
}
