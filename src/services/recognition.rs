use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use std::sync::Arc;

use super::{FoodIdentifier, NutritionLookup};
use crate::models::{default_quantity, FoodQuery, LookupOutcome, RecognitionResult};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Image payload pulled out of a (possibly prefixed) base64 string.
#[derive(Debug, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Accepts either `data:image/png;base64,<data>` or bare base64.
pub fn decode_image_data(image_data: &str) -> Result<DecodedImage> {
    let (header, payload) = match image_data.split_once(',') {
        Some((header, payload)) => (Some(header), payload),
        None => (None, image_data),
    };

    let mime_type = header
        .and_then(|h| h.strip_prefix("data:"))
        .and_then(|h| h.split(';').next())
        .filter(|m| m.starts_with("image/"))
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| anyhow::anyhow!("Invalid image data: {}", e))?;

    Ok(DecodedImage { bytes, mime_type })
}

/// Entry point for both recognition paths. Neither path returns an error;
/// failures show up in the returned values.
pub struct RecognitionService {
    identifier: FoodIdentifier,
    nutrition: Arc<dyn NutritionLookup>,
}

impl RecognitionService {
    pub fn new(identifier: FoodIdentifier, nutrition: Arc<dyn NutritionLookup>) -> Self {
        Self {
            identifier,
            nutrition,
        }
    }

    pub async fn recognize_text(&self, description: &str, quantity: &str) -> LookupOutcome {
        log::info!("📝 Recognizing food from text: {}, quantity: {}", description, quantity);
        self.nutrition
            .lookup(&FoodQuery::new(description, quantity))
            .await
    }

    pub async fn recognize_image(&self, image_data: &str) -> RecognitionResult {
        let image = match decode_image_data(image_data) {
            Ok(image) => image,
            Err(e) => {
                log::error!("❌ Error in food recognition: {}", e);
                return RecognitionResult::failed(e.to_string());
            }
        };

        log::info!("📸 Running food recognition on {} byte image...", image.bytes.len());
        let outcome = self
            .identifier
            .identify(&image.bytes, &image.mime_type)
            .await;
        log::info!(
            "✅ Food recognized: {}, confidence: {:.2}",
            outcome.food_name,
            outcome.confidence
        );

        let mut result = RecognitionResult::recognized(&outcome);

        if !outcome.food_name.is_empty() {
            // Missing nutrition data does not undo a successful identification.
            let query = FoodQuery::new(outcome.food_name.clone(), default_quantity());
            match self.nutrition.lookup(&query).await {
                LookupOutcome::Found(record) => result.nutrition_info = Some(record),
                LookupOutcome::NotFound => {
                    log::info!("🔍 No nutrition data for recognized food '{}'", outcome.food_name);
                }
                LookupOutcome::Error(reason) => {
                    log::warn!(
                        "⚠️ Nutrition lookup failed for '{}': {}",
                        outcome.food_name,
                        reason
                    );
                }
            }
        }

        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::NutritionRecord;
    use crate::services::food_identifier::tests::{FixedPicker, StubVision};
    use crate::services::VisionService;
    use std::sync::Mutex;

    /// Records queries and answers with a fixed outcome.
    pub struct StubNutrition {
        pub outcome: LookupOutcome,
        pub queries: Mutex<Vec<String>>,
    }

    impl StubNutrition {
        pub fn new(outcome: LookupOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl NutritionLookup for StubNutrition {
        async fn lookup(&self, query: &FoodQuery) -> LookupOutcome {
            self.queries.lock().unwrap().push(query.to_query_string());
            self.outcome.clone()
        }
    }

    pub fn apple_record() -> NutritionRecord {
        NutritionRecord {
            food_name: Some("apple".to_string()),
            calories: Some(95.0),
            ..Default::default()
        }
    }

    fn service(
        vision: Option<Arc<dyn VisionService>>,
        nutrition: Arc<StubNutrition>,
    ) -> RecognitionService {
        RecognitionService::new(
            FoodIdentifier::new(vision, Arc::new(FixedPicker(0))),
            nutrition,
        )
    }

    #[test]
    fn test_prefixed_and_bare_payloads_decode_identically() {
        let prefixed = decode_image_data("data:image/jpeg;base64,AAAA").unwrap();
        let bare = decode_image_data("AAAA").unwrap();

        assert_eq!(prefixed.bytes, vec![0, 0, 0]);
        assert_eq!(prefixed.bytes, bare.bytes);
    }

    #[test]
    fn test_mime_type_comes_from_header() {
        assert_eq!(decode_image_data("data:image/png;base64,AAAA").unwrap().mime_type, "image/png");
        assert_eq!(decode_image_data("AAAA").unwrap().mime_type, "image/jpeg");
        assert_eq!(
            decode_image_data("data:application/octet-stream;base64,AAAA").unwrap().mime_type,
            "image/jpeg"
        );
    }

    #[test]
    fn test_malformed_base64_is_rejected() {
        assert!(decode_image_data("data:image/jpeg;base64,@@not base64@@").is_err());
        assert!(decode_image_data("AAA").is_err());
    }

    #[tokio::test]
    async fn test_text_path_delegates_to_lookup() {
        let nutrition = StubNutrition::new(LookupOutcome::Found(apple_record()));
        let service = service(None, nutrition.clone());

        let outcome = service.recognize_text("apple", "2").await;

        assert_eq!(outcome, LookupOutcome::Found(apple_record()));
        assert_eq!(*nutrition.queries.lock().unwrap(), vec!["2 apple".to_string()]);
    }

    #[tokio::test]
    async fn test_unconfigured_image_uses_fallback_confidence() {
        let nutrition = StubNutrition::new(LookupOutcome::Found(apple_record()));
        let service = service(None, nutrition.clone());

        let result = service.recognize_image("data:image/jpeg;base64,AAAA").await;

        assert!(result.success);
        assert_eq!(result.foods, vec!["apple".to_string()]);
        assert_eq!(result.confidence, 0.3);
        assert!(result.message.contains("30.0% confidence"));
        assert!(result.error.is_none());
        assert_eq!(result.nutrition_info, Some(apple_record()));
        assert_eq!(*nutrition.queries.lock().unwrap(), vec!["1 apple".to_string()]);
    }

    #[tokio::test]
    async fn test_primary_identification_feeds_lookup() {
        let nutrition = StubNutrition::new(LookupOutcome::NotFound);
        let vision: Arc<dyn VisionService> = StubVision::answering("Margherita Pizza");
        let service = service(Some(vision), nutrition.clone());

        let result = service.recognize_image("AAAA").await;

        assert!(result.success);
        assert_eq!(result.foods, vec!["pizza".to_string()]);
        assert_eq!(result.message, "Food recognized with 85.0% confidence");
        assert_eq!(*nutrition.queries.lock().unwrap(), vec!["1 pizza".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_nutrition_is_still_success() {
        for outcome in [LookupOutcome::NotFound, LookupOutcome::Error("timeout".to_string())] {
            let service = service(None, StubNutrition::new(outcome));

            let result = service.recognize_image("AAAA").await;

            assert!(result.success);
            assert!(result.nutrition_info.is_none());
            assert!(result.error.is_none());
        }
    }

    #[tokio::test]
    async fn test_malformed_image_fails_without_nutrition() {
        let nutrition = StubNutrition::new(LookupOutcome::Found(apple_record()));
        let service = service(None, nutrition.clone());

        let result = service.recognize_image("data:image/jpeg;base64,!!!").await;

        assert!(!result.success);
        assert!(result.nutrition_info.is_none());
        assert!(!result.error.unwrap_or_default().is_empty());
        assert!(result.foods.is_empty());
        assert!(nutrition.queries.lock().unwrap().is_empty());
    }
}
