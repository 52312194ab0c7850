use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::Result;
use crate::lookup::aggregate::{FoodNutrients, LookupResponse};
use crate::lookup::NutritionLookup;

pub const DEFAULT_ENDPOINT: &str = "https://trackapi.nutritionix.com/v2/natural/nutrients";

/// Calories added by the meal-averaging lookup path.
pub const CALORIE_OFFSET: f64 = 200.0;

/// Settings for the nutrition lookup service.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub endpoint: String,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    /// Per-request timeout; a timed-out request counts as "no data".
    pub timeout: Duration,
    /// Pause between consecutive requests.
    pub delay: Duration,
    pub calorie_offset: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_id: None,
            app_key: None,
            timeout: Duration::from_secs(10),
            delay: Duration::from_millis(500),
            calorie_offset: CALORIE_OFFSET,
        }
    }
}

/// Blocking client for the natural-language nutrients endpoint.
pub struct NutritionixClient {
    client: Client,
    endpoint: String,
    app_id: String,
    app_key: String,
    delay: Duration,
}

impl NutritionixClient {
    pub fn new(config: &LookupConfig, app_id: &str, app_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            app_id: app_id.to_string(),
            app_key: app_key.to_string(),
            delay: config.delay,
        })
    }

    fn request(&self, query: &str) -> Result<Option<Vec<FoodNutrients>>> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .header("x-remote-user-id", "0")
            .json(&serde_json::json!({ "query": query }))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(%status, query, body = %body, "nutrition lookup rejected");
            return Ok(None);
        }

        let parsed: LookupResponse = resp.json()?;
        Ok(Some(parsed.foods))
    }
}

impl NutritionLookup for NutritionixClient {
    fn lookup_foods(&self, query: &str) -> Option<Vec<FoodNutrients>> {
        debug!(query, "querying nutrition service");
        match self.request(query) {
            Ok(foods) => foods,
            Err(e) => {
                warn!(query, error = %e, "nutrition lookup failed");
                None
            }
        }
    }

    fn throttle(&self) {
        std::thread::sleep(self.delay);
    }
}
