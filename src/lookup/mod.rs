pub mod aggregate;
pub mod client;

use tracing::warn;

use crate::error::Result;

pub use aggregate::{first_food_entry, meal_tags, summed_meal_record, FoodNutrients, LookupResponse};
pub use client::{LookupConfig, NutritionixClient, CALORIE_OFFSET, DEFAULT_ENDPOINT};

/// External nutrition lookup.
///
/// Best effort: any failure (transport error, non-success status, timeout,
/// unparsable body) is reported as `None` and never aborts a batch.
pub trait NutritionLookup {
    fn lookup_foods(&self, query: &str) -> Option<Vec<FoodNutrients>>;

    /// Called between requests to respect the service's rate limit.
    fn throttle(&self) {}
}

/// Lookup used when no credentials are configured; every query misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLookup;

impl NutritionLookup for DisabledLookup {
    fn lookup_foods(&self, _query: &str) -> Option<Vec<FoodNutrients>> {
        None
    }
}

/// Build the HTTP client, or a disabled lookup when credentials are absent.
pub fn build_lookup(config: &LookupConfig) -> Result<Box<dyn NutritionLookup>> {
    match (config.app_id.as_deref(), config.app_key.as_deref()) {
        (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => {
            Ok(Box::new(NutritionixClient::new(config, id, key)?))
        }
        _ => {
            warn!("nutrition service credentials not set; lookups disabled");
            Ok(Box::new(DisabledLookup))
        }
    }
}
