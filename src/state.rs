//! Application state for merchkit

use std::time::Duration;

use aws_sdk_s3::Client as S3Client;

use crate::catalog::airtable::AirtableClient;
use crate::catalog::cache::CatalogService;
use crate::config::Config;
use crate::error::BoxError;
use crate::storage::ObjectStore;

/// Fixed timeout for upstream HTTP calls (Airtable, Stripe, logo downloads)
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client with the upstream timeout applied
    pub http: reqwest::Client,
    /// Catalog access (cache + Airtable + fallback)
    pub catalog: CatalogService,
    /// S3-backed asset store
    pub store: ObjectStore,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Public base URL of this service
    pub public_base_url: String,
    /// Countries shipping is offered to
    pub allowed_countries: Vec<String>,
    /// Country treated as domestic for shipping rates
    pub domestic_country: String,
    /// Directory of base product images
    pub products_dir: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = S3Client::new(&aws_config);
        let store = ObjectStore::new(
            s3,
            config.bucket_name.clone(),
            config.bucket_public_url.clone(),
        );

        let airtable = AirtableClient::new(
            http.clone(),
            config.airtable_api_url.clone(),
            config.airtable_base_id.clone(),
            config.airtable_table.clone(),
            config.airtable_pat.clone(),
        );

        Ok(Self {
            http,
            catalog: CatalogService::new(airtable),
            store,
            stripe_secret_key: config.stripe_secret_key.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            allowed_countries: config.allowed_countries.clone(),
            domestic_country: config.domestic_country.clone(),
            products_dir: config.products_dir.clone(),
        })
    }
}
