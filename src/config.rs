//! Service configuration

use crate::error::BoxError;

/// Environment-driven configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Airtable personal access token
    pub airtable_pat: String,
    /// Airtable base identifier
    pub airtable_base_id: String,
    /// Airtable table holding the product catalog
    pub airtable_table: String,
    /// Airtable API base URL (overridable for tests)
    pub airtable_api_url: String,
    /// S3 bucket for logos and generated mockups
    pub bucket_name: String,
    /// Public base URL of the bucket (CloudFront or S3 website)
    pub bucket_public_url: String,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Public base URL of this service, used in generated links
    pub public_base_url: String,
    /// Countries shipping is offered to (ISO 3166-1 alpha-2)
    pub allowed_countries: Vec<String>,
    /// Country treated as domestic for shipping rates
    pub domestic_country: String,
    /// Directory of base product images
    pub products_dir: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let allowed_countries = std::env::var("ALLOWED_COUNTRIES")
            .unwrap_or_else(|_| "US,CA".into())
            .split(',')
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            airtable_pat: Self::require_secret("AIRTABLE_PAT", &environment)?,
            airtable_base_id: Self::require_secret("AIRTABLE_BASE_ID", &environment)?,
            airtable_table: std::env::var("AIRTABLE_TABLE_NAME")
                .unwrap_or_else(|_| "Products".into()),
            airtable_api_url: std::env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| "https://api.airtable.com/v0".into()),
            bucket_name: std::env::var("AWS_BUCKET_NAME").unwrap_or_else(|_| "merchkit-assets".into()),
            bucket_public_url: std::env::var("AWS_BUCKET_URL")
                .unwrap_or_else(|_| "https://assets.merchkit.app".into()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            allowed_countries,
            domestic_country: std::env::var("DOMESTIC_COUNTRY").unwrap_or_else(|_| "US".into()),
            products_dir: std::env::var("PRODUCTS_DIR").unwrap_or_else(|_| "assets/products".into()),
            environment,
        })
    }
}
