//! Mockup generation endpoint
//!
//! Sequential pipeline per request: read the base product image, obtain the
//! customer's logo (remote URL or previously stored object), composite,
//! upload the PNG, then write the mockup URL back to the catalog row as a
//! spawned best-effort task. Concurrent requests for the same customer and
//! product race without coordination; the last writer wins.

use axum::Json;
use axum::extract::{Path, State};
use image::DynamicImage;
use serde::Deserialize;

use crate::catalog::airtable::RecordMatch;
use crate::error::{ApiResult, AppError};
use crate::mockup;
use crate::state::AppState;
use crate::storage::locator::{self, AssetRole};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupRequest {
    pub email: String,
    /// Remote logo to download
    pub logo_url: Option<String>,
    /// Filename of a logo previously stored under the customer's folder
    pub logo_file: Option<String>,
    /// When both are present, a copy of the composite is stored under the
    /// company/domain scheme for quote history
    pub quote_id: Option<String>,
    pub version_id: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupResponse {
    pub mockup_url: String,
    /// Company-scheme copy, when a quote/version was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_url: Option<String>,
}

/// POST /api/products/:id/mockup
pub async fn generate_mockup(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<MockupRequest>,
) -> ApiResult<MockupResponse> {
    if req.email.is_empty() {
        return Err(AppError::InvalidInput("email is required".into()));
    }
    if req.logo_url.is_none() && req.logo_file.is_none() {
        return Err(AppError::InvalidInput(
            "either logoUrl or logoFile is required".into(),
        ));
    }

    let product = state.catalog.find(&product_id).await?;

    let base = load_base_image(&state, &product.image_file).await?;
    let logo = load_logo(&state, &req).await?;

    let rect = mockup::resolve_placement(base.width(), base.height(), &product.boxes)?;
    let composite = mockup::compose(&base, &logo, rect);
    let png = mockup::encode_png(&composite)?;

    let key = locator::mockup_key(&req.email, &product.id);
    let url = state
        .store
        .put_public(&key, png.clone(), "image/png")
        .await
        .map_err(AppError::internal)?;

    // Quote history copy under the company/domain scheme
    let design_url = match (req.quote_id.as_deref(), req.version_id.as_deref()) {
        (Some(quote_id), Some(version_id)) => {
            let design_key = locator::company_key(
                &req.email,
                quote_id,
                version_id,
                &format!("{}.png", product.id),
            );
            Some(
                state
                    .store
                    .put_public(&design_key, png, "image/png")
                    .await
                    .map_err(AppError::internal)?,
            )
        }
        _ => None,
    };

    tracing::info!(
        product_id = %product.id,
        customer = %req.email,
        key = %key,
        "mockup generated"
    );

    // Best-effort write-back of the mockup URL; failure only gets logged
    let catalog = state.catalog.clone();
    let write_back_url = url.clone();
    let image_file = product.image_file.clone();
    let write_back_id = product.id.clone();
    tokio::spawn(async move {
        let fields = serde_json::json!({ "mockup_url": write_back_url });
        let airtable = catalog.airtable();
        let result = match airtable
            .update_fields(RecordMatch::ProductId(&write_back_id), &fields)
            .await
        {
            Ok(()) => Ok(()),
            Err(_) => {
                airtable
                    .update_fields(RecordMatch::ImageFile(&image_file), &fields)
                    .await
            }
        };
        if let Err(err) = result {
            tracing::warn!(product_id = %write_back_id, error = %err, "mockup URL write-back failed");
        }
    });

    Ok(Json(MockupResponse {
        mockup_url: url,
        design_url,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoUploadRequest {
    pub email: String,
    pub filename: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoUploadResponse {
    pub key: String,
    /// Presigned PUT URL the customer uploads the logo to
    pub upload_url: String,
    /// Presigned GET URL for verifying the upload
    pub view_url: String,
    pub expires_in_secs: u64,
}

/// POST /api/logo-upload-url — presigned URLs for a direct logo upload
pub async fn logo_upload_url(
    State(state): State<AppState>,
    Json(req): Json<LogoUploadRequest>,
) -> ApiResult<LogoUploadResponse> {
    if req.email.is_empty() || req.filename.is_empty() {
        return Err(AppError::InvalidInput("email and filename are required".into()));
    }

    let content_type = mime_guess::from_path(&req.filename).first_or_octet_stream();
    if content_type.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::InvalidInput(format!(
            "{} is not an image filename",
            req.filename
        )));
    }

    let key = locator::customer_key(&req.email, AssetRole::Logos, &req.filename);
    let ttl = crate::storage::DEFAULT_SIGNED_URL_TTL;

    let upload_url = state
        .store
        .presigned_put_url(&key, content_type.as_ref(), ttl)
        .await
        .map_err(AppError::internal)?;
    let view_url = state
        .store
        .presigned_get_url(&key, ttl)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(LogoUploadResponse {
        key,
        upload_url,
        view_url,
        expires_in_secs: ttl.as_secs(),
    }))
}

/// Read and decode the base product image from the products directory
async fn load_base_image(state: &AppState, image_file: &str) -> Result<DynamicImage, AppError> {
    // image_file comes from the catalog, but keep path traversal out anyway
    let filename = std::path::Path::new(image_file)
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| AppError::AssetMissing(image_file.to_string()))?;
    let path = std::path::Path::new(&state.products_dir).join(filename);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::AssetMissing(path.display().to_string()))?;

    image::load_from_memory(&bytes)
        .map_err(|e| AppError::AssetMissing(format!("{}: {e}", path.display())))
}

/// Obtain the logo: download by URL or load the stored object
async fn load_logo(state: &AppState, req: &MockupRequest) -> Result<DynamicImage, AppError> {
    let bytes = if let Some(url) = req.logo_url.as_deref() {
        // Reject obviously wrong formats before downloading; extensionless
        // URLs pass through and are validated by the decoder below
        if let Some(guessed) = mime_guess::from_path(url).first() {
            if guessed.type_() != mime_guess::mime::IMAGE {
                return Err(AppError::LogoUnavailable(format!(
                    "unsupported logo format {guessed} at {url}"
                )));
            }
        }

        let resp = state
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::LogoUnavailable(format!("{url}: {e}")))?;
        resp.bytes()
            .await
            .map_err(|e| AppError::LogoUnavailable(format!("{url}: {e}")))?
            .to_vec()
    } else {
        let file = req.logo_file.as_deref().unwrap_or_default();
        let key = locator::customer_key(&req.email, AssetRole::Logos, file);
        state
            .store
            .get(&key)
            .await
            .map_err(|e| AppError::LogoUnavailable(format!("{key}: {e}")))?
    };

    image::load_from_memory(&bytes)
        .map_err(|e| AppError::LogoUnavailable(format!("undecodable logo: {e}")))
}
