//! Airtable REST client for the product catalog
//!
//! Paginated reads (pageSize 100, follow `offset` until the upstream stops
//! returning one) plus a field write-back used by the mockup pipeline and
//! the placement-box editor. No retries; the shared client carries a fixed
//! request timeout.

use serde::Deserialize;
use serde_json::Value;

use super::normalize::RawRecord;
use crate::error::BoxError;

const PAGE_SIZE: u32 = 100;

/// How to locate the row a write-back targets
#[derive(Debug, Clone, Copy)]
pub enum RecordMatch<'a> {
    ProductId(&'a str),
    ImageFile(&'a str),
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<RawRecord>,
    offset: Option<String>,
}

/// Thin client over the Airtable v0 REST API
#[derive(Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    api_url: String,
    base_id: String,
    table: String,
    pat: String,
}

impl AirtableClient {
    pub fn new(
        http: reqwest::Client,
        api_url: String,
        base_id: String,
        table: String,
        pat: String,
    ) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            base_id,
            table,
            pat,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.api_url, self.base_id, self.table)
    }

    /// Fetch every record in the table, following pagination offsets.
    pub async fn fetch_all(&self) -> Result<Vec<RawRecord>, BoxError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.table_url())
                .bearer_auth(&self.pat)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(ref off) = offset {
                request = request.query(&[("offset", off.as_str())]);
            }

            let page: ListResponse = request
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = records.len(), "fetched catalog records");
        Ok(records)
    }

    /// Find the Airtable record id for a row matched by product id or by
    /// base-image filename.
    async fn find_record_id(&self, matcher: RecordMatch<'_>) -> Result<Option<String>, BoxError> {
        let (field, value) = match matcher {
            RecordMatch::ProductId(v) => ("product_id", v),
            RecordMatch::ImageFile(v) => ("image_file", v),
        };
        // Table ids ("rec...") can be used directly without a lookup
        if matches!(matcher, RecordMatch::ProductId(v) if v.starts_with("rec")) {
            return Ok(Some(value.to_string()));
        }

        let formula = format!("{{{field}}}='{}'", value.replace('\'', "\\'"));
        let page: ListResponse = self
            .http
            .get(self.table_url())
            .bearer_auth(&self.pat)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(page.records.into_iter().next().map(|r| r.id))
    }

    /// Update arbitrary named fields on the row matched by `matcher`.
    pub async fn update_fields(
        &self,
        matcher: RecordMatch<'_>,
        fields: &Value,
    ) -> Result<(), BoxError> {
        let record_id = self
            .find_record_id(matcher)
            .await?
            .ok_or_else(|| format!("no catalog row matches {matcher:?}"))?;

        self.http
            .patch(format!("{}/{}", self.table_url(), record_id))
            .bearer_auth(&self.pat)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
