//! Stripe integration via REST API (no SDK dependency)
//!
//! Two operations: hosted checkout session creation (payment mode, automatic
//! tax, dynamic shipping options) and standalone tax calculation. Form
//! encoding uses Stripe's indexed bracket syntax.

use serde::Deserialize;

use crate::error::BoxError;
use crate::shipping::ShippingOption;

/// A checkout line item, amounts in cents
#[derive(Debug, Clone)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything needed to open a hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub line_items: Vec<LineItem>,
    pub shipping_options: Vec<ShippingOption>,
    pub allowed_countries: Vec<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Create a Stripe Checkout Session (payment mode, automatic tax enabled).
/// Returns the hosted session URL.
pub async fn create_checkout_session(
    http: &reqwest::Client,
    secret_key: &str,
    req: &CheckoutRequest,
) -> Result<String, BoxError> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("customer_email".into(), req.customer_email.clone()),
        ("success_url".into(), req.success_url.clone()),
        ("cancel_url".into(), req.cancel_url.clone()),
        ("automatic_tax[enabled]".into(), "true".into()),
    ];

    for (i, item) in req.line_items.iter().enumerate() {
        form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            "usd".into(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        if !item.description.is_empty() {
            form.push((
                format!("line_items[{i}][price_data][product_data][description]"),
                item.description.clone(),
            ));
        }
        if let Some(ref url) = item.image_url {
            form.push((
                format!("line_items[{i}][price_data][product_data][images][0]"),
                url.clone(),
            ));
        }
    }

    for (i, country) in req.allowed_countries.iter().enumerate() {
        form.push((
            format!("shipping_address_collection[allowed_countries][{i}]"),
            country.clone(),
        ));
    }

    for (i, opt) in req.shipping_options.iter().enumerate() {
        let prefix = format!("shipping_options[{i}][shipping_rate_data]");
        form.push((format!("{prefix}[type]"), "fixed_amount".into()));
        form.push((
            format!("{prefix}[fixed_amount][amount]"),
            opt.amount.to_string(),
        ));
        form.push((format!("{prefix}[fixed_amount][currency]"), "usd".into()));
        form.push((format!("{prefix}[display_name]"), opt.display_name.into()));
        form.push((
            format!("{prefix}[delivery_estimate][minimum][unit]"),
            "business_day".into(),
        ));
        form.push((
            format!("{prefix}[delivery_estimate][minimum][value]"),
            opt.delivery_estimate.0.to_string(),
        ));
        form.push((
            format!("{prefix}[delivery_estimate][maximum][unit]"),
            "business_day".into(),
        ));
        form.push((
            format!("{prefix}[delivery_estimate][maximum][value]"),
            opt.delivery_estimate.1.to_string(),
        ));
    }

    let resp: serde_json::Value = http
        .post("https://api.stripe.com/v1/checkout/sessions")
        .basic_auth(secret_key, None::<&str>)
        .form(&form)
        .send()
        .await?
        .json()
        .await?;

    resp["url"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Stripe create_checkout failed: {resp}").into())
}

/// Tax calculation result (amounts in cents)
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct TaxCalculation {
    pub amount_total: i64,
    pub tax_amount_exclusive: i64,
    pub tax_amount_inclusive: i64,
    pub currency: String,
}

/// Create a standalone tax calculation for line items shipped to a US postal
/// code.
pub async fn create_tax_calculation(
    http: &reqwest::Client,
    secret_key: &str,
    country: &str,
    postal_code: &str,
    items: &[LineItem],
) -> Result<TaxCalculation, BoxError> {
    let mut form: Vec<(String, String)> = vec![
        ("currency".into(), "usd".into()),
        (
            "customer_details[address][postal_code]".into(),
            postal_code.to_string(),
        ),
        (
            "customer_details[address][country]".into(),
            country.to_string(),
        ),
        ("customer_details[address_source]".into(), "shipping".into()),
    ];

    for (i, item) in items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][amount]"),
            (item.unit_amount * i64::from(item.quantity)).to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        form.push((format!("line_items[{i}][reference]"), item.name.clone()));
    }

    let resp: serde_json::Value = http
        .post("https://api.stripe.com/v1/tax/calculations")
        .basic_auth(secret_key, None::<&str>)
        .form(&form)
        .send()
        .await?
        .json()
        .await?;

    if resp.get("amount_total").is_none() {
        return Err(format!("Stripe tax calculation failed: {resp}").into());
    }
    Ok(serde_json::from_value(resp)?)
}
