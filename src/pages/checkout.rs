use crate::app::config::Config;
use crate::models::transaction::{CustomerDetails, SnapTransaction};
use crate::utils::money::format_idr;
use askama::Template;
use url::Url;

/// Per-process values shown on every checkout page.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub gross_amount: u64,
    pub customer: CustomerDetails,
    pub snap_js_url: String,
    pub client_key: String,
}

impl PageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gross_amount: config.gross_amount,
            customer: config.customer.clone(),
            snap_js_url: config.environment.snap_js_url(),
            client_key: config.client_key.clone(),
        }
    }
}

// Every `{{ }}` in the template is HTML-escaped, the token included.
#[derive(Template)]
#[template(path = "checkout.html")]
pub struct CheckoutPage<'a> {
    token: &'a str,
    redirect_url: Option<&'a str>,
    customer_name: String,
    total_purchase: String,
    snap_js_url: &'a str,
    client_key: &'a str,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(settings: &'a PageSettings, transaction: &'a SnapTransaction) -> Self {
        Self {
            token: &transaction.token,
            redirect_url: transaction.redirect_url.as_deref().filter(|url| is_web_link(url)),
            customer_name: settings.customer.full_name(),
            total_purchase: format_idr(settings.gross_amount),
            snap_js_url: &settings.snap_js_url,
            client_key: &settings.client_key,
        }
    }
}

/// Only `http`/`https` links go into an `href`.
fn is_web_link(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
