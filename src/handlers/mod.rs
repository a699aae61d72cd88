pub mod checkout;
pub mod error;

use crate::app::config::Config;
use crate::pages::checkout::PageSettings;
use crate::services::{OrderIdGenerator, SnapClient, SnapError, TokenIssuer};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<dyn TokenIssuer>,
    pub order_ids: Arc<OrderIdGenerator>,
    pub page: Arc<PageSettings>,
}

impl AppState {
    pub fn new(issuer: Arc<dyn TokenIssuer>, order_ids: OrderIdGenerator, page: PageSettings) -> Self {
        Self {
            issuer,
            order_ids: Arc::new(order_ids),
            page: Arc::new(page),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SnapError> {
        Ok(Self::new(
            Arc::new(SnapClient::from_config(config)?),
            OrderIdGenerator::new(config.order_prefix.clone()),
            PageSettings::from_config(config),
        ))
    }
}

/// `GET /` only; anything else gets the framework's 404/405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(checkout::checkout_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
