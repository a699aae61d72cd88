use axum::extract::State;
use axum::response::Html;
use askama::Template;
use tracing::info;

use crate::handlers::error::AppError;
use crate::handlers::AppState;
use crate::models::transaction::TransactionRequest;
use crate::pages::checkout::CheckoutPage;

pub async fn checkout_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let request = TransactionRequest::new(
        state.order_ids.next_id(),
        state.page.gross_amount,
        state.page.customer.clone(),
    );
    info!("Requesting Snap token for order {}", request.order_id());

    let transaction = state.issuer.create_transaction(&request).await?;
    let page = CheckoutPage::new(&state.page, &transaction).render()?;

    Ok(Html(page))
}
