pub mod order_id;
pub mod snap_client;

pub use order_id::OrderIdGenerator;
pub use snap_client::{SnapClient, SnapError, TokenIssuer};
