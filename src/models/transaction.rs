use serde::{Deserialize, Serialize};

/// Body of `POST /snap/v1/transactions`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub transaction_details: TransactionDetails,
    pub credit_card: CreditCard,
    pub customer_details: CustomerDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditCard {
    /// Forces 3-D Secure for card payments.
    pub secure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerDetails {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            _ => self.last_name.clone(),
        }
    }
}

impl Default for CustomerDetails {
    fn default() -> Self {
        Self {
            first_name: "Johny".to_string(),
            last_name: "Kane".to_string(),
            email: "testmidtrans@mailnesia.com".to_string(),
            phone: "08111222333".to_string(),
        }
    }
}

impl TransactionRequest {
    pub fn new(order_id: String, gross_amount: u64, customer: CustomerDetails) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id,
                gross_amount,
            },
            credit_card: CreditCard { secure: true },
            customer_details: customer,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.transaction_details.order_id
    }
}

/// The part of the gateway answer this service consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_json_shape() {
        let request = TransactionRequest::new(
            "order-csb-1700000000000".to_string(),
            10000,
            CustomerDetails::default(),
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "transaction_details": {
                    "order_id": "order-csb-1700000000000",
                    "gross_amount": 10000
                },
                "credit_card": { "secure": true },
                "customer_details": {
                    "first_name": "Johny",
                    "last_name": "Kane",
                    "email": "testmidtrans@mailnesia.com",
                    "phone": "08111222333"
                }
            })
        );
    }

    #[test]
    fn test_snap_transaction_ignores_extra_fields() {
        let transaction: SnapTransaction = serde_json::from_value(json!({
            "token": "abc123",
            "redirect_url": "https://app.sandbox.midtrans.com/snap/v4/redirection/abc123",
            "extra": 1
        }))
        .unwrap();

        assert_eq!(transaction.token, "abc123");
        assert!(transaction.redirect_url.is_some());
    }

    #[test]
    fn test_snap_transaction_rejects_non_string_token() {
        assert!(serde_json::from_value::<SnapTransaction>(json!({ "token": 42 })).is_err());
        assert!(serde_json::from_value::<SnapTransaction>(json!({})).is_err());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(CustomerDetails::default().full_name(), "Johny Kane");

        let customer = CustomerDetails {
            last_name: String::new(),
            ..CustomerDetails::default()
        };
        assert_eq!(customer.full_name(), "Johny");
    }
}
