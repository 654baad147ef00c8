//! Reseller API models
//!
//! Shapes mirror the upstream activation marketplace's JSON; unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};

/// A purchased phone-number activation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PhoneActivation {
    pub id: i64,
    pub phone: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub product: String,
    /// Upstream price, in the reseller account currency
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub sms: Vec<SmsMessage>,
}

/// An SMS received on an activation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SmsMessage {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub code: String,
}

/// Activation list wrapper
#[derive(Debug, Deserialize)]
pub struct ActivationList {
    #[serde(default)]
    pub activations: Vec<PhoneActivation>,
}

/// Reseller account profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ResellerProfile {
    #[serde(default)]
    pub balance: f64,
}

/// Request DTO for buying a number
#[derive(Debug, Deserialize)]
pub struct BuyNumberRequest {
    pub country: String,
    /// Defaults to "any"
    pub operator: Option<String>,
    pub product: String,
}

/// Query string for the pass-through proxy
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub endpoint: String,
}

/// Convert an upstream float price to integer cents
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_to_cents() {
        assert_eq!(price_to_cents(12.34), 1234);
        assert_eq!(price_to_cents(0.0), 0);
        assert_eq!(price_to_cents(0.005), 1);
        assert_eq!(price_to_cents(7.0), 700);
    }

    #[test]
    fn test_activation_decodes_sparse_json() {
        let json = r#"{"id": 123, "phone": "+79000000000"}"#;
        let activation: PhoneActivation = serde_json::from_str(json).unwrap();
        assert_eq!(activation.id, 123);
        assert_eq!(activation.phone, "+79000000000");
        assert!(activation.sms.is_empty());
        assert_eq!(activation.price, 0.0);
    }
}
