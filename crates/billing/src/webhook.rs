//! Stripe webhook verification and decoding.
//!
//! Stripe signs each delivery with a `Stripe-Signature` header of the form
//! `t=<unix>,v1=<hex>[,v1=<hex>...]`, where each `v1` is the HMAC-SHA256 of
//! `"{t}.{raw body}"` under the endpoint's signing secret.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed delivery, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const EVENT_SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

/// Status stored once a subscription is deleted.
pub const STATUS_CANCELED: &str = "canceled";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("No signature matches the payload")]
    SignatureMismatch,

    #[error("Signature timestamp outside tolerance")]
    TimestampOutsideTolerance,

    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// `now` is the current unix time; deliveries older (or newer) than
/// `tolerance_secs` are rejected.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => {
                if let Some(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }

    let matched = signatures.iter().any(|sig| {
        signed_payload_mac(secret, timestamp, payload)
            .verify_slice(sig)
            .is_ok()
    });
    if !matched {
        return Err(WebhookError::SignatureMismatch);
    }

    if (now - timestamp).abs() > tolerance_secs {
        return Err(WebhookError::TimestampOutsideTolerance);
    }
    Ok(())
}

/// Build a `Stripe-Signature` header value for `payload`.
///
/// Used to sign fixtures when exercising the webhook endpoint.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mac = signed_payload_mac(secret, timestamp, payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The webhook events that change local subscription state.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// A checkout finished; links our user to the Stripe customer and
    /// subscription.
    CheckoutCompleted {
        user_id: Option<i64>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
    },
    /// A subscription changed status or billing period.
    SubscriptionChanged {
        subscription_id: String,
        customer_id: Option<String>,
        status: String,
        price_id: Option<String>,
        current_period_end: Option<DateTime<Utc>>,
    },
    /// Any other event type; acknowledged and ignored.
    Ignored(String),
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct RawCheckoutSession {
    client_reference_id: Option<String>,
    customer: Option<String>,
    subscription: Option<String>,
}

#[derive(Deserialize)]
struct RawSubscription {
    id: String,
    customer: Option<String>,
    status: String,
    current_period_end: Option<i64>,
    #[serde(default)]
    items: Option<RawItems>,
}

#[derive(Deserialize)]
struct RawItems {
    data: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    price: RawPrice,
}

#[derive(Deserialize)]
struct RawPrice {
    id: String,
}

/// Decode a verified webhook body.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let raw: RawEvent = serde_json::from_slice(payload)?;

    match raw.event_type.as_str() {
        EVENT_CHECKOUT_COMPLETED => {
            let session: RawCheckoutSession = serde_json::from_value(raw.data.object)?;
            Ok(WebhookEvent::CheckoutCompleted {
                user_id: session
                    .client_reference_id
                    .as_deref()
                    .and_then(|id| id.parse().ok()),
                customer_id: session.customer,
                subscription_id: session.subscription,
            })
        }
        EVENT_SUBSCRIPTION_UPDATED | EVENT_SUBSCRIPTION_DELETED => {
            let sub: RawSubscription = serde_json::from_value(raw.data.object)?;
            let status = if raw.event_type == EVENT_SUBSCRIPTION_DELETED {
                STATUS_CANCELED.to_string()
            } else {
                sub.status
            };
            Ok(WebhookEvent::SubscriptionChanged {
                subscription_id: sub.id,
                customer_id: sub.customer,
                status,
                price_id: sub
                    .items
                    .and_then(|items| items.data.into_iter().next())
                    .map(|item| item.price.id),
                current_period_end: sub
                    .current_period_end
                    .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            })
        }
        _ => Ok(WebhookEvent::Ignored(raw.event_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_767_225_600;

    #[test]
    fn accepts_own_signature() {
        let body = br#"{"type":"ping"}"#;
        let header = signature_header(body, SECRET, NOW);
        assert!(verify_signature(body, &header, SECRET, NOW + 10, DEFAULT_TOLERANCE_SECS).is_ok());
    }

    #[test]
    fn accepts_when_any_v1_matches() {
        let body = br#"{"type":"ping"}"#;
        let good = signature_header(body, SECRET, NOW);
        let v1 = good.split_once(",v1=").unwrap().1;
        let header = format!("t={NOW},v1={},v1={v1}", "00".repeat(32));
        assert!(verify_signature(body, &header, SECRET, NOW, DEFAULT_TOLERANCE_SECS).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let header = signature_header(br#"{"type":"ping"}"#, SECRET, NOW);
        assert_matches!(
            verify_signature(br#"{"type":"pong"}"#, &header, SECRET, NOW, DEFAULT_TOLERANCE_SECS),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = br#"{}"#;
        let header = signature_header(body, "whsec_other", NOW);
        assert_matches!(
            verify_signature(body, &header, SECRET, NOW, DEFAULT_TOLERANCE_SECS),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn rejects_stale_timestamp() {
        let body = br#"{}"#;
        let header = signature_header(body, SECRET, NOW);
        assert_matches!(
            verify_signature(body, &header, SECRET, NOW + 301, DEFAULT_TOLERANCE_SECS),
            Err(WebhookError::TimestampOutsideTolerance)
        );
    }

    #[test]
    fn rejects_malformed_header() {
        assert_matches!(
            verify_signature(b"{}", "v1=abcd", SECRET, NOW, DEFAULT_TOLERANCE_SECS),
            Err(WebhookError::MalformedHeader)
        );
        assert_matches!(
            verify_signature(b"{}", &format!("t={NOW}"), SECRET, NOW, DEFAULT_TOLERANCE_SECS),
            Err(WebhookError::MalformedHeader)
        );
    }

    #[test]
    fn parses_checkout_completed() {
        let body = serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_1",
                "client_reference_id": "42",
                "customer": "cus_1",
                "subscription": "sub_1"
            }}
        });
        let event = parse_event(body.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            WebhookEvent::CheckoutCompleted {
                user_id: Some(42),
                customer_id: Some("cus_1".to_string()),
                subscription_id: Some("sub_1".to_string()),
            }
        );
    }

    #[test]
    fn parses_subscription_updated() {
        let body = serde_json::json!({
            "type": "customer.subscription.updated",
            "data": { "object": {
                "id": "sub_1",
                "customer": "cus_1",
                "status": "past_due",
                "current_period_end": NOW,
                "items": { "data": [ { "price": { "id": "price_1" } } ] }
            }}
        });
        let event = parse_event(body.to_string().as_bytes()).unwrap();
        assert_matches!(
            event,
            WebhookEvent::SubscriptionChanged { status, price_id, current_period_end, .. } => {
                assert_eq!(status, "past_due");
                assert_eq!(price_id.as_deref(), Some("price_1"));
                assert_eq!(current_period_end.map(|t| t.timestamp()), Some(NOW));
            }
        );
    }

    #[test]
    fn deleted_subscription_is_canceled() {
        let body = serde_json::json!({
            "type": "customer.subscription.deleted",
            "data": { "object": { "id": "sub_1", "status": "active" } }
        });
        assert_matches!(
            parse_event(body.to_string().as_bytes()).unwrap(),
            WebhookEvent::SubscriptionChanged { status, .. } if status == STATUS_CANCELED
        );
    }

    #[test]
    fn other_events_are_ignored() {
        let body = serde_json::json!({ "type": "invoice.paid", "data": { "object": {} } });
        assert_eq!(
            parse_event(body.to_string().as_bytes()).unwrap(),
            WebhookEvent::Ignored("invoice.paid".to_string())
        );
    }
}
