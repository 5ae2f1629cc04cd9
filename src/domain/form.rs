use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use uuid::Uuid;

use super::invoice::{InvoiceDraft, InvoiceStatus};

/// Raw form input: a flat string-keyed mapping as submitted by the browser.
/// Nested structures are not accepted.
pub type FormInput = HashMap<String, String>;

/// Per-field validation failures, keyed by form field name. BTreeMap keeps
/// the serialized order stable.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

pub const CUSTOMER_ERROR: &str = "Please select a customer.";
pub const AMOUNT_ERROR: &str = "Please enter an amount greater than $0.";
pub const STATUS_ERROR: &str = "Please select an invoice status.";

/// Validate and normalize a raw invoice form.
///
/// All three field checks run independently before aggregating, so a failed
/// form reports every broken field at once rather than just the first one.
/// On success the amount has been converted to cents (`round(amount * 100)`,
/// half-up, in decimal arithmetic).
pub fn parse_invoice_form(form: &FormInput) -> Result<InvoiceDraft, FieldErrors> {
    let customer = parse_customer(form.get("customerId"));
    let amount = parse_amount(form.get("amount"));
    let status = parse_status(form.get("status"));

    match (customer, amount, status) {
        (Ok(customer_id), Ok(amount_cents), Ok(status)) => Ok(InvoiceDraft {
            customer_id,
            amount_cents,
            status,
        }),
        (customer, amount, status) => {
            let mut errors = FieldErrors::new();
            if let Err(message) = customer {
                errors.entry("customerId").or_default().push(message.to_string());
            }
            if let Err(message) = amount {
                errors.entry("amount").or_default().push(message.to_string());
            }
            if let Err(message) = status {
                errors.entry("status").or_default().push(message.to_string());
            }
            Err(errors)
        }
    }
}

fn parse_customer(raw: Option<&String>) -> Result<Uuid, &'static str> {
    let raw = raw.map(|s| s.trim()).unwrap_or("");
    if raw.is_empty() {
        return Err(CUSTOMER_ERROR);
    }
    Uuid::parse_str(raw).map_err(|_| CUSTOMER_ERROR)
}

fn parse_amount(raw: Option<&String>) -> Result<i64, &'static str> {
    let raw = raw.map(|s| s.trim()).unwrap_or("");
    let amount = BigDecimal::from_str(raw).map_err(|_| AMOUNT_ERROR)?;
    if amount <= BigDecimal::from(0) {
        return Err(AMOUNT_ERROR);
    }
    (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or(AMOUNT_ERROR)
}

fn parse_status(raw: Option<&String>) -> Result<InvoiceStatus, &'static str> {
    // The status match is exact: no trimming, no case folding.
    raw.map(String::as_str)
        .unwrap_or("")
        .parse()
        .map_err(|_| STATUS_ERROR)
}
