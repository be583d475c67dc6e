use bakery_core::{new_id, ServiceError};
use serde::{Deserialize, Serialize};

/// A person or business on the delivery round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Assigned once; generated from the creation time when left empty.
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub balance: f64,
}

/// A customer's standing order. Keyed by `customer_id`, which refers to
/// `Customer::id` without the store enforcing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTemplate {
    pub customer_id: String,
    pub quantity: u32,
}

impl OrderTemplate {
    /// The template implied when none has been saved: zero units.
    pub fn empty(customer_id: &str) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            quantity: 0,
        }
    }
}

/// Raw customer form fields as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    /// Empty for a new customer.
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub balance: String,
}

impl CustomerForm {
    /// Coerce the raw fields into a record.
    pub fn into_customer(self) -> Customer {
        let id = match self.id.trim() {
            "" => new_id(),
            id => id.to_string(),
        };
        Customer {
            id,
            name: self.name,
            address: self.address,
            phone: self.phone,
            balance: parse_balance(&self.balance),
        }
    }
}

/// Parse a currency amount, reading the longest numeric prefix ("7abc" is 7).
/// Anything unparsable or non-finite becomes 0.
pub fn parse_balance(raw: &str) -> f64 {
    let value = numeric_prefix(raw.trim_start()).parse::<f64>().unwrap_or(0.0);
    finite_or_zero(value)
}

/// Currency amounts must be finite: NaN and infinities become 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Longest leading `[+-]digits[.digits][e[+-]digits]` run of `s`, found in a
/// single forward pass. Empty when `s` does not start with a number.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - end - 1;
        if mantissa_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    // Every byte consumed is ASCII, so `end` is a char boundary.
    &s[..end]
}

/// Parse a standing-order quantity: a whole number of zero or more, written
/// with digits only (no sign).
pub fn parse_quantity(raw: &str) -> Result<u32, ServiceError> {
    let trimmed = raw.trim();
    let invalid = || {
        ServiceError::Validation(format!(
            "quantity must be a whole number of zero or more, got '{trimmed}'"
        ))
    };
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    trimmed.parse::<u32>().map_err(|_| invalid())
}
