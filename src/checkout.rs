use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartError, CartState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "Online")]
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BillingField {
    Name,
    Phone,
    Address,
    City,
    Pincode,
}

impl fmt::Display for BillingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillingField::Name => "name",
            BillingField::Phone => "phone",
            BillingField::Address => "address",
            BillingField::City => "city",
            BillingField::Pincode => "pincode",
        };
        f.write_str(label)
    }
}

/// Every failing field at once, so a form can show them simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BillingErrors(pub BTreeMap<BillingField, String>);

impl BillingErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn message(&self, field: BillingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }
}

/// Transient form state for one checkout attempt; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
}

impl Default for BillingProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            pincode: String::new(),
            payment_method: PaymentMethod::Cod,
        }
    }
}

impl BillingProfile {
    /// Synchronous validation, run before any order submission. All fields
    /// are required after trimming; phone and pincode must be exactly 10
    /// and 6 digits.
    pub fn validate(&self) -> Result<(), BillingErrors> {
        let mut errors = BTreeMap::new();

        let required = [
            (BillingField::Name, &self.name),
            (BillingField::Phone, &self.phone),
            (BillingField::Address, &self.address),
            (BillingField::City, &self.city),
            (BillingField::Pincode, &self.pincode),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.insert(field, "This field is required".to_string());
            }
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && !is_digits(phone, 10) {
            errors.insert(
                BillingField::Phone,
                "Enter valid 10 digit phone number".to_string(),
            );
        }
        let pincode = self.pincode.trim();
        if !pincode.is_empty() && !is_digits(pincode, 6) {
            errors.insert(
                BillingField::Pincode,
                "Enter valid 6 digit pincode".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BillingErrors(errors))
        }
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// Where the user is in the checkout sequence. COD goes straight from
/// `Cart` to `Confirmed`; Online passes through `Upi` and `Scanner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Cart,
    Upi,
    Scanner,
    Confirmed { order_id: i64 },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("order placement is not available from this step")]
    WrongStep,

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Step machine layered over [`CartState`]; owns the billing form for the
/// current attempt.
#[derive(Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    pub billing: BillingProfile,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Cart,
            billing: BillingProfile::default(),
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        self.billing.payment_method = method;
        match (method, self.step) {
            (PaymentMethod::Online, CheckoutStep::Cart) => self.step = CheckoutStep::Upi,
            (PaymentMethod::Cod, CheckoutStep::Upi | CheckoutStep::Scanner) => {
                self.step = CheckoutStep::Cart;
            }
            _ => {}
        }
    }

    pub fn proceed_to_scanner(&mut self) {
        if self.step == CheckoutStep::Upi {
            self.step = CheckoutStep::Scanner;
        }
    }

    pub fn back(&mut self) {
        match self.step {
            CheckoutStep::Scanner => self.step = CheckoutStep::Upi,
            CheckoutStep::Upi => self.step = CheckoutStep::Cart,
            _ => {}
        }
    }

    /// Place the order from the step that allows it: `Cart` for COD,
    /// `Scanner` ("I Paid, Place Order") for Online. Failure leaves the
    /// step unchanged so the user can retry.
    pub async fn submit_order(&mut self, cart: &mut CartState) -> Result<i64, CheckoutError> {
        let allowed = matches!(
            (self.billing.payment_method, self.step),
            (PaymentMethod::Cod, CheckoutStep::Cart) | (PaymentMethod::Online, CheckoutStep::Scanner)
        );
        if !allowed {
            return Err(CheckoutError::WrongStep);
        }
        let order_id = cart.place_order(&self.billing).await?;
        self.step = CheckoutStep::Confirmed { order_id };
        Ok(order_id)
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}
