//! Checkout state and shipping form validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use corner_shop_core::{Address, Email, ShippingMethod};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::store::{PersistedStore, StoreState};

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("Invalid regex"));

const REQUIRED_MESSAGE: &str = "This field is required";
const EMAIL_MESSAGE: &str = "Please enter a valid email address";
const POSTAL_CODE_MESSAGE: &str = "Please enter a valid postal code";

// =============================================================================
// State
// =============================================================================

/// In-progress checkout details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutState {
    pub shipping_address: Option<Address>,
    pub order_notes: String,
    pub shipping_method: ShippingMethod,
}

/// Checkout transitions.
#[derive(Debug, Clone)]
pub enum CheckoutAction {
    SetShippingAddress(Address),
    SetOrderNotes(String),
    SetShippingMethod(ShippingMethod),
    /// Restore every field to its initial value.
    Reset,
}

impl StoreState for CheckoutState {
    const STORAGE_KEY: &'static str = "checkout-storage";
    const VERSION: u32 = 0;
    type Action = CheckoutAction;

    fn apply(&mut self, action: CheckoutAction) {
        match action {
            CheckoutAction::SetShippingAddress(address) => self.shipping_address = Some(address),
            CheckoutAction::SetOrderNotes(notes) => self.order_notes = notes,
            CheckoutAction::SetShippingMethod(method) => self.shipping_method = method,
            CheckoutAction::Reset => *self = Self::default(),
        }
    }
}

/// The persisted checkout.
pub type CheckoutStore = PersistedStore<CheckoutState>;

impl PersistedStore<CheckoutState> {
    #[instrument(skip(self, address))]
    pub fn set_shipping_address(&mut self, address: Address) {
        self.dispatch(CheckoutAction::SetShippingAddress(address));
    }

    #[instrument(skip(self, notes))]
    pub fn set_order_notes(&mut self, notes: impl Into<String>) {
        self.dispatch(CheckoutAction::SetOrderNotes(notes.into()));
    }

    #[instrument(skip(self))]
    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        let method_name = method.to_string();
        add_breadcrumb(
            "checkout",
            "Changed shipping method",
            Some(&[("method", method_name.as_str())]),
        );
        self.dispatch(CheckoutAction::SetShippingMethod(method));
    }

    /// Restore address, notes, and method to their initial values.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.dispatch(CheckoutAction::Reset);
    }
}

// =============================================================================
// Form validation
// =============================================================================

/// Fields of the shipping form that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    FullName,
    StreetAddress,
    City,
    State,
    PostalCode,
    Country,
    Email,
}

impl CheckoutField {
    /// Form field name (e.g., "postalCode").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::StreetAddress => "streetAddress",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<CheckoutField, String>);

impl ValidationErrors {
    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failed fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: CheckoutField, message: &str) {
        self.0.insert(field, message.to_owned());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Reasons a checkout submission is rejected. Nothing is mutated in
/// either case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// One or more form fields are invalid.
    #[error("invalid checkout form: {0}")]
    Invalid(ValidationErrors),
}

/// Raw shipping form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub email: String,
    /// Optional and never validated.
    pub phone: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub address: Address,
    pub email: Email,
    pub phone: Option<String>,
}

impl CheckoutForm {
    /// Form pre-filled from a previously saved shipping address.
    ///
    /// Email and phone are never persisted, so they start empty.
    #[must_use]
    pub fn prefilled(state: &CheckoutState) -> Self {
        state
            .shipping_address
            .as_ref()
            .map_or_else(Self::default, |address| Self {
                full_name: address.full_name.clone(),
                street_address: address.street_address.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                postal_code: address.postal_code.clone(),
                country: address.country.clone(),
                ..Self::default()
            })
    }

    fn value(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::FullName => &self.full_name,
            CheckoutField::StreetAddress => &self.street_address,
            CheckoutField::City => &self.city,
            CheckoutField::State => &self.state,
            CheckoutField::PostalCode => &self.postal_code,
            CheckoutField::Country => &self.country,
            CheckoutField::Email => &self.email,
        }
    }

    /// Validate every field, collecting one message per failing field.
    ///
    /// Blank (after trimming) required fields report "required". Non-blank
    /// email and postal code values are then checked for shape as typed, so
    /// surrounding whitespace makes them invalid.
    ///
    /// # Errors
    ///
    /// Returns the field-keyed messages if any field is invalid.
    pub fn validate(&self) -> Result<ValidatedCheckout, ValidationErrors> {
        const REQUIRED: [CheckoutField; 7] = [
            CheckoutField::FullName,
            CheckoutField::StreetAddress,
            CheckoutField::City,
            CheckoutField::State,
            CheckoutField::PostalCode,
            CheckoutField::Country,
            CheckoutField::Email,
        ];

        let mut errors = ValidationErrors::default();
        for field in REQUIRED {
            if self.value(field).trim().is_empty() {
                errors.insert(field, REQUIRED_MESSAGE);
            }
        }

        let mut email = None;
        if errors.get(CheckoutField::Email).is_none() {
            match Email::parse(&self.email) {
                Ok(parsed) => email = Some(parsed),
                Err(_) => errors.insert(CheckoutField::Email, EMAIL_MESSAGE),
            }
        }

        if errors.get(CheckoutField::PostalCode).is_none()
            && !POSTAL_CODE_RE.is_match(&self.postal_code)
        {
            errors.insert(CheckoutField::PostalCode, POSTAL_CODE_MESSAGE);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ValidatedCheckout {
                address: Address {
                    full_name: self.full_name.trim().to_owned(),
                    street_address: self.street_address.trim().to_owned(),
                    city: self.city.trim().to_owned(),
                    state: self.state.trim().to_owned(),
                    postal_code: self.postal_code.clone(),
                    country: self.country.trim().to_owned(),
                },
                email,
                phone: Some(self.phone.trim())
                    .filter(|phone| !phone.is_empty())
                    .map(str::to_owned),
            }),
            _ => Err(errors),
        }
    }
}
