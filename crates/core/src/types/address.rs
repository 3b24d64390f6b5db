//! Shipping address type.

use serde::{Deserialize, Serialize};

/// A flat shipping address.
///
/// Every field is required, but no format is enforced here; the checkout
/// form validates values before an `Address` is built from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Render as the multi-line block shown on confirmation pages.
    #[must_use]
    pub fn lines(&self) -> [String; 4] {
        [
            self.full_name.clone(),
            self.street_address.clone(),
            format!("{}, {} {}", self.city, self.state, self.postal_code),
            self.country.clone(),
        ]
    }
}
