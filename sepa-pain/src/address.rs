//! Postal addresses

use serde::{Deserialize, Serialize};

/// Passive postal address holder.
///
/// Every field is optional; only present fields are emitted. The emission
/// order differs between the credit-transfer and direct-debit document
/// families and is handled by the serializer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostalAddress {
    /// ISO country code, e.g. `CH`.
    pub country: Option<String>,
    /// Street name.
    pub street_name: Option<String>,
    /// Building number (credit-transfer documents only).
    pub building_number: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Town name.
    pub town_name: Option<String>,
    /// First free-form address line.
    pub address_line_1: Option<String>,
    /// Second free-form address line.
    pub address_line_2: Option<String>,
}

impl PostalAddress {
    /// Address with only a country set, the minimal useful form.
    pub fn for_country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::default()
        }
    }
}
