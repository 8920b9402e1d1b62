//! Merchant record and its editable draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MerchantId, MerchantStatus};

/// A merchant as returned by the backend.
///
/// `id` and the timestamps are server-assigned and absent only on an
/// unsaved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MerchantId>,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Registered business name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Company registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: MerchantStatus,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The mutable draft edited by the merchant form and sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantFormData {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Registered business name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Company registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Lifecycle status; new drafts start `active`.
    #[serde(default)]
    pub status: MerchantStatus,
}

impl From<&Merchant> for MerchantFormData {
    #[inline]
    fn from(merchant: &Merchant) -> Self {
        Self {
            name: merchant.name.clone(),
            email: merchant.email.clone(),
            phone: merchant.phone.clone(),
            business_name: merchant.business_name.clone(),
            registration_number: merchant.registration_number.clone(),
            address: merchant.address.clone(),
            city: merchant.city.clone(),
            country: merchant.country.clone(),
            status: merchant.status,
        }
    }
}

impl Merchant {
    /// Builds an unsaved merchant from a draft.
    #[inline]
    #[must_use]
    pub fn from_draft(draft: MerchantFormData) -> Self {
        Self {
            id: None,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            business_name: draft.business_name,
            registration_number: draft.registration_number,
            address: draft.address,
            city: draft.city,
            country: draft.country,
            status: draft.status,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the identifier, or [`DashboardError::MissingId`] for an
    /// unsaved record.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingId`] if the merchant has no ID.
    ///
    /// [`DashboardError::MissingId`]: crate::error::DashboardError::MissingId
    #[inline]
    pub fn require_id(&self) -> crate::error::Result<&MerchantId> {
        self.id.as_ref().ok_or(crate::error::DashboardError::MissingId)
    }
}
