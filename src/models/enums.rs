//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

/// Returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Name of the enumeration that failed to parse.
    kind: &'static str,
    /// The rejected input.
    value: String,
}

/// Implements case-insensitive `FromStr` over the variants' `as_str` forms.
macro_rules! impl_from_str {
    ($name:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        impl core::str::FromStr for $name {
            type Err = UnknownVariant;

            #[inline]
            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                $(
                    if wanted.eq_ignore_ascii_case(Self::$variant.as_str()) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: $kind,
                    value: raw.to_owned(),
                })
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Lifecycle status of a merchant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantStatus {
    /// Merchant can transact.
    #[default]
    Active,
    /// Merchant is suspended or closed.
    Inactive,
}

impl MerchantStatus {
    /// Wire representation used in query strings.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled successfully.
    Completed,
    /// Authorized but not yet settled.
    Pending,
    /// Declined or errored.
    Failed,
    /// Reversed after completion.
    Reversed,
}

impl TransactionStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [Self::Completed, Self::Pending, Self::Failed, Self::Reversed];

    /// Wire representation used in query strings and exports.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Reversed => "reversed",
        }
    }
}

/// Kind of a transaction line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailType {
    /// Processing fee.
    Fee,
    /// Tax component.
    Tax,
    /// Manual adjustment.
    Adjustment,
    /// Refunded amount.
    Refund,
}

impl DetailType {
    /// Wire representation.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fee => "fee",
            Self::Tax => "tax",
            Self::Adjustment => "adjustment",
            Self::Refund => "refund",
        }
    }
}

/// Column the merchant list is sorted by (server side).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Merchant name.
    #[default]
    Name,
    /// Contact email.
    Email,
    /// Lifecycle status.
    Status,
    /// Creation timestamp.
    CreatedAt,
    /// Last update timestamp.
    UpdatedAt,
}

impl SortField {
    /// Wire representation used in query strings.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Wire representation used in query strings.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl_from_str!(MerchantStatus, "merchant status", [Active, Inactive]);
impl_from_str!(
    TransactionStatus,
    "transaction status",
    [Completed, Pending, Failed, Reversed]
);
impl_from_str!(DetailType, "detail type", [Fee, Tax, Adjustment, Refund]);
impl_from_str!(
    SortField,
    "sort field",
    [Name, Email, Status, CreatedAt, UpdatedAt]
);
impl_from_str!(SortDirection, "sort direction", [Asc, Desc]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MerchantStatus::Inactive).unwrap(),
            r#""inactive""#
        );
        let status: MerchantStatus = serde_json::from_str(r#""active""#).unwrap();
        assert_eq!(status, MerchantStatus::Active);
        assert_eq!(MerchantStatus::default(), MerchantStatus::Active);
    }

    #[test]
    fn transaction_status_matches_as_str() {
        for status in TransactionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn detail_type_parses_lowercase() {
        let kind: DetailType = serde_json::from_str(r#""adjustment""#).unwrap();
        assert_eq!(kind, DetailType::Adjustment);
    }

    #[test]
    fn sort_field_uses_camel_case() {
        assert_eq!(SortField::CreatedAt.as_str(), "createdAt");
        assert_eq!(
            serde_json::to_string(&SortField::UpdatedAt).unwrap(),
            r#""updatedAt""#
        );
    }

    #[test]
    fn sort_direction_toggles() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(
            "COMPLETED".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Completed
        );
        assert_eq!(" createdat ".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "archived".parse::<MerchantStatus>().unwrap_err();
        assert!(err.to_string().contains("merchant status"));
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(MerchantStatus::Inactive.to_string(), "inactive");
        assert_eq!(DetailType::Refund.to_string(), "refund");
    }

    #[test]
    fn invalid_status_fails() {
        assert!(serde_json::from_str::<MerchantStatus>(r#""suspended""#).is_err());
    }
}
