// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Kaufwerk purchase bridge.

use serde::{Deserialize, Serialize};

/// Platform-assigned product identifier for a purchasable entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(pub String);

impl Sku {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform-issued proof of a purchase transaction, consumed once to grant
/// or deny an entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReceiptId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subscription tier unlocked by a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Premium,
    Family,
}

impl PlanTier {
    /// Derive the tier from a SKU. Any SKU containing "family" maps to the
    /// family plan; everything else is premium.
    pub fn from_sku(sku: &Sku) -> Self {
        if sku.as_str().contains("family") {
            Self::Family
        } else {
            Self::Premium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Family => "family",
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable product as described by the platform catalog.
///
/// Field values are forwarded to the web content verbatim; the price is a
/// display string already localized by the platform. Lifetime is one
/// catalog query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: Sku,
    pub title: String,
    pub description: String,
    pub price: String,
}

/// A purchase receipt delivered by the platform, either from a live
/// purchase response or from a purchase-history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sku: Sku,
    pub receipt_id: ReceiptId,
    #[serde(default)]
    pub canceled: bool,
}

/// Identity of the signed-in store user. Diagnostic only — never forwarded
/// to the web content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: String,
    pub marketplace: String,
}

/// Status code attached to every platform response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Successful,
    Failed,
    NotSupported,
    AlreadyPurchased,
    InvalidSku,
}

impl RequestStatus {
    /// Map the integer code used at the FFI boundary. Unknown codes return
    /// `None` so callers can log them instead of mis-classifying.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Successful),
            1 => Some(Self::Failed),
            2 => Some(Self::NotSupported),
            3 => Some(Self::AlreadyPurchased),
            4 => Some(Self::InvalidSku),
            _ => None,
        }
    }
}

/// Outcome reported back to the platform when closing a purchase
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// The entitlement was granted.
    Fulfilled,
    /// The entitlement cannot be granted (unknown SKU, withdrawn product).
    Unavailable,
}

impl FulfillmentOutcome {
    /// Name of the platform-side enum constant.
    pub fn platform_constant(&self) -> &'static str {
        match self {
            Self::Fulfilled => "FULFILLED",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

/// One platform purchasing callback, normalized into a closed union so the
/// relay can match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Store-user identity response.
    UserData {
        status: RequestStatus,
        data: Option<UserData>,
    },
    /// Product catalog response.
    ProductData {
        status: RequestStatus,
        products: Vec<Product>,
        unavailable_skus: Vec<Sku>,
    },
    /// Live purchase response.
    Purchase {
        status: RequestStatus,
        receipt: Option<Receipt>,
    },
    /// One page of the purchase-history replay.
    PurchaseUpdates {
        status: RequestStatus,
        receipts: Vec<Receipt>,
        has_more: bool,
    },
}
