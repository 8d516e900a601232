// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound events dispatched to the web content as DOM custom events.
//
// Payloads are serialized with `serde_json` — product titles and
// descriptions are store-controlled text and must be escaped before being
// embedded in a script.

use kaufwerk_core::error::Result;
use kaufwerk_core::types::{PlanTier, Product, ReceiptId, Sku};
use serde_json::json;

/// Reason string forwarded when the platform rejects a SKU.
pub const REASON_INVALID_SKU: &str = "Invalid SKU";

/// Reason string forwarded for generic purchase failures.
pub const REASON_PURCHASE_FAILED: &str = "Purchase failed";

/// An event dispatched to the web content, tagged by outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum WebEvent {
    /// Catalog query succeeded; carries every returned product.
    ProductsLoaded { products: Vec<Product> },
    /// Catalog query failed.
    ProductsError,
    /// A receipt was fulfilled.
    PurchaseSuccess { plan: PlanTier, receipt_id: ReceiptId },
    /// The store reports the entitlement is already owned.
    PurchaseAlreadyOwned,
    /// The purchase flow failed.
    PurchaseError { reason: String },
    /// A receipt arrived canceled.
    SubscriptionCanceled { sku: Sku },
}

impl WebEvent {
    /// DOM custom-event name the web layer listens for.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProductsLoaded { .. } => "onProductsLoaded",
            Self::ProductsError => "onProductsError",
            Self::PurchaseSuccess { .. } => "onPurchaseSuccess",
            Self::PurchaseAlreadyOwned => "onPurchaseAlreadyOwned",
            Self::PurchaseError { .. } => "onPurchaseError",
            Self::SubscriptionCanceled { .. } => "onSubscriptionCanceled",
        }
    }

    /// JSON detail payload attached to the custom event.
    pub fn detail_json(&self) -> Result<String> {
        let detail = match self {
            Self::ProductsLoaded { products } => json!({ "products": products }),
            Self::ProductsError => json!({}),
            Self::PurchaseSuccess { plan, receipt_id } => {
                json!({ "plan": plan, "receiptId": receipt_id })
            }
            Self::PurchaseAlreadyOwned => json!({}),
            Self::PurchaseError { reason } => json!({ "error": reason }),
            Self::SubscriptionCanceled { sku } => json!({ "sku": sku }),
        };
        Ok(serde_json::to_string(&detail)?)
    }

    /// Script that synthesizes and fires the custom event in the web
    /// content. The detail JSON doubles as a JavaScript object literal.
    pub fn to_script(&self) -> Result<String> {
        Ok(format!(
            "window.dispatchEvent(new CustomEvent('{}', {{ detail: {} }}));",
            self.name(),
            self.detail_json()?
        ))
    }
}
