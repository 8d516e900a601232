// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the purchase bridge seams.
//
// The relay and command interface are written against these traits so the
// whole purchase flow can be exercised without a live purchasing SDK or a
// WebView.

use kaufwerk_core::error::Result;
use kaufwerk_core::types::{FulfillmentOutcome, ReceiptId, Sku};

/// Outbound calls into the platform purchasing service.
///
/// Every request is fire-and-forget: the platform answers asynchronously
/// through the registered listener, never through a return value. No
/// timeout is applied — a hung platform request simply never produces a
/// callback.
pub trait PurchasingConnector: Send + Sync {
    /// Register the purchase listener with the platform. Registering again
    /// silently replaces the previous listener, so callers must guard
    /// against double setup.
    fn register_listener(&self) -> Result<()>;

    /// Request the signed-in store user's identity.
    fn get_user_data(&self) -> Result<()>;

    /// Request catalog metadata for the given SKU set.
    fn get_product_data(&self, skus: &[Sku]) -> Result<()>;

    /// Start a purchase flow for one SKU.
    fn purchase(&self, sku: &Sku) -> Result<()>;

    /// Request purchase history. `reset = true` asks for the full history
    /// from the first page; `reset = false` continues from the last page
    /// delivered.
    fn get_purchase_updates(&self, reset: bool) -> Result<()>;

    /// Report the outcome of a receipt back to the platform, closing the
    /// purchase transaction.
    fn notify_fulfillment(&self, receipt_id: &ReceiptId, outcome: FulfillmentOutcome)
    -> Result<()>;
}

/// Outbound channel into the embedded web content.
pub trait WebContentSink: Send + Sync {
    /// Whether the content surface is attached and ready for script
    /// evaluation.
    fn is_ready(&self) -> bool;

    /// Evaluate a script in the web content. Implementations marshal the
    /// call onto the thread that owns the content surface before
    /// evaluating.
    fn eval_script(&self, script: &str) -> Result<()>;
}
