// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub seams for desktop/CI builds where the purchasing SDK and the
// WebView are unavailable.
//
// Every method returns `PlatformUnavailable` — the real implementations
// live in the `android` module.

use kaufwerk_core::error::{KaufwerkError, Result};
use kaufwerk_core::types::{FulfillmentOutcome, ReceiptId, Sku};

use crate::traits::{PurchasingConnector, WebContentSink};

/// No-op connector returned on non-Android platforms.
pub struct StubConnector;

impl PurchasingConnector for StubConnector {
    fn register_listener(&self) -> Result<()> {
        tracing::warn!("PurchasingConnector::register_listener called on stub connector");
        Err(KaufwerkError::PlatformUnavailable)
    }

    fn get_user_data(&self) -> Result<()> {
        Err(KaufwerkError::PlatformUnavailable)
    }

    fn get_product_data(&self, _skus: &[Sku]) -> Result<()> {
        Err(KaufwerkError::PlatformUnavailable)
    }

    fn purchase(&self, _sku: &Sku) -> Result<()> {
        tracing::warn!("PurchasingConnector::purchase called on stub connector");
        Err(KaufwerkError::PlatformUnavailable)
    }

    fn get_purchase_updates(&self, _reset: bool) -> Result<()> {
        Err(KaufwerkError::PlatformUnavailable)
    }

    fn notify_fulfillment(
        &self,
        _receipt_id: &ReceiptId,
        _outcome: FulfillmentOutcome,
    ) -> Result<()> {
        Err(KaufwerkError::PlatformUnavailable)
    }
}

/// No-op sink returned on non-Android platforms.
pub struct StubSink;

impl WebContentSink for StubSink {
    fn is_ready(&self) -> bool {
        false
    }

    fn eval_script(&self, _script: &str) -> Result<()> {
        tracing::warn!("WebContentSink::eval_script called on stub sink");
        Err(KaufwerkError::PlatformUnavailable)
    }
}
