// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command interface exposed to the web content.
//
// Each command is fire-and-forget: it issues the platform request and
// returns immediately.  Results surface later through the purchase event
// relay, never through a return value here; a connector failure is logged
// and the web layer must re-issue the command to retry.

use std::sync::Arc;

use kaufwerk_bridge::traits::PurchasingConnector;
use kaufwerk_core::config::IapConfig;
use kaufwerk_core::types::Sku;
use tracing::{error, info};

/// Entry points installed under the web content's `AmazonIAP` namespace,
/// once the content surface is attached and ready.
pub struct CommandInterface {
    config: IapConfig,
    connector: Arc<dyn PurchasingConnector>,
}

impl CommandInterface {
    pub fn new(config: IapConfig, connector: Arc<dyn PurchasingConnector>) -> Self {
        Self { config, connector }
    }

    /// Start a purchase of the premium monthly subscription.
    pub fn purchase_premium(&self) {
        self.issue_purchase(self.config.premium_sku.clone());
    }

    /// Start a purchase of the family monthly subscription.
    pub fn purchase_family(&self) {
        self.issue_purchase(self.config.family_sku.clone());
    }

    /// Force a full purchase-history refresh from the first page.
    pub fn refresh_purchases(&self) {
        info!("refreshing purchase history");
        if let Err(e) = self.connector.get_purchase_updates(true) {
            error!(error = %e, "failed to request purchase history refresh");
        }
    }

    /// Platform capability probe.  This interface is only installed on the
    /// Amazon build variant, so the answer is always yes.
    pub fn is_amazon_device(&self) -> bool {
        true
    }

    fn issue_purchase(&self, sku: Sku) {
        info!(sku = %sku, "issuing purchase request");
        if let Err(e) = self.connector.purchase(&sku) {
            error!(sku = %sku, error = %e, "failed to issue purchase request");
        }
    }
}
