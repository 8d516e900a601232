// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::Sku;

/// Fixed product identifiers for this build of the shell.
///
/// The defaults mirror the catalog registered with the store; the web layer
/// never supplies SKUs directly, it only picks one of the two commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IapConfig {
    /// SKU of the premium monthly subscription.
    pub premium_sku: Sku,
    /// SKU of the family monthly subscription.
    pub family_sku: Sku,
}

impl Default for IapConfig {
    fn default() -> Self {
        Self {
            premium_sku: Sku::from("com.kaufwerk.premium_monthly"),
            family_sku: Sku::from("com.kaufwerk.family_monthly"),
        }
    }
}

impl IapConfig {
    /// SKU set used for the startup catalog query.
    pub fn catalog_skus(&self) -> [Sku; 2] {
        [self.premium_sku.clone(), self.family_sku.clone()]
    }
}
