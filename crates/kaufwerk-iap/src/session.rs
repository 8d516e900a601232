// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lifecycle-scoped purchasing session.
//
// The platform SDK re-registers silently if asked twice, replacing the
// previous listener; `attach` guards against that.  The SDK offers no
// unregistration call, so `detach` gates event handling at this boundary
// instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kaufwerk_bridge::traits::{PurchasingConnector, WebContentSink};
use kaufwerk_core::config::IapConfig;
use kaufwerk_core::error::Result;
use kaufwerk_core::types::PlatformEvent;
use tracing::{error, info, warn};

use crate::commands::CommandInterface;
use crate::relay::PurchaseRelay;

/// One purchasing session, scoped to the life of the content surface.
pub struct IapSession {
    config: IapConfig,
    connector: Arc<dyn PurchasingConnector>,
    relay: PurchaseRelay,
    commands: CommandInterface,
    attached: AtomicBool,
}

impl IapSession {
    pub fn new(
        config: IapConfig,
        connector: Arc<dyn PurchasingConnector>,
        sink: Arc<dyn WebContentSink>,
    ) -> Self {
        let relay = PurchaseRelay::new(connector.clone(), sink);
        let commands = CommandInterface::new(config.clone(), connector.clone());
        Self {
            config,
            connector,
            relay,
            commands,
            attached: AtomicBool::new(false),
        }
    }

    /// Register the purchase listener and issue the startup queries (user
    /// data, then catalog metadata for the two fixed SKUs).
    ///
    /// Idempotent: the first call performs the setup, later calls are
    /// logged no-ops.
    pub fn attach(&self) -> Result<()> {
        if self.attached.swap(true, Ordering::SeqCst) {
            warn!("session already attached; ignoring repeat attach");
            return Ok(());
        }
        if let Err(e) = self.setup() {
            self.attached.store(false, Ordering::SeqCst);
            return Err(e);
        }
        info!("purchasing session attached");
        Ok(())
    }

    fn setup(&self) -> Result<()> {
        self.connector.register_listener()?;
        self.connector.get_user_data()?;
        self.connector.get_product_data(&self.config.catalog_skus())?;
        Ok(())
    }

    /// Check for pending purchases when the host resumes.
    pub fn on_resume(&self) {
        if !self.is_attached() {
            warn!("resume before attach; skipping pending-purchase check");
            return;
        }
        if let Err(e) = self.connector.get_purchase_updates(true) {
            error!(error = %e, "failed to check pending purchases on resume");
        }
    }

    /// Forward one platform callback to the relay.  Events arriving after
    /// `detach` are dropped.
    pub fn handle_platform_event(&self, event: PlatformEvent) {
        if !self.is_attached() {
            warn!(event = ?event, "dropping platform event for detached session");
            return;
        }
        self.relay.handle(event);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Stop handling platform callbacks.
    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            info!("purchasing session detached");
        }
    }

    pub fn relay(&self) -> &PurchaseRelay {
        &self.relay
    }

    pub fn commands(&self) -> &CommandInterface {
        &self.commands
    }
}

impl Drop for IapSession {
    fn drop(&mut self) {
        self.detach();
    }
}
