// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording doubles for the platform seams, shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use kaufwerk_bridge::traits::{PurchasingConnector, WebContentSink};
use kaufwerk_core::error::{KaufwerkError, Result};
use kaufwerk_core::types::{FulfillmentOutcome, ReceiptId, Sku};

/// One recorded connector call.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorCall {
    RegisterListener,
    GetUserData,
    GetProductData(Vec<Sku>),
    Purchase(Sku),
    GetPurchaseUpdates(bool),
    NotifyFulfillment(ReceiptId, FulfillmentOutcome),
}

/// Connector double that records every call in arrival order.
#[derive(Default)]
pub struct RecordingConnector {
    calls: Mutex<Vec<ConnectorCall>>,
    fail_register: AtomicBool,
}

impl RecordingConnector {
    pub fn calls(&self) -> Vec<ConnectorCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Receipt ids marked fulfilled, in order.
    pub fn fulfillments(&self) -> Vec<ReceiptId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ConnectorCall::NotifyFulfillment(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Reset flags of every history fetch, in order.
    pub fn history_fetches(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ConnectorCall::GetPurchaseUpdates(reset) => Some(reset),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: ConnectorCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PurchasingConnector for RecordingConnector {
    fn register_listener(&self) -> Result<()> {
        self.record(ConnectorCall::RegisterListener);
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(KaufwerkError::Purchasing("listener registration failed".into()));
        }
        Ok(())
    }

    fn get_user_data(&self) -> Result<()> {
        self.record(ConnectorCall::GetUserData);
        Ok(())
    }

    fn get_product_data(&self, skus: &[Sku]) -> Result<()> {
        self.record(ConnectorCall::GetProductData(skus.to_vec()));
        Ok(())
    }

    fn purchase(&self, sku: &Sku) -> Result<()> {
        self.record(ConnectorCall::Purchase(sku.clone()));
        Ok(())
    }

    fn get_purchase_updates(&self, reset: bool) -> Result<()> {
        self.record(ConnectorCall::GetPurchaseUpdates(reset));
        Ok(())
    }

    fn notify_fulfillment(
        &self,
        receipt_id: &ReceiptId,
        outcome: FulfillmentOutcome,
    ) -> Result<()> {
        self.record(ConnectorCall::NotifyFulfillment(receipt_id.clone(), outcome));
        Ok(())
    }
}

/// Sink double that collects every evaluated script.
pub struct CollectingSink {
    scripts: Mutex<Vec<String>>,
    ready: AtomicBool,
}

impl Default for CollectingSink {
    fn default() -> Self {
        Self {
            scripts: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
        }
    }
}

impl CollectingSink {
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    /// Custom-event names in dispatch order.
    pub fn event_names(&self) -> Vec<String> {
        self.scripts()
            .iter()
            .filter_map(|script| script.split('\'').nth(1).map(str::to_owned))
            .collect()
    }

    /// Parsed detail payloads in dispatch order.
    pub fn details(&self) -> Vec<serde_json::Value> {
        self.scripts().iter().map(|script| detail_of(script)).collect()
    }
}

impl WebContentSink for CollectingSink {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn eval_script(&self, script: &str) -> Result<()> {
        self.scripts.lock().unwrap().push(script.to_owned());
        Ok(())
    }
}

/// Extract and parse the detail object from a dispatch script.
pub fn detail_of(script: &str) -> serde_json::Value {
    let start =
        script.find("{ detail: ").expect("script carries a detail object") + "{ detail: ".len();
    let end = script.rfind(" }));").expect("script ends with the dispatch close");
    serde_json::from_str(&script[start..end]).expect("detail is valid JSON")
}
