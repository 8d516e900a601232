// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Purchase event relay: consumes normalized platform callbacks and forwards
// outcomes to the web content.
//
// Callbacks arrive on a platform-managed thread.  Nothing here propagates
// an error upward — a failed dispatch is logged and dropped, the same way
// the platform treats an unanswered request.

use std::sync::{Arc, Mutex};

use kaufwerk_bridge::traits::{PurchasingConnector, WebContentSink};
use kaufwerk_core::types::{
    FulfillmentOutcome, PlanTier, PlatformEvent, Product, Receipt, RequestStatus, Sku, UserData,
};
use tracing::{debug, error, info, warn};

use crate::events::{REASON_INVALID_SKU, REASON_PURCHASE_FAILED, WebEvent};

/// Relay between the platform purchasing service and the web content.
pub struct PurchaseRelay {
    connector: Arc<dyn PurchasingConnector>,
    sink: Arc<dyn WebContentSink>,
    /// Last store-user identity reported by the platform. Diagnostic only.
    last_user: Mutex<Option<UserData>>,
}

impl PurchaseRelay {
    pub fn new(connector: Arc<dyn PurchasingConnector>, sink: Arc<dyn WebContentSink>) -> Self {
        Self {
            connector,
            sink,
            last_user: Mutex::new(None),
        }
    }

    /// Handle one platform callback.
    pub fn handle(&self, event: PlatformEvent) {
        match event {
            PlatformEvent::UserData { status, data } => self.on_user_data(status, data),
            PlatformEvent::ProductData {
                status,
                products,
                unavailable_skus,
            } => self.on_product_data(status, products, unavailable_skus),
            PlatformEvent::Purchase { status, receipt } => self.on_purchase(status, receipt),
            PlatformEvent::PurchaseUpdates {
                status,
                receipts,
                has_more,
            } => self.on_purchase_updates(status, receipts, has_more),
        }
    }

    /// Last store-user identity seen, if any.
    pub fn last_user(&self) -> Option<UserData> {
        self.last_user.lock().ok().and_then(|slot| slot.clone())
    }

    // -- user data ----------------------------------------------------------

    fn on_user_data(&self, status: RequestStatus, data: Option<UserData>) {
        match status {
            RequestStatus::Successful => match data {
                Some(user) => {
                    debug!(user_id = %user.user_id, marketplace = %user.marketplace, "store user identified");
                    if let Ok(mut slot) = self.last_user.lock() {
                        *slot = Some(user);
                    }
                }
                None => warn!("user data response succeeded without user data"),
            },
            // User-data failures stay diagnostic; the web layer is not told.
            RequestStatus::Failed | RequestStatus::NotSupported => {
                error!("failed to get user data");
            }
            other => warn!(status = ?other, "unexpected user data status"),
        }
    }

    // -- catalog ------------------------------------------------------------

    fn on_product_data(
        &self,
        status: RequestStatus,
        products: Vec<Product>,
        unavailable_skus: Vec<Sku>,
    ) {
        match status {
            RequestStatus::Successful => {
                for product in &products {
                    debug!(sku = %product.sku, title = %product.title, price = %product.price, "catalog product");
                }
                if !unavailable_skus.is_empty() {
                    warn!(count = unavailable_skus.len(), "catalog query returned unavailable SKUs");
                }
                self.dispatch(WebEvent::ProductsLoaded { products });
            }
            RequestStatus::Failed | RequestStatus::NotSupported => {
                error!("failed to get product data");
                self.dispatch(WebEvent::ProductsError);
            }
            other => warn!(status = ?other, "unexpected product data status"),
        }
    }

    // -- purchase result ----------------------------------------------------

    fn on_purchase(&self, status: RequestStatus, receipt: Option<Receipt>) {
        match status {
            RequestStatus::Successful => match receipt {
                Some(receipt) => self.process_receipt(&receipt),
                None => warn!("purchase response succeeded without a receipt"),
            },
            RequestStatus::AlreadyPurchased => {
                info!("entitlement already owned");
                self.dispatch(WebEvent::PurchaseAlreadyOwned);
            }
            RequestStatus::InvalidSku => {
                error!("purchase rejected: invalid SKU");
                self.dispatch(WebEvent::PurchaseError {
                    reason: REASON_INVALID_SKU.into(),
                });
            }
            RequestStatus::Failed | RequestStatus::NotSupported => {
                error!("purchase failed");
                self.dispatch(WebEvent::PurchaseError {
                    reason: REASON_PURCHASE_FAILED.into(),
                });
            }
        }
    }

    // -- purchase history ---------------------------------------------------

    fn on_purchase_updates(&self, status: RequestStatus, receipts: Vec<Receipt>, has_more: bool) {
        match status {
            RequestStatus::Successful => {
                // Receipts are processed in delivered order; the next page is
                // requested only after the whole page is done.
                for receipt in &receipts {
                    self.process_receipt(receipt);
                }
                if has_more {
                    if let Err(e) = self.connector.get_purchase_updates(false) {
                        error!(error = %e, "failed to request next purchase history page");
                    }
                }
            }
            // History failures stay diagnostic; the web layer is not told.
            RequestStatus::Failed | RequestStatus::NotSupported => {
                error!("failed to get purchase updates");
            }
            other => warn!(status = ?other, "unexpected purchase updates status"),
        }
    }

    // -- fulfillment policy -------------------------------------------------

    /// Apply the fulfillment policy to one receipt, from either a live
    /// purchase or a history page: fulfill and announce success unless the
    /// receipt arrived canceled.
    fn process_receipt(&self, receipt: &Receipt) {
        debug!(
            sku = %receipt.sku,
            receipt_id = %receipt.receipt_id,
            canceled = receipt.canceled,
            "processing receipt"
        );

        if receipt.canceled {
            self.dispatch(WebEvent::SubscriptionCanceled {
                sku: receipt.sku.clone(),
            });
            return;
        }

        if let Err(e) = self
            .connector
            .notify_fulfillment(&receipt.receipt_id, FulfillmentOutcome::Fulfilled)
        {
            error!(receipt_id = %receipt.receipt_id, error = %e, "failed to mark receipt fulfilled");
        }

        self.dispatch(WebEvent::PurchaseSuccess {
            plan: PlanTier::from_sku(&receipt.sku),
            receipt_id: receipt.receipt_id.clone(),
        });
    }

    // -- web dispatch -------------------------------------------------------

    fn dispatch(&self, event: WebEvent) {
        let name = event.name();
        if !self.sink.is_ready() {
            warn!(event = name, "web content not ready; dropping event");
            return;
        }
        let script = match event.to_script() {
            Ok(script) => script,
            Err(e) => {
                error!(event = name, error = %e, "failed to serialize event payload");
                return;
            }
        };
        match self.sink.eval_script(&script) {
            Ok(()) => debug!(event = name, "dispatched web event"),
            Err(e) => error!(event = name, error = %e, "failed to dispatch web event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CollectingSink, ConnectorCall, RecordingConnector};
    use kaufwerk_core::types::ReceiptId;

    fn relay() -> (Arc<RecordingConnector>, Arc<CollectingSink>, PurchaseRelay) {
        let connector = Arc::new(RecordingConnector::default());
        let sink = Arc::new(CollectingSink::default());
        let relay = PurchaseRelay::new(connector.clone(), sink.clone());
        (connector, sink, relay)
    }

    fn receipt(sku: &str, id: &str, canceled: bool) -> Receipt {
        Receipt {
            sku: Sku::from(sku),
            receipt_id: ReceiptId::from(id),
            canceled,
        }
    }

    fn product(sku: &str, title: &str) -> Product {
        Product {
            sku: Sku::from(sku),
            title: title.into(),
            description: format!("{title} subscription"),
            price: "$4.99".into(),
        }
    }

    #[test]
    fn live_receipt_is_fulfilled_once_and_announced() {
        let (connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: Some(receipt("com.kaufwerk.premium_monthly", "r-1", false)),
        });

        assert_eq!(connector.fulfillments(), vec![ReceiptId::from("r-1")]);
        assert_eq!(sink.event_names(), vec!["onPurchaseSuccess"]);
        let detail = &sink.details()[0];
        assert_eq!(detail["plan"], "premium");
        assert_eq!(detail["receiptId"], "r-1");
    }

    #[test]
    fn canceled_receipt_is_reported_and_never_fulfilled() {
        let (connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: Some(receipt("com.kaufwerk.family_monthly", "r-2", true)),
        });

        assert!(connector.fulfillments().is_empty());
        assert_eq!(sink.event_names(), vec!["onSubscriptionCanceled"]);
        assert_eq!(sink.details()[0]["sku"], "com.kaufwerk.family_monthly");
    }

    #[test]
    fn family_sku_announces_family_plan() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: Some(receipt("com.kaufwerk.family_monthly", "r-3", false)),
        });
        assert_eq!(sink.details()[0]["plan"], "family");
    }

    #[test]
    fn unknown_sku_announces_premium_plan() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: Some(receipt("some.legacy.sku", "r-4", false)),
        });
        assert_eq!(sink.details()[0]["plan"], "premium");
    }

    #[test]
    fn history_pages_continue_in_order_until_exhausted() {
        let (connector, sink, relay) = relay();

        relay.handle(PlatformEvent::PurchaseUpdates {
            status: RequestStatus::Successful,
            receipts: vec![receipt("a", "r-1", false), receipt("b", "r-2", false)],
            has_more: true,
        });
        relay.handle(PlatformEvent::PurchaseUpdates {
            status: RequestStatus::Successful,
            receipts: vec![receipt("c", "r-3", false)],
            has_more: true,
        });
        relay.handle(PlatformEvent::PurchaseUpdates {
            status: RequestStatus::Successful,
            receipts: vec![receipt("d", "r-4", false)],
            has_more: false,
        });

        // Two continuations (pages 1 and 2), none after the last page, and
        // every continuation is non-incremental.
        assert_eq!(connector.history_fetches(), vec![false, false]);
        // All receipts across all pages were processed, in delivered order.
        assert_eq!(
            connector.fulfillments(),
            vec![
                ReceiptId::from("r-1"),
                ReceiptId::from("r-2"),
                ReceiptId::from("r-3"),
                ReceiptId::from("r-4"),
            ]
        );
        assert_eq!(sink.event_names().len(), 4);
        // The page-1 continuation was requested only after both page-1
        // receipts were fulfilled.
        let calls = connector.calls();
        let first_fetch = calls
            .iter()
            .position(|c| matches!(c, ConnectorCall::GetPurchaseUpdates(_)))
            .unwrap();
        assert_eq!(first_fetch, 2);
    }

    #[test]
    fn history_failure_is_diagnostic_only() {
        let (connector, sink, relay) = relay();
        relay.handle(PlatformEvent::PurchaseUpdates {
            status: RequestStatus::Failed,
            receipts: vec![],
            has_more: false,
        });
        assert!(sink.scripts().is_empty());
        assert!(connector.history_fetches().is_empty());
    }

    #[test]
    fn user_data_success_is_recorded_but_not_dispatched() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::UserData {
            status: RequestStatus::Successful,
            data: Some(UserData {
                user_id: "user-1".into(),
                marketplace: "US".into(),
            }),
        });
        assert!(sink.scripts().is_empty());
        assert_eq!(relay.last_user().unwrap().marketplace, "US");
    }

    #[test]
    fn user_data_failure_is_diagnostic_only() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::UserData {
            status: RequestStatus::Failed,
            data: None,
        });
        assert!(sink.scripts().is_empty());
        assert!(relay.last_user().is_none());
    }

    #[test]
    fn catalog_success_lists_every_product() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::ProductData {
            status: RequestStatus::Successful,
            products: vec![product("sku.premium", "Premium"), product("sku.family", "Family")],
            unavailable_skus: vec![],
        });

        assert_eq!(sink.event_names(), vec!["onProductsLoaded"]);
        let products = sink.details()[0]["products"].as_array().unwrap().clone();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["title"], "Premium");
        assert_eq!(products[1]["title"], "Family");
    }

    #[test]
    fn catalog_failure_dispatches_single_empty_error() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::ProductData {
            status: RequestStatus::NotSupported,
            products: vec![],
            unavailable_skus: vec![],
        });

        assert_eq!(sink.event_names(), vec!["onProductsError"]);
        assert_eq!(sink.details()[0], serde_json::json!({}));
    }

    #[test]
    fn invalid_sku_carries_its_reason() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::InvalidSku,
            receipt: None,
        });
        assert_eq!(sink.event_names(), vec!["onPurchaseError"]);
        assert_eq!(sink.details()[0]["error"], "Invalid SKU");
    }

    #[test]
    fn generic_purchase_failure_carries_its_reason() {
        let (_connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Failed,
            receipt: None,
        });
        assert_eq!(sink.details()[0]["error"], "Purchase failed");
    }

    #[test]
    fn already_owned_dispatches_without_payload() {
        let (connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::AlreadyPurchased,
            receipt: None,
        });
        assert_eq!(sink.event_names(), vec!["onPurchaseAlreadyOwned"]);
        assert!(connector.fulfillments().is_empty());
    }

    #[test]
    fn successful_purchase_without_receipt_is_dropped() {
        let (connector, sink, relay) = relay();
        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: None,
        });
        assert!(sink.scripts().is_empty());
        assert!(connector.fulfillments().is_empty());
    }

    #[test]
    fn events_are_dropped_while_web_content_is_not_ready() {
        let (connector, sink, relay) = relay();
        sink.set_ready(false);

        relay.handle(PlatformEvent::Purchase {
            status: RequestStatus::Successful,
            receipt: Some(receipt("com.kaufwerk.premium_monthly", "r-7", false)),
        });

        // The receipt is still fulfilled; only the web notification is lost.
        assert_eq!(connector.fulfillments(), vec![ReceiptId::from("r-7")]);
        assert!(sink.scripts().is_empty());
    }

    #[test]
    fn concurrent_callbacks_dispatch_independently() {
        let (_connector, sink, relay) = relay();
        let relay = &relay;

        std::thread::scope(|scope| {
            scope.spawn(|| {
                relay.handle(PlatformEvent::Purchase {
                    status: RequestStatus::Successful,
                    receipt: Some(receipt("com.kaufwerk.premium_monthly", "r-9", false)),
                });
            });
            scope.spawn(|| {
                relay.handle(PlatformEvent::ProductData {
                    status: RequestStatus::Successful,
                    products: vec![product("sku.premium", "Premium")],
                    unavailable_skus: vec![],
                });
            });
        });

        // Both dispatches landed, each as one complete, parseable script.
        let mut names = sink.event_names();
        names.sort();
        assert_eq!(names, vec!["onProductsLoaded", "onPurchaseSuccess"]);
        for script in sink.scripts() {
            crate::test_support::detail_of(&script);
        }
    }
}
