// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform seams via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The purchasing side calls the
// `com.amazon.device.iap.PurchasingService` statics directly; the web side
// goes through the host shim, which owns the WebView.
//
// ## Host shim contract
//
// The hosting activity (`io.kaufwerk.shell.KaufwerkShell`) must provide:
//
//  - `void registerPurchasingListener()` — registers a `PurchasingListener`
//    whose callbacks forward to the `nativeOn*` entry points exported by
//    `kaufwerk-shell`;
//  - `void dispatchScript(String script)` — posts to the main looper and
//    calls `WebView.evaluateJavascript`; the WebView is only ever touched
//    on the UI thread;
//  - `boolean isWebContentReady()` — whether the WebView is attached;
//  - a JavascriptInterface installed under the `AmazonIAP` namespace once
//    the WebView is ready, forwarding each command to the `native*`
//    command entry points.

#![cfg(target_os = "android")]

use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;

use kaufwerk_core::error::{KaufwerkError, Result};
use kaufwerk_core::types::{FulfillmentOutcome, ReceiptId, Sku};

use crate::traits::{PurchasingConnector, WebContentSink};

/// Fully-qualified class of the Amazon purchasing entry point.
const PURCHASING_SERVICE: &str = "com/amazon/device/iap/PurchasingService";

/// Fully-qualified class of the fulfillment outcome enum.
const FULFILLMENT_RESULT: &str = "com/amazon/device/iap/model/FulfillmentResult";

/// JVM signature of the request-id return shared by the purchasing statics.
const REQUEST_ID: &str = "Lcom/amazon/device/iap/model/RequestId;";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Run `f` with an attached [`JNIEnv`] and the hosting activity.
///
/// The `JavaVM*` and activity `jobject` come from
/// `ndk_context::android_context()`, set by the NDK glue when the native
/// library is loaded.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| KaufwerkError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread_permanently()
        .map_err(|e| KaufwerkError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(KaufwerkError::Bridge(
            "Android context is null — host activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };

    f(&mut env, &activity)
}

/// Convenience: map any `jni::errors::Error` into `KaufwerkError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> KaufwerkError {
    KaufwerkError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Purchasing connector — com.amazon.device.iap.PurchasingService
// ---------------------------------------------------------------------------

/// Android implementation of the purchasing connector.
///
/// The struct is zero-sized; all state lives on the Java side. Each call
/// returns once the request is handed to the SDK — responses arrive later
/// through the listener the host shim registered.
pub struct AndroidConnector;

impl AndroidConnector {
    /// Create a new Android connector. Does not touch JNI — the first JNI
    /// call happens lazily when a trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl PurchasingConnector for AndroidConnector {
    fn register_listener(&self) -> Result<()> {
        with_env(|env, activity| {
            tracing::info!("Android: registering purchasing listener via host shim");
            env.call_method(activity, "registerPurchasingListener", "()V", &[])
                .map_err(|e| jni_err("registerPurchasingListener", e))?;
            Ok(())
        })
    }

    fn get_user_data(&self) -> Result<()> {
        with_env(|env, _activity| {
            env.call_static_method(PURCHASING_SERVICE, "getUserData", &format!("(){REQUEST_ID}"), &[])
                .map_err(|e| jni_err("PurchasingService.getUserData", e))?;
            Ok(())
        })
    }

    fn get_product_data(&self, skus: &[Sku]) -> Result<()> {
        with_env(|env, _activity| {
            tracing::debug!(count = skus.len(), "Android: requesting product data");

            // java.util.HashSet<String> of the SKU set
            let set = env
                .new_object("java/util/HashSet", "()V", &[])
                .map_err(|e| jni_err("new HashSet", e))?;
            for sku in skus {
                let j_sku: JString = env
                    .new_string(sku.as_str())
                    .map_err(|e| jni_err("new_string(sku)", e))?;
                env.call_method(&set, "add", "(Ljava/lang/Object;)Z", &[JValue::Object(&j_sku)])
                    .map_err(|e| jni_err("HashSet.add", e))?;
            }

            env.call_static_method(
                PURCHASING_SERVICE,
                "getProductData",
                &format!("(Ljava/util/Set;){REQUEST_ID}"),
                &[JValue::Object(&set)],
            )
            .map_err(|e| jni_err("PurchasingService.getProductData", e))?;
            Ok(())
        })
    }

    fn purchase(&self, sku: &Sku) -> Result<()> {
        with_env(|env, _activity| {
            tracing::info!(sku = %sku, "Android: starting purchase flow");
            let j_sku: JString = env
                .new_string(sku.as_str())
                .map_err(|e| jni_err("new_string(sku)", e))?;
            env.call_static_method(
                PURCHASING_SERVICE,
                "purchase",
                &format!("(Ljava/lang/String;){REQUEST_ID}"),
                &[JValue::Object(&j_sku)],
            )
            .map_err(|e| jni_err("PurchasingService.purchase", e))?;
            Ok(())
        })
    }

    fn get_purchase_updates(&self, reset: bool) -> Result<()> {
        with_env(|env, _activity| {
            env.call_static_method(
                PURCHASING_SERVICE,
                "getPurchaseUpdates",
                &format!("(Z){REQUEST_ID}"),
                &[JValue::Bool(reset as u8)],
            )
            .map_err(|e| jni_err("PurchasingService.getPurchaseUpdates", e))?;
            Ok(())
        })
    }

    fn notify_fulfillment(
        &self,
        receipt_id: &ReceiptId,
        outcome: FulfillmentOutcome,
    ) -> Result<()> {
        with_env(|env, _activity| {
            tracing::debug!(receipt_id = %receipt_id, outcome = outcome.platform_constant(), "Android: notifying fulfillment");
            let j_receipt: JString = env
                .new_string(receipt_id.as_str())
                .map_err(|e| jni_err("new_string(receipt_id)", e))?;
            let j_outcome = env
                .get_static_field(
                    FULFILLMENT_RESULT,
                    outcome.platform_constant(),
                    &format!("L{FULFILLMENT_RESULT};"),
                )
                .map_err(|e| jni_err("FulfillmentResult constant", e))?
                .l()
                .map_err(|e| jni_err("FulfillmentResult->l", e))?;
            env.call_static_method(
                PURCHASING_SERVICE,
                "notifyFulfillment",
                &format!("(Ljava/lang/String;L{FULFILLMENT_RESULT};)V"),
                &[JValue::Object(&j_receipt), JValue::Object(&j_outcome)],
            )
            .map_err(|e| jni_err("PurchasingService.notifyFulfillment", e))?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Web content sink — host shim WebView
// ---------------------------------------------------------------------------

/// Web-content sink backed by the host shim's WebView.
///
/// The shim posts every script to the main looper before evaluating, which
/// upholds the sink contract that content mutation happens only on the
/// thread that owns the surface.
pub struct AndroidWebSink;

impl AndroidWebSink {
    pub fn new() -> Self {
        Self
    }
}

impl WebContentSink for AndroidWebSink {
    fn is_ready(&self) -> bool {
        with_env(|env, activity| {
            env.call_method(activity, "isWebContentReady", "()Z", &[])
                .map_err(|e| jni_err("isWebContentReady", e))?
                .z()
                .map_err(|e| jni_err("isWebContentReady->z", e))
        })
        .unwrap_or(false)
    }

    fn eval_script(&self, script: &str) -> Result<()> {
        with_env(|env, activity| {
            let j_script: JString = env
                .new_string(script)
                .map_err(|e| jni_err("new_string(script)", e))?;
            env.call_method(
                activity,
                "dispatchScript",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_script)],
            )
            .map_err(|e| jni_err("dispatchScript", e))?;
            Ok(())
        })
    }
}
