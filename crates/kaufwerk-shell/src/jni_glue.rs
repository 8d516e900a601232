// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI surface exported to the host shim (`io.kaufwerk.shell.KaufwerkShell`).
//
// The shim owns the Android objects — the registered `PurchasingListener`
// and the WebView — and forwards every platform callback and every
// web-originated command here.  Status codes cross the boundary as
// integers (see `RequestStatus::from_code`); product and receipt lists
// cross as JSON arrays.  Callbacks with a non-success status may pass
// empty strings for the value arguments.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JClass, JString};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jint};
use tracing::{error, warn};

use kaufwerk_core::types::{
    PlatformEvent, Product, Receipt, ReceiptId, RequestStatus, Sku, UserData,
};

use crate::{init_logging, session};

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Read a Java string, logging on failure.
fn get_string(env: &mut JNIEnv, s: &JString) -> Option<String> {
    match env.get_string(s) {
        Ok(value) => Some(value.into()),
        Err(e) => {
            error!(error = %e, "failed to read Java string");
            None
        }
    }
}

/// Map a status code, logging unknown codes instead of dropping them
/// silently.
fn status_from(code: jint) -> Option<RequestStatus> {
    let status = RequestStatus::from_code(code);
    if status.is_none() {
        warn!(code, "unknown request status code from platform");
    }
    status
}

/// Parse a JSON array handed over by the shim.  A malformed or unreadable
/// payload degrades to an empty list.
fn parse_json_list<T: serde::de::DeserializeOwned>(
    env: &mut JNIEnv,
    s: &JString,
    what: &str,
) -> Vec<T> {
    let Some(raw) = get_string(env, s) else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            error!(error = %e, what, "failed to parse JSON list from shim");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle entry points
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnCreate(
    _env: JNIEnv,
    _class: JClass,
) {
    init_logging();
    if let Err(e) = session().attach() {
        error!(error = %e, "failed to attach purchasing session");
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnResume(
    _env: JNIEnv,
    _class: JClass,
) {
    session().on_resume();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnDestroy(
    _env: JNIEnv,
    _class: JClass,
) {
    session().detach();
}

// ---------------------------------------------------------------------------
// Purchasing listener callbacks
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnUserData(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
    user_id: JString,
    marketplace: JString,
) {
    let Some(status) = status_from(status) else {
        return;
    };
    let data = match (get_string(&mut env, &user_id), get_string(&mut env, &marketplace)) {
        (Some(user_id), Some(marketplace)) if status == RequestStatus::Successful => {
            Some(UserData { user_id, marketplace })
        }
        _ => None,
    };
    session().handle_platform_event(PlatformEvent::UserData { status, data });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnProductData(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
    products_json: JString,
    unavailable_skus_json: JString,
) {
    let Some(status) = status_from(status) else {
        return;
    };
    let products: Vec<Product> = parse_json_list(&mut env, &products_json, "products");
    let unavailable_skus: Vec<Sku> =
        parse_json_list(&mut env, &unavailable_skus_json, "unavailable SKUs");
    session().handle_platform_event(PlatformEvent::ProductData {
        status,
        products,
        unavailable_skus,
    });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnPurchase(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
    sku: JString,
    receipt_id: JString,
    canceled: jboolean,
) {
    let Some(status) = status_from(status) else {
        return;
    };
    let receipt = if status == RequestStatus::Successful {
        match (get_string(&mut env, &sku), get_string(&mut env, &receipt_id)) {
            (Some(sku), Some(receipt_id)) if !receipt_id.is_empty() => Some(Receipt {
                sku: Sku(sku),
                receipt_id: ReceiptId(receipt_id),
                canceled: canceled != JNI_FALSE,
            }),
            _ => None,
        }
    } else {
        None
    };
    session().handle_platform_event(PlatformEvent::Purchase { status, receipt });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeOnPurchaseUpdates(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
    receipts_json: JString,
    has_more: jboolean,
) {
    let Some(status) = status_from(status) else {
        return;
    };
    let receipts: Vec<Receipt> = parse_json_list(&mut env, &receipts_json, "receipts");
    session().handle_platform_event(PlatformEvent::PurchaseUpdates {
        status,
        receipts,
        has_more: has_more != JNI_FALSE,
    });
}

// ---------------------------------------------------------------------------
// Web command entry points (AmazonIAP namespace)
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativePurchasePremium(
    _env: JNIEnv,
    _class: JClass,
) {
    session().commands().purchase_premium();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativePurchaseFamily(
    _env: JNIEnv,
    _class: JClass,
) {
    session().commands().purchase_family();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeRefreshPurchases(
    _env: JNIEnv,
    _class: JClass,
) {
    session().commands().refresh_purchases();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_io_kaufwerk_shell_KaufwerkShell_nativeIsAmazonDevice(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    if session().commands().is_amazon_device() {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}
