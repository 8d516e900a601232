// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kaufwerk — Native platform seams for the purchase bridge.
//
// This crate defines the two traits the relay is written against — the
// platform purchasing service and the embedded web content — together with
// the Android (JNI) implementations and a stub for desktop/CI builds.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

use traits::{PurchasingConnector, WebContentSink};

/// Purchasing-service connector for the target operating system.
pub fn platform_connector() -> Box<dyn PurchasingConnector> {
    #[cfg(target_os = "android")]
    {
        Box::new(android::AndroidConnector::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        Box::new(stub::StubConnector)
    }
}

/// Web-content sink for the target operating system.
pub fn platform_sink() -> Box<dyn WebContentSink> {
    #[cfg(target_os = "android")]
    {
        Box::new(android::AndroidWebSink::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        Box::new(stub::StubSink)
    }
}
