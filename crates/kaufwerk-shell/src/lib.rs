// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kaufwerk Shell — host-side glue for the hybrid app shell.
//
// Entry point of the native library loaded by the host activity.
// Initialises logging, wires the platform seams into a process-wide
// purchasing session, and (on Android) exports the JNI surface the host
// shim calls into.

use std::sync::{Arc, OnceLock};

use kaufwerk_bridge::{platform_connector, platform_sink};
use kaufwerk_core::config::IapConfig;
use kaufwerk_iap::IapSession;

#[cfg(target_os = "android")]
mod jni_glue;

static SESSION: OnceLock<IapSession> = OnceLock::new();

/// Install the tracing subscriber.  Safe to call more than once; only the
/// first call takes effect.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("Kaufwerk shell starting");
    }
}

/// The process-wide purchasing session, created on first use with the
/// platform seams for this build.
pub fn session() -> &'static IapSession {
    SESSION.get_or_init(|| {
        IapSession::new(
            IapConfig::default(),
            Arc::from(platform_connector()),
            Arc::from(platform_sink()),
        )
    })
}
