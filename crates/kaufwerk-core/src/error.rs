// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kaufwerk.

use thiserror::Error;

/// Top-level error type for all Kaufwerk operations.
#[derive(Debug, Error)]
pub enum KaufwerkError {
    // -- Purchasing service --
    #[error("purchasing service call failed: {0}")]
    Purchasing(String),

    // -- Web content --
    #[error("web content script dispatch failed: {0}")]
    WebDispatch(String),

    #[error("web content surface not attached")]
    WebContentUnavailable,

    // -- Serialization --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KaufwerkError>;
