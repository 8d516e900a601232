// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kaufwerk IAP — purchase event relay, web command interface, and the
// lifecycle session that ties them to the content surface.  This crate
// bridges between the core domain types defined in `kaufwerk-core` and the
// platform seams in `kaufwerk-bridge`.

pub mod commands;
pub mod events;
pub mod relay;
pub mod session;

pub use commands::CommandInterface;
pub use events::WebEvent;
pub use relay::PurchaseRelay;
pub use session::IapSession;

#[cfg(test)]
pub(crate) mod test_support;
