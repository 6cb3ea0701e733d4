//! Cart line items.

use print_preflight::{IssueCode, PreflightReport};
use print_types::PrinterDims;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::refs::RelationshipRef;
use crate::store::{DocumentStore, StoreError};

/// Collection cart line items are persisted under.
pub const CART_COLLECTION: &str = "cart-items";

/// Errors from cart operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Preflight found the configuration unprintable; the message is
    /// the preflight's own actionable explanation.
    #[error("cannot add to cart: {0}")]
    Blocked(String),

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A frozen snapshot of a configured quote, taken at add-to-cart time.
///
/// Nothing here is recomputed after the add: later catalog or policy
/// changes never reprice a cart. Process options are stored as their
/// stable string keys so the snapshot survives catalog evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Storage key of the uploaded model file.
    pub file_key: String,
    /// Original file name, for display.
    pub file_name: String,
    /// The owning customer.
    pub customer: RelationshipRef,
    /// Technology key (`"sla"` / `"fdm"`).
    pub technology: String,
    /// Material key.
    pub material: String,
    /// Quality key (`"standard"` / `"pro"`).
    pub quality: String,
    /// Chosen orientation key.
    pub orientation: String,
    /// Oriented printer-frame dimensions at the chosen scale, mm.
    pub dims_mm: PrinterDims,
    /// Model volume at the chosen scale, cm³.
    pub volume_cm3: f64,
    /// The quoted price, frozen.
    pub price: f64,
    /// Estimated print duration, minutes.
    pub eta_minutes: u32,
}

/// Persist a line item, unless preflight blocks it.
///
/// Only a `Critical` preflight blocks; advisory risk goes into the
/// cart unimpeded. The blocking message prefers the bed-size issue
/// (which names the offending dimension against the bed) and falls
/// back to the preflight summary.
///
/// # Errors
///
/// [`CartError::Blocked`] when preflight is critical, or the
/// underlying [`StoreError`].
pub async fn add_to_cart<S: DocumentStore>(
    store: &S,
    preflight: &PreflightReport,
    item: &CartLineItem,
) -> Result<serde_json::Value, CartError> {
    if preflight.is_blocking() {
        let message = preflight
            .issue(IssueCode::ExceedsBuildVolume)
            .map_or_else(|| preflight.summary.clone(), |issue| issue.message.clone());
        warn!(file = %item.file_name, %message, "cart add blocked by preflight");
        return Err(CartError::Blocked(message));
    }

    let data =
        serde_json::to_value(item).map_err(|err| StoreError::Backend(err.to_string()))?;
    let created = store.create(CART_COLLECTION, data).await?;
    debug!(file = %item.file_name, price = item.price, "cart line item created");
    Ok(created)
}
