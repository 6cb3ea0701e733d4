//! Commerce seam for the print estimation pipeline.
//!
//! Three independent pieces:
//!
//! - **[`RelationshipRef`]**: one typed union for every wire shape a
//!   document relationship arrives in, with a single
//!   [`canonical_id`](RelationshipRef::canonical_id) accessor.
//! - **[`DocumentStore`] + [`add_to_cart`]**: persistence behind a
//!   trait; cart line items are frozen snapshots of the quote at add
//!   time, and a critical preflight blocks the add with the
//!   preflight's own actionable message.
//! - **[`PairingCodes`]**: short-lived device pairing codes; issue a
//!   short random code against a token, claim it once, expiry and a
//!   per-user cap enforced on access.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cart;
mod pairing;
mod refs;
mod store;

pub use cart::{add_to_cart, CartError, CartLineItem, CART_COLLECTION};
pub use pairing::{PairingCodes, PairingError, DEFAULT_CODE_TTL, PER_USER_CODE_CAP};
pub use refs::RelationshipRef;
pub use store::{DocumentStore, StoreError, StoreResult};
