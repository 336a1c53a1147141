//! Key Module
//!
//! Typed keys and their encoding into a flat string namespace.
//!
//! ## Responsibilities
//! - Define the closed set of key kinds (`Key`, `KeyElement`)
//! - Encode keys to `EncodedKey`, rejecting reserved text
//! - Decode stored keys for listing operations
//! - Convert dynamic JSON values into keys (`InvalidKeyType` on failure)

mod codec;
mod types;

pub use codec::{decode, encode, EncodedKey, ELEMENT_SEPARATOR, NUMERIC_PREFIX};
pub use types::{Key, KeyElement};
