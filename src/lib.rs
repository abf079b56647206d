#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Needed for Vec
extern crate alloc;

pub mod compact_size;
pub mod encode;
pub mod error;
pub mod script;
pub mod sighash;
pub mod transaction;
pub mod witness;

pub use error::SigMsgError;
pub use sighash::{segwit_v0_preimage, segwit_v0_sighash, SighashMode, SighashType};
pub use transaction::{Transaction, TxIn, TxOut};
