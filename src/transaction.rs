//! Plain transaction value types for preimage construction.
//! Fields mirror the wire layout: fixed-width LE integers plus opaque script bytes.

use alloc::vec::Vec;

/// One transaction input. Carries no spending script: for the segwit v0
/// signing algorithm the scriptCode is supplied by the caller at signing time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxIn {
    /// Previous output txid in wire (internal) order.
    pub prev_out_txid: [u8; 32],
    /// Previous output index.
    pub prev_out_vout: u32,
    /// nSequence.
    pub sequence: u32,
}

/// One transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxOut {
    /// Value in satoshis.
    pub value: u64,
    /// scriptPubKey as opaque bytes (wire format: VarInt length + these bytes).
    pub script_pubkey: Vec<u8>,
}

/// An unsigned transaction: ordered inputs and outputs plus nVersion and nLockTime.
/// Read-only view for sighash computation; nothing here is mutated by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    /// nVersion (signed, 4 bytes LE on the wire).
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    /// nLockTime (4 bytes LE on the wire).
    pub lock_time: u32,
}
