//! ECDSA witness construction for P2WPKH spends (DER signature + pubkey stack).
//! no_std; the signature itself is produced outside this crate, this module
//! only puts it into the form consensus rules expect in witness data.

#![cfg(feature = "ecdsa-witness")]

use alloc::vec::Vec;

use k256::ecdsa::Signature;

use crate::encode::Witness;
use crate::error::SigMsgError;

/// Compressed SEC1 public key length.
const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Encodes a 64-byte compact (r ‖ s) ECDSA signature as DER with the sighash
/// flag byte appended. `s` is normalized to the low half of the curve order
/// first; high-S signatures are non-standard on the network.
pub fn encode_ecdsa_signature(compact: &[u8; 64], hash_type: u8) -> Result<Vec<u8>, SigMsgError> {
    let sig = Signature::from_slice(compact).map_err(|_| SigMsgError::InvalidSignature)?;
    let sig = sig.normalize_s().unwrap_or(sig);
    let der = sig.to_der();
    let der_bytes = der.as_bytes();
    let mut out = Vec::with_capacity(der_bytes.len() + 1);
    out.extend_from_slice(der_bytes);
    out.push(hash_type);
    Ok(out)
}

/// Assembles the two-element P2WPKH witness stack: `[signature, pubkey]`.
pub fn p2wpkh_witness(
    compact_sig: &[u8; 64],
    pubkey: &[u8],
    hash_type: u8,
) -> Result<Witness, SigMsgError> {
    if pubkey.len() != COMPRESSED_PUBKEY_LEN {
        return Err(SigMsgError::InvalidPublicKeyLength(pubkey.len()));
    }
    let signature = encode_ecdsa_signature(compact_sig, hash_type)?;
    let mut stack = Vec::with_capacity(2);
    stack.push(signature);
    stack.push(pubkey.to_vec());
    Ok(stack)
}
