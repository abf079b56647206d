//! Script construction for P2WPKH spends: the witness program carried by an
//! output, and the P2PKH-shaped scriptCode that segwit v0 signing commits to.

use alloc::vec::Vec;

use bitcoin_hashes::{hash160, Hash};

use crate::error::SigMsgError;

/// P2WPKH script prefix: OP_0 (0x00) push 20 bytes (0x14).
const P2WPKH_SCRIPT_PREFIX: &[u8] = &[0x00, 0x14];

/// Compressed SEC1 public key length.
const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Builds the P2WPKH output script (witness program) for a compressed public key:
/// `OP_0 <20-byte hash160(pubkey)>`.
pub fn p2wpkh_script(pubkey: &[u8]) -> Result<Vec<u8>, SigMsgError> {
    if pubkey.len() != COMPRESSED_PUBKEY_LEN {
        return Err(SigMsgError::InvalidPublicKeyLength(pubkey.len()));
    }
    let digest = hash160::Hash::hash(pubkey).to_byte_array();
    let mut out = Vec::with_capacity(22);
    out.extend_from_slice(P2WPKH_SCRIPT_PREFIX);
    out.extend_from_slice(&digest);
    Ok(out)
}

/// Builds the canonical P2PKH script for a 20-byte pubkey hash:
/// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut out = Vec::with_capacity(25);
    out.extend_from_slice(&[0x76, 0xa9, 0x14]);
    out.extend_from_slice(pubkey_hash);
    out.extend_from_slice(&[0x88, 0xac]);
    out
}

/// Derives the signing scriptCode for a P2WPKH input: the 20-byte program is
/// lifted out of the witness program and wrapped in the P2PKH template.
pub fn p2wpkh_script_code(witness_program: &[u8]) -> Result<Vec<u8>, SigMsgError> {
    if witness_program.len() == 22 && witness_program.starts_with(P2WPKH_SCRIPT_PREFIX) {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&witness_program[2..22]);
        Ok(p2pkh_script(&hash))
    } else {
        Err(SigMsgError::NotP2wpkh)
    }
}
