//! BIP-143 segwit v0 signature hash: preimage construction + sha256d.
//! no_std; manual consensus encoding only. The preimage commits to the spent
//! output's value, not just its script, so the caller supplies both.

use alloc::vec::Vec;

use bitcoin_hashes::{sha256d, Hash};
use byteorder::{ByteOrder, LittleEndian};

use crate::compact_size::{encoded_len, write_compact_size};
use crate::error::SigMsgError;
use crate::transaction::{Transaction, TxOut};

/// SIGHASH_ALL: commit to every input and every output.
pub const SIGHASH_ALL: u8 = 0x01;
/// SIGHASH_NONE: commit to no outputs.
pub const SIGHASH_NONE: u8 = 0x02;
/// SIGHASH_SINGLE: commit only to the output paired with the signed input.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// SIGHASH_ANYONECANPAY modifier: commit only to the signed input, not the input set.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Base mode mask (low 5 bits of the flag byte).
const MODE_MASK: u8 = 0x1f;

const ZERO_HASH: [u8; 32] = [0u8; 32];

/// Base sighash mode: which outputs the signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashMode {
    All,
    None,
    Single,
}

/// Decoded sighash flag: base mode plus the ANYONECANPAY modifier.
///
/// Decoded once at entry; the *raw* flag byte is what the preimage commits to
/// (widened to a 4-byte LE word), so re-encoding never touches the wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SighashType {
    pub mode: SighashMode,
    pub anyone_can_pay: bool,
}

impl SighashType {
    /// Decodes a consensus flag byte. Any base value other than NONE or
    /// SINGLE behaves as ALL, matching reference validation.
    pub fn from_consensus(byte: u8) -> Self {
        let mode = match byte & MODE_MASK {
            SIGHASH_NONE => SighashMode::None,
            SIGHASH_SINGLE => SighashMode::Single,
            _ => SighashMode::All,
        };
        SighashType {
            mode,
            anyone_can_pay: byte & SIGHASH_ANYONECANPAY != 0,
        }
    }

    /// Re-encodes as the canonical consensus byte.
    pub fn to_consensus(self) -> u8 {
        let base = match self.mode {
            SighashMode::All => SIGHASH_ALL,
            SighashMode::None => SIGHASH_NONE,
            SighashMode::Single => SIGHASH_SINGLE,
        };
        if self.anyone_can_pay {
            base | SIGHASH_ANYONECANPAY
        } else {
            base
        }
    }
}

fn sha256d_32(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

/// hashPrevouts: sha256d over every input's outpoint (32 txid + 4 vout LE) in order.
fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut buf = Vec::with_capacity(36 * tx.inputs.len());
    for inp in &tx.inputs {
        buf.extend_from_slice(&inp.prev_out_txid);
        let mut vout_buf = [0u8; 4];
        LittleEndian::write_u32(&mut vout_buf, inp.prev_out_vout);
        buf.extend_from_slice(&vout_buf);
    }
    sha256d_32(&buf)
}

/// hashSequence: sha256d over every input's nSequence (4 bytes LE) in order.
fn hash_sequences(tx: &Transaction) -> [u8; 32] {
    let mut buf = Vec::with_capacity(4 * tx.inputs.len());
    for inp in &tx.inputs {
        let mut seq_buf = [0u8; 4];
        LittleEndian::write_u32(&mut seq_buf, inp.sequence);
        buf.extend_from_slice(&seq_buf);
    }
    sha256d_32(&buf)
}

/// Serialize one output in CTxOut format (8 value LE + compact size + script).
fn write_output(buf: &mut Vec<u8>, out: &TxOut) {
    let mut val_buf = [0u8; 8];
    LittleEndian::write_u64(&mut val_buf, out.value);
    buf.extend_from_slice(&val_buf);
    write_compact_size(buf, out.script_pubkey.len() as u64);
    buf.extend_from_slice(&out.script_pubkey);
}

/// hashOutputs in ALL mode: sha256d over every output's CTxOut encoding in order.
fn hash_all_outputs(tx: &Transaction) -> [u8; 32] {
    let mut cap = 0usize;
    for out in &tx.outputs {
        cap += 8 + encoded_len(out.script_pubkey.len() as u64) + out.script_pubkey.len();
    }
    let mut buf = Vec::with_capacity(cap);
    for out in &tx.outputs {
        write_output(&mut buf, out);
    }
    sha256d_32(&buf)
}

/// hashOutputs in SINGLE mode: sha256d over the one output paired with the input.
fn hash_single_output(out: &TxOut) -> [u8; 32] {
    let mut buf =
        Vec::with_capacity(8 + encoded_len(out.script_pubkey.len() as u64) + out.script_pubkey.len());
    write_output(&mut buf, out);
    sha256d_32(&buf)
}

/// Builds the BIP-143 signing preimage for one input of `tx`.
///
/// `script_code` is the script being spent (caller-supplied, e.g. the P2PKH
/// template for a P2WPKH program); `value` is the satoshi amount of the
/// referenced previous output. The returned buffer is NOT hashed: sign
/// sha256d of it (see [`segwit_v0_sighash`]).
///
/// SINGLE with `input_index` past the outputs array is a defined protocol
/// path (zero hashOutputs), not an error. An `input_index` past the *inputs*
/// array is a contract violation and fails fast.
pub fn segwit_v0_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
    hash_type: u8,
) -> Result<Vec<u8>, SigMsgError> {
    if input_index >= tx.inputs.len() {
        return Err(SigMsgError::InputIndexOutOfRange(input_index, tx.inputs.len()));
    }
    let ty = SighashType::from_consensus(hash_type);

    let prevouts_digest = if ty.anyone_can_pay {
        ZERO_HASH
    } else {
        hash_prevouts(tx)
    };

    let sequences_digest = if ty.anyone_can_pay || ty.mode != SighashMode::All {
        ZERO_HASH
    } else {
        hash_sequences(tx)
    };

    let outputs_digest = match ty.mode {
        SighashMode::All => hash_all_outputs(tx),
        // SINGLE past the outputs array falls back to the zero hash. This is
        // a protocol quirk carried over from legacy signing; keep it exact.
        SighashMode::Single if input_index < tx.outputs.len() => {
            hash_single_output(&tx.outputs[input_index])
        }
        _ => ZERO_HASH,
    };

    let input = &tx.inputs[input_index];

    // Fixed fields total 156 bytes; only the scriptCode slice varies.
    let cap = 156 + encoded_len(script_code.len() as u64) + script_code.len();
    let mut out = Vec::with_capacity(cap);

    // nVersion (4 bytes LE, signed)
    let mut ver_buf = [0u8; 4];
    LittleEndian::write_i32(&mut ver_buf, tx.version);
    out.extend_from_slice(&ver_buf);

    out.extend_from_slice(&prevouts_digest);
    out.extend_from_slice(&sequences_digest);

    // Outpoint of the signed input (32 txid + 4 vout LE)
    out.extend_from_slice(&input.prev_out_txid);
    let mut vout_buf = [0u8; 4];
    LittleEndian::write_u32(&mut vout_buf, input.prev_out_vout);
    out.extend_from_slice(&vout_buf);

    // scriptCode (VarInt length + bytes)
    write_compact_size(&mut out, script_code.len() as u64);
    out.extend_from_slice(script_code);

    // Amount of the spent output (8 bytes LE)
    let mut val_buf = [0u8; 8];
    LittleEndian::write_u64(&mut val_buf, value);
    out.extend_from_slice(&val_buf);

    // nSequence of the signed input
    let mut seq_buf = [0u8; 4];
    LittleEndian::write_u32(&mut seq_buf, input.sequence);
    out.extend_from_slice(&seq_buf);

    out.extend_from_slice(&outputs_digest);

    // nLockTime (4 bytes LE)
    let mut lt_buf = [0u8; 4];
    LittleEndian::write_u32(&mut lt_buf, tx.lock_time);
    out.extend_from_slice(&lt_buf);

    // nHashType: the flag byte widened to a full 4-byte LE word. The widening
    // is part of the committed format; never narrow this to one byte.
    let mut ht_buf = [0u8; 4];
    LittleEndian::write_u32(&mut ht_buf, hash_type as u32);
    out.extend_from_slice(&ht_buf);

    Ok(out)
}

/// sha256d of the signing preimage: the digest an ECDSA signature actually signs.
pub fn segwit_v0_sighash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
    hash_type: u8,
) -> Result<[u8; 32], SigMsgError> {
    let preimage = segwit_v0_preimage(tx, input_index, script_code, value, hash_type)?;
    Ok(sha256d_32(&preimage))
}
