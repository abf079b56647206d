//! Wire serialization of transactions: legacy framing for txids and unsigned
//! round trips, marker/flag framing for broadcasting witness-bearing spends.
//! no_std; manual consensus encoding only.

use alloc::vec::Vec;

use bitcoin_hashes::{sha256d, Hash};
use byteorder::{ByteOrder, LittleEndian};

use crate::compact_size::{encoded_len, read_compact_size, write_compact_size};
use crate::error::SigMsgError;
use crate::transaction::{Transaction, TxIn, TxOut};

/// Witness stack for one input (ordered stack elements, bottom first).
pub type Witness = Vec<Vec<u8>>;

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

/// Smallest possible input on the wire: outpoint + empty scriptSig + sequence.
const MIN_INPUT_WIRE_LEN: usize = 32 + 4 + 1 + 4;
/// Smallest possible output on the wire: value + empty script.
const MIN_OUTPUT_WIRE_LEN: usize = 8 + 1;

/// Serializes `tx` with legacy framing and empty scriptSigs.
/// This is the byte form an unsigned witness-spend transaction takes on the
/// wire, and the form the txid is computed over.
pub fn serialize_unsigned(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::with_capacity(unsigned_wire_len(tx));
    write_version(&mut out, tx.version);
    write_inputs(&mut out, &tx.inputs);
    write_outputs(&mut out, &tx.outputs);
    write_lock_time(&mut out, tx.lock_time);
    out
}

/// Serializes `tx` with segwit marker/flag framing and one witness stack per
/// input, ready for hex encoding and broadcast. scriptSigs stay empty: this
/// serializer covers native witness spends only.
pub fn serialize_with_witness(
    tx: &Transaction,
    witnesses: &[Witness],
) -> Result<Vec<u8>, SigMsgError> {
    if witnesses.len() != tx.inputs.len() {
        return Err(SigMsgError::WitnessCountMismatch(witnesses.len(), tx.inputs.len()));
    }

    let mut cap = unsigned_wire_len(tx) + 2;
    for stack in witnesses {
        cap += encoded_len(stack.len() as u64);
        for element in stack {
            cap += encoded_len(element.len() as u64) + element.len();
        }
    }
    let mut out = Vec::with_capacity(cap);

    write_version(&mut out, tx.version);
    out.push(SEGWIT_MARKER);
    out.push(SEGWIT_FLAG);
    write_inputs(&mut out, &tx.inputs);
    write_outputs(&mut out, &tx.outputs);
    for stack in witnesses {
        write_compact_size(&mut out, stack.len() as u64);
        for element in stack {
            write_compact_size(&mut out, element.len() as u64);
            out.extend_from_slice(element);
        }
    }
    write_lock_time(&mut out, tx.lock_time);
    Ok(out)
}

/// Txid: sha256d over the legacy serialization, in wire (internal) byte order.
/// Witness data never enters the txid, so this holds signed or not.
pub fn txid(tx: &Transaction) -> [u8; 32] {
    sha256d::Hash::hash(&serialize_unsigned(tx)).to_byte_array()
}

/// Decodes a legacy-framed unsigned transaction.
///
/// Strict by design: scriptSigs must be empty (the value types carry none),
/// and trailing bytes fail the parse. Marker/flag framed bytes are not
/// accepted here.
pub fn decode_unsigned(data: &[u8]) -> Result<Transaction, SigMsgError> {
    let mut cur = data;

    let version = LittleEndian::read_i32(take(&mut cur, 4)?);

    let input_count = read_count(&mut cur, MIN_INPUT_WIRE_LEN)?;
    let mut inputs = Vec::with_capacity(input_count);
    for i in 0..input_count {
        let mut prev_out_txid = [0u8; 32];
        prev_out_txid.copy_from_slice(take(&mut cur, 32)?);
        let prev_out_vout = LittleEndian::read_u32(take(&mut cur, 4)?);
        let (script_len, consumed) = read_compact_size(cur).ok_or(SigMsgError::IncompleteData)?;
        cur = &cur[consumed..];
        if script_len != 0 {
            return Err(SigMsgError::ScriptSigPresent(i));
        }
        let sequence = LittleEndian::read_u32(take(&mut cur, 4)?);
        inputs.push(TxIn {
            prev_out_txid,
            prev_out_vout,
            sequence,
        });
    }

    let output_count = read_count(&mut cur, MIN_OUTPUT_WIRE_LEN)?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = LittleEndian::read_u64(take(&mut cur, 8)?);
        let (script_len, consumed) = read_compact_size(cur).ok_or(SigMsgError::IncompleteData)?;
        cur = &cur[consumed..];
        let script_pubkey = take(&mut cur, script_len as usize)?.to_vec();
        outputs.push(TxOut { value, script_pubkey });
    }

    let lock_time = LittleEndian::read_u32(take(&mut cur, 4)?);

    if !cur.is_empty() {
        return Err(SigMsgError::TrailingData(cur.len()));
    }
    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Exact legacy wire length: every field is fixed-width except the scripts.
fn unsigned_wire_len(tx: &Transaction) -> usize {
    let mut cap = 4 + encoded_len(tx.inputs.len() as u64);
    cap += tx.inputs.len() * MIN_INPUT_WIRE_LEN;
    cap += encoded_len(tx.outputs.len() as u64);
    for out in &tx.outputs {
        cap += 8 + encoded_len(out.script_pubkey.len() as u64) + out.script_pubkey.len();
    }
    cap + 4
}

fn write_version(out: &mut Vec<u8>, version: i32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_i32(&mut buf, version);
    out.extend_from_slice(&buf);
}

fn write_lock_time(out: &mut Vec<u8>, lock_time: u32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, lock_time);
    out.extend_from_slice(&buf);
}

/// Each input: PrevOut (32 + 4) + scriptSig length (VarInt, always 0) + nSequence (4).
fn write_inputs(out: &mut Vec<u8>, inputs: &[TxIn]) {
    write_compact_size(out, inputs.len() as u64);
    for inp in inputs {
        out.extend_from_slice(&inp.prev_out_txid);
        let mut vout_buf = [0u8; 4];
        LittleEndian::write_u32(&mut vout_buf, inp.prev_out_vout);
        out.extend_from_slice(&vout_buf);
        write_compact_size(out, 0);
        let mut seq_buf = [0u8; 4];
        LittleEndian::write_u32(&mut seq_buf, inp.sequence);
        out.extend_from_slice(&seq_buf);
    }
}

/// Each output: value (8 LE) + scriptPubKey length (VarInt) + scriptPubKey bytes.
fn write_outputs(out: &mut Vec<u8>, outputs: &[TxOut]) {
    write_compact_size(out, outputs.len() as u64);
    for txout in outputs {
        let mut val_buf = [0u8; 8];
        LittleEndian::write_u64(&mut val_buf, txout.value);
        out.extend_from_slice(&val_buf);
        write_compact_size(out, txout.script_pubkey.len() as u64);
        out.extend_from_slice(&txout.script_pubkey);
    }
}

/// Advances the cursor past `n` bytes and returns them.
fn take<'a>(cur: &mut &'a [u8], n: usize) -> Result<&'a [u8], SigMsgError> {
    if cur.len() < n {
        return Err(SigMsgError::IncompleteData);
    }
    let (head, tail) = cur.split_at(n);
    *cur = tail;
    Ok(head)
}

/// Reads a vin/vout count, rejecting counts the remaining bytes cannot hold
/// before any allocation happens.
fn read_count(cur: &mut &[u8], min_item_len: usize) -> Result<usize, SigMsgError> {
    let (count, consumed) = read_compact_size(cur).ok_or(SigMsgError::IncompleteData)?;
    *cur = &cur[consumed..];
    if count as usize > cur.len() / min_item_len {
        return Err(SigMsgError::IncompleteData);
    }
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn test_transaction() -> Transaction {
        Transaction {
            version: 2,
            inputs: vec![TxIn {
                prev_out_txid: [0xab; 32],
                prev_out_vout: 3,
                sequence: 0xffff_fffd,
            }],
            outputs: vec![
                TxOut {
                    value: 1000,
                    script_pubkey: vec![0x00, 0x14, 0xaa, 0xbb],
                },
                TxOut {
                    value: 0,
                    script_pubkey: vec![],
                },
            ],
            lock_time: 7,
        }
    }

    #[test]
    fn serialize_decode_round_trip() {
        let tx = test_transaction();
        let bytes = serialize_unsigned(&tx);
        assert_eq!(bytes.len(), unsigned_wire_len(&tx));
        let back = decode_unsigned(&bytes).expect("decode");
        assert_eq!(back, tx);
    }

    #[test]
    fn txid_matches_sha256d_of_legacy_bytes() {
        let tx = test_transaction();
        let expected = sha256d::Hash::hash(&serialize_unsigned(&tx)).to_byte_array();
        assert_eq!(txid(&tx), expected);
        assert_eq!(txid(&tx), txid(&tx.clone()));
    }

    #[test]
    fn witness_serialization_frames_marker_and_flag() {
        let tx = test_transaction();
        let witness = vec![vec![vec![0x01, 0x02], vec![0x03]]];
        let bytes = serialize_with_witness(&tx, &witness).expect("serialize");
        assert_eq!(&bytes[4..6], &[SEGWIT_MARKER, SEGWIT_FLAG]);
        // Stack encodes as: 02 | 02 0102 | 01 03, right before nLockTime.
        let tail = &bytes[bytes.len() - 4 - 6..bytes.len() - 4];
        assert_eq!(tail, &[0x02, 0x02, 0x01, 0x02, 0x01, 0x03]);
    }

    #[test]
    fn witness_count_must_match_inputs() {
        let tx = test_transaction();
        let err = serialize_with_witness(&tx, &[]).unwrap_err();
        assert_eq!(err, SigMsgError::WitnessCountMismatch(0, 1));
    }

    #[test]
    fn decode_rejects_script_sig() {
        let tx = test_transaction();
        let mut bytes = serialize_unsigned(&tx);
        // scriptSig length byte sits after version + vin count + outpoint.
        bytes[4 + 1 + 36] = 1;
        bytes.insert(4 + 1 + 37, 0x51);
        assert_eq!(decode_unsigned(&bytes).unwrap_err(), SigMsgError::ScriptSigPresent(0));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let tx = test_transaction();
        let mut bytes = serialize_unsigned(&tx);
        bytes.push(0x00);
        assert_eq!(decode_unsigned(&bytes).unwrap_err(), SigMsgError::TrailingData(1));
    }

    #[test]
    fn decode_rejects_truncation_and_count_bombs() {
        let tx = test_transaction();
        let bytes = serialize_unsigned(&tx);
        assert_eq!(
            decode_unsigned(&bytes[..bytes.len() - 1]).unwrap_err(),
            SigMsgError::IncompleteData
        );

        // A vin count far past what the buffer can hold must fail before
        // any allocation, not during the input loop.
        let mut bomb = vec![0x01, 0x00, 0x00, 0x00];
        bomb.extend_from_slice(&[0xfe, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(decode_unsigned(&bomb).unwrap_err(), SigMsgError::IncompleteData);
    }
}
