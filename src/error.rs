// src/error.rs

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigMsgError {
    /// The signing input index is past the end of the transaction's inputs.
    /// (index, input count)
    InputIndexOutOfRange(usize, usize),

    /// The data stream ended before the transaction could be fully read.
    IncompleteData,

    /// Bytes left over after a full transaction parse (cursor desynchronization).
    TrailingData(usize),

    /// The unsigned-transaction decoder found a non-empty scriptSig (input index).
    ScriptSigPresent(usize),

    /// Witness serialization requires exactly one stack per input.
    /// (witness stacks, inputs)
    WitnessCountMismatch(usize, usize),

    /// Public key was not 33 bytes (compressed SEC1 form).
    InvalidPublicKeyLength(usize),

    /// Script is not a P2WPKH witness program (0x00 0x14 + 20 bytes).
    NotP2wpkh,

    /// Compact signature could not be parsed as a valid ECDSA (r, s) pair.
    InvalidSignature,
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for SigMsgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InputIndexOutOfRange(index, inputs) => {
                write!(f, "Input index {} out of range ({} inputs)", index, inputs)
            }
            Self::IncompleteData => write!(f, "Incomplete transaction data"),
            Self::TrailingData(n) => write!(f, "Trailing data: {} bytes left after parse", n),
            Self::ScriptSigPresent(i) => {
                write!(f, "Unsigned transaction has a non-empty scriptSig at input {}", i)
            }
            Self::WitnessCountMismatch(witnesses, inputs) => write!(
                f,
                "Witness count mismatch: {} stacks for {} inputs",
                witnesses, inputs
            ),
            Self::InvalidPublicKeyLength(n) => {
                write!(f, "Invalid public key length: {} (expected 33)", n)
            }
            Self::NotP2wpkh => write!(f, "Script is not a P2WPKH witness program"),
            Self::InvalidSignature => write!(f, "Invalid compact ECDSA signature"),
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for SigMsgError {}
