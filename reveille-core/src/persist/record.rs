//! Versioned record framing
//!
//! Layout: `[version: u8][len: u16 LE][payload: postcard]`. A version
//! mismatch or a length that does not fit the slot is treated as "no
//! record"; callers fall back to defaults rather than erroring out.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Current record schema version
pub const SCHEMA_VERSION: u8 = 1;

/// Bytes occupied by the version + length header
pub const RECORD_HEADER_LEN: usize = 3;

/// Errors from record framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Version byte does not match [`SCHEMA_VERSION`]
    BadVersion,
    /// Declared length exceeds the slot
    BadLength,
    /// Payload failed to serialize or deserialize
    Codec,
}

/// Encode `value` as a framed record into `slot`; returns bytes used
pub fn encode<T: Serialize>(value: &T, slot: &mut [u8]) -> Result<usize, RecordError> {
    if slot.len() < RECORD_HEADER_LEN {
        return Err(RecordError::BadLength);
    }
    let (header, payload) = slot.split_at_mut(RECORD_HEADER_LEN);
    let used = postcard::to_slice(value, payload)
        .map_err(|_| RecordError::Codec)?
        .len();
    if used > u16::MAX as usize {
        return Err(RecordError::BadLength);
    }
    header[0] = SCHEMA_VERSION;
    header[1..3].copy_from_slice(&(used as u16).to_le_bytes());
    Ok(RECORD_HEADER_LEN + used)
}

/// Decode a framed record from `slot`
pub fn decode<T: DeserializeOwned>(slot: &[u8]) -> Result<T, RecordError> {
    if slot.len() < RECORD_HEADER_LEN {
        return Err(RecordError::BadLength);
    }
    if slot[0] != SCHEMA_VERSION {
        return Err(RecordError::BadVersion);
    }
    let len = u16::from_le_bytes([slot[1], slot[2]]) as usize;
    let payload = slot[RECORD_HEADER_LEN..]
        .get(..len)
        .ok_or(RecordError::BadLength)?;
    postcard::from_bytes(payload).map_err(|_| RecordError::Codec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
        b: bool,
    }

    #[test]
    fn test_encode_decode() {
        let mut slot = [0u8; 32];
        let value = Sample { a: 1234, b: true };
        let used = encode(&value, &mut slot).unwrap();
        assert!(used > RECORD_HEADER_LEN);
        assert_eq!(decode::<Sample>(&slot), Ok(value));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut slot = [0u8; 32];
        encode(&Sample { a: 1, b: false }, &mut slot).unwrap();
        slot[0] = SCHEMA_VERSION + 1;
        assert_eq!(decode::<Sample>(&slot), Err(RecordError::BadVersion));
    }

    #[test]
    fn test_blank_slot_rejected() {
        // Erased flash reads back as 0xFF
        let slot = [0xFFu8; 32];
        assert_eq!(decode::<Sample>(&slot), Err(RecordError::BadVersion));

        // All-zero slot has a valid-looking length of 0 but version 0
        let slot = [0u8; 32];
        assert_eq!(decode::<Sample>(&slot), Err(RecordError::BadVersion));
    }

    #[test]
    fn test_length_beyond_slot_rejected() {
        let mut slot = [0u8; 8];
        slot[0] = SCHEMA_VERSION;
        slot[1..3].copy_from_slice(&100u16.to_le_bytes());
        assert_eq!(decode::<Sample>(&slot), Err(RecordError::BadLength));
    }

    #[test]
    fn test_encode_into_tight_slot() {
        let mut slot = [0u8; 2];
        assert_eq!(
            encode(&Sample { a: 1, b: false }, &mut slot),
            Err(RecordError::BadLength)
        );
    }
}
