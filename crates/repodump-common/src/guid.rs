//! GUID type.
//!
//! Repositories attach a 16-byte GUID to every object next to its id. The
//! value is adaptor bookkeeping; the exporter carries it in the model but
//! never writes it to the output document.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A 16-byte GUID in standard byte order.
///
/// Format: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` (lowercase hex).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Guid {
    bytes: [u8; 16],
}

impl Guid {
    /// Empty GUID (all zeros).
    pub const EMPTY: Self = Self { bytes: [0; 16] };

    /// Create a new Guid from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Create a Guid from a 128-bit integer (big-endian byte order).
    #[inline]
    pub const fn from_u128(value: u128) -> Self {
        Self {
            bytes: value.to_be_bytes(),
        }
    }

    /// Get the raw bytes of the GUID.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    /// Check if the GUID is empty (all zeros).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes == [0; 16]
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 36 || !s.is_ascii() {
            return Err(Error::InvalidGuid(format!(
                "expected 36 ASCII characters, got '{}'",
                s
            )));
        }

        let raw = s.as_bytes();
        if raw[8] != b'-' || raw[13] != b'-' || raw[18] != b'-' || raw[23] != b'-' {
            return Err(Error::InvalidGuid("invalid hyphen positions".into()));
        }

        let mut bytes = [0u8; 16];
        let mut pos = 0;
        for byte in bytes.iter_mut() {
            if raw[pos] == b'-' {
                pos += 1;
            }
            *byte = u8::from_str_radix(&s[pos..pos + 2], 16)
                .map_err(|_| Error::InvalidGuid(format!("invalid hex at position {}", pos)))?;
            pos += 2;
        }

        Ok(Self { bytes })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Guid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Guid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_guid() {
        let guid = Guid::EMPTY;
        assert!(guid.is_empty());
        assert_eq!(guid.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_from_u128() {
        let guid = Guid::from_u128(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
        assert_eq!(guid.to_string(), "01234567-89ab-cdef-0011-223344556677");
    }

    #[test]
    fn test_parse_matches_display() {
        let text = "12345678-abcd-ef01-2345-6789abcdef01";
        let guid: Guid = text.parse().unwrap();
        assert_eq!(guid.to_string(), text);
        assert_eq!(guid.as_bytes()[0], 0x12);
    }

    #[test]
    fn test_invalid_length() {
        assert!("too-short".parse::<Guid>().is_err());
    }

    #[test]
    fn test_invalid_hyphens() {
        assert!("12345678_abcd-ef01-2345-6789abcdef01".parse::<Guid>().is_err());
    }

    #[test]
    fn test_non_ascii_rejected() {
        assert!("12345678-abcd-ef01-2345-6789abcdefé".parse::<Guid>().is_err());
    }
}
