//! Property data types.

/// Data kinds a property descriptor can declare.
///
/// The numeric codes are the stable identifiers repositories use for the
/// kinds; `as_str` gives the name written to the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DataType {
    /// UTF-8 text.
    String = 1,
    /// Signed 32-bit integer.
    Integer = 2,
    /// Signed 16-bit integer.
    Short = 3,
    /// Signed 64-bit integer.
    Long = 4,
    /// 32-bit floating point.
    Float = 5,
    /// 64-bit floating point.
    Double = 6,
    /// Boolean value.
    Boolean = 7,
    /// Date and time with second precision.
    DateTime = 8,
    /// Raw bytes.
    Blob = 9,
    /// Reference to another object.
    Reference = 10,
    /// Binary content stream.
    Content = 11,
    /// Object identifier.
    Id = 100,
    /// Adaptor GUID.
    Guid = 101,
}

impl DataType {
    /// All kinds, in code order.
    pub const ALL: [DataType; 13] = [
        Self::String,
        Self::Integer,
        Self::Short,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Boolean,
        Self::DateTime,
        Self::Blob,
        Self::Reference,
        Self::Content,
        Self::Id,
        Self::Guid,
    ];

    /// Parse from a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::String),
            2 => Some(Self::Integer),
            3 => Some(Self::Short),
            4 => Some(Self::Long),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            7 => Some(Self::Boolean),
            8 => Some(Self::DateTime),
            9 => Some(Self::Blob),
            10 => Some(Self::Reference),
            11 => Some(Self::Content),
            100 => Some(Self::Id),
            101 => Some(Self::Guid),
            _ => None,
        }
    }

    /// Parse from the lowercase kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|dt| dt.as_str() == name)
    }

    /// Numeric code of this kind.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Short => "short",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Blob => "blob",
            Self::Reference => "reference",
            Self::Content => "content",
            Self::Id => "id",
            Self::Guid => "guid",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_code(dt.code()), Some(dt));
            assert_eq!(DataType::from_name(dt.as_str()), Some(dt));
        }
        assert_eq!(DataType::from_code(12), None);
        assert_eq!(DataType::from_name("Reference"), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(DataType::DateTime.to_string(), "datetime");
        assert_eq!(DataType::Id.code(), 100);
    }
}
