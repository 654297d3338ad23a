//! Typed property values.
//!
//! [`Value`] is what a repository hands out when a property is read; every
//! variant maps to exactly one [`DataType`], so consumers can match it
//! exhaustively. [`Literal`] is the storage-side counterpart used to build
//! in-memory repositories, holding references by id instead of by handle.

use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;

use chrono::NaiveDateTime;
use repodump_common::{Guid, ObjectId};

use crate::traits::{ContentRef, ObjectRef, ReferenceIter};
use crate::DataType;

/// A binary content stream attached to a content-kind property.
pub trait Content {
    /// Open the stream for reading from the start.
    fn open(&self) -> std::io::Result<Box<dyn Read + '_>>;

    /// Size in bytes, if known up front.
    fn size(&self) -> Option<u64> {
        None
    }
}

/// Content held in memory.
#[derive(Debug, Clone)]
pub struct MemoryContent(Arc<[u8]>);

impl MemoryContent {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

impl Content for MemoryContent {
    fn open(&self) -> std::io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(&self.0[..])))
    }

    fn size(&self) -> Option<u64> {
        Some(self.0.len() as u64)
    }
}

/// A single typed value read from a property.
#[derive(Clone)]
pub enum Value {
    String(String),
    Integer(i32),
    Short(i16),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Blob(Vec<u8>),
    /// Resolved referenced object.
    Reference(ObjectRef),
    Content(ContentRef),
    Id(ObjectId),
    Guid(Guid),
}

impl Value {
    /// The data kind this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Integer(_) => DataType::Integer,
            Self::Short(_) => DataType::Short,
            Self::Long(_) => DataType::Long,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::Boolean(_) => DataType::Boolean,
            Self::DateTime(_) => DataType::DateTime,
            Self::Blob(_) => DataType::Blob,
            Self::Reference(_) => DataType::Reference,
            Self::Content(_) => DataType::Content,
            Self::Id(_) => DataType::Id,
            Self::Guid(_) => DataType::Guid,
        }
    }

    /// Try to get this value as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the referenced object.
    #[inline]
    pub fn as_reference(&self) -> Option<&ObjectRef> {
        match self {
            Self::Reference(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => write!(f, "String({:?})", v),
            Self::Integer(v) => write!(f, "Integer({})", v),
            Self::Short(v) => write!(f, "Short({})", v),
            Self::Long(v) => write!(f, "Long({})", v),
            Self::Float(v) => write!(f, "Float({})", v),
            Self::Double(v) => write!(f, "Double({})", v),
            Self::Boolean(v) => write!(f, "Boolean({})", v),
            Self::DateTime(v) => write!(f, "DateTime({})", v),
            Self::Blob(v) => write!(f, "Blob({} bytes)", v.len()),
            Self::Reference(obj) => write!(f, "Reference({})", obj.id()),
            Self::Content(c) => match c.size() {
                Some(size) => write!(f, "Content({} bytes)", size),
                None => f.write_str("Content"),
            },
            Self::Id(v) => write!(f, "Id({})", v),
            Self::Guid(v) => write!(f, "Guid({})", v),
        }
    }
}

/// The value of one property on one object.
pub enum PropertyValue {
    /// Single-valued property; `None` when unset.
    Single(Option<Value>),
    /// Multi-valued property of a non-reference kind, in stored order.
    Multi(Vec<Value>),
    /// Multi-valued reference property, resolved lazily in provider order.
    References(ReferenceIter),
}

impl PropertyValue {
    /// An empty multi-valued reference sequence.
    pub fn no_references() -> Self {
        Self::References(Box::new(std::iter::empty()))
    }

    /// Check if this is a multi-valued form.
    #[inline]
    pub fn is_multi_value(&self) -> bool {
        !matches!(self, Self::Single(_))
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(v) => f.debug_tuple("Single").field(v).finish(),
            Self::Multi(v) => f.debug_tuple("Multi").field(v).finish(),
            Self::References(_) => f.write_str("References(..)"),
        }
    }
}

/// A stored value, as held by the in-memory repository.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i32),
    Short(i16),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Blob(Vec<u8>),
    /// Id of the referenced object, resolved on read.
    Reference(ObjectId),
    Content(Arc<[u8]>),
    Id(ObjectId),
    Guid(Guid),
}

impl Literal {
    /// Reference to the object with the given id.
    pub fn reference(id: impl Into<ObjectId>) -> Self {
        Self::Reference(id.into())
    }

    /// Content backed by the given bytes.
    pub fn content(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Content(Arc::from(bytes.into()))
    }

    /// The data kind this literal belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Integer(_) => DataType::Integer,
            Self::Short(_) => DataType::Short,
            Self::Long(_) => DataType::Long,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::Boolean(_) => DataType::Boolean,
            Self::DateTime(_) => DataType::DateTime,
            Self::Blob(_) => DataType::Blob,
            Self::Reference(_) => DataType::Reference,
            Self::Content(_) => DataType::Content,
            Self::Id(_) => DataType::Id,
            Self::Guid(_) => DataType::Guid,
        }
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<i16> for Literal {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Literal {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Guid> for Literal {
    fn from(v: Guid) -> Self {
        Self::Guid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_kinds() {
        assert_eq!(Literal::from("x").data_type(), DataType::String);
        assert_eq!(Literal::from(7i16).data_type(), DataType::Short);
        assert_eq!(Literal::from(7i64).data_type(), DataType::Long);
        assert_eq!(Literal::reference("a").data_type(), DataType::Reference);
        assert_eq!(Literal::content(vec![1, 2]).data_type(), DataType::Content);
    }

    #[test]
    fn test_memory_content_reads_all_bytes() {
        let content = MemoryContent::new(vec![1u8, 2, 3]);
        let mut buf = Vec::new();
        content.open().unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
        assert_eq!(content.size(), Some(3));
    }

    #[test]
    fn test_value_debug() {
        assert_eq!(format!("{:?}", Value::Blob(vec![0; 4])), "Blob(4 bytes)");
        assert_eq!(format!("{:?}", Value::Integer(42)), "Integer(42)");
    }
}
