//! Repository capability traits.
//!
//! These traits are everything the export engine needs from a repository.
//! Class and property descriptors are objects in their own right, so they
//! extend [`DataObject`] and can be exported through the same machinery as
//! ordinary data objects.

use std::sync::Arc;

use repodump_common::{ObjectId, QName};

use crate::value::{Content, PropertyValue};
use crate::{DataType, Result};

/// Shared handle to a data object.
pub type ObjectRef = Arc<dyn DataObject>;

/// Shared handle to a class descriptor.
pub type ClassRef = Arc<dyn ClassDescriptor>;

/// Shared handle to a property descriptor.
pub type PropertyInfoRef = Arc<dyn PropertyDescriptor>;

/// Shared handle to a content stream.
pub type ContentRef = Arc<dyn Content>;

/// Lazy, finite sequence of referenced objects.
///
/// Consuming it twice requires reading the property again.
pub type ReferenceIter = Box<dyn Iterator<Item = Result<ObjectRef>>>;

/// An object stored in a repository.
pub trait DataObject {
    /// Identity of the object.
    fn id(&self) -> &ObjectId;

    /// The object's class.
    fn class(&self) -> ClassRef;

    /// Read one property by qualified name.
    fn property(&self, name: &QName) -> Result<PropertyValue>;
}

/// A class in the repository's type hierarchy.
pub trait ClassDescriptor: DataObject {
    /// Qualified name of the class.
    fn qname(&self) -> &QName;

    /// Namespace of the class.
    fn namespace(&self) -> &str {
        self.qname().namespace()
    }

    /// Local name of the class.
    fn name(&self) -> &str {
        self.qname().name()
    }

    /// Whether instances can be fetched by id on their own.
    fn is_retrievable(&self) -> bool;

    /// All property descriptors, inherited first, then declared.
    fn properties(&self) -> Result<Vec<PropertyInfoRef>>;

    /// Property descriptors declared by this class only.
    fn declared_properties(&self) -> Result<Vec<PropertyInfoRef>>;

    /// Direct subclasses in repository order.
    fn sub_classes(&self) -> Result<Vec<ClassRef>>;

    /// View this class as a plain object.
    fn as_object(&self) -> &dyn DataObject;
}

/// Declaration of one property on a class.
pub trait PropertyDescriptor: DataObject {
    /// Qualified name of the property.
    fn qname(&self) -> &QName;

    /// Declared data kind.
    fn data_type(&self) -> DataType;

    /// Whether the property holds a sequence of values.
    fn is_multi_value(&self) -> bool;

    /// View this descriptor as a plain object.
    fn as_object(&self) -> &dyn DataObject;
}

/// A repository that can be exported.
pub trait Repository {
    /// Id of the repository object.
    fn id(&self) -> &ObjectId;

    /// The repository object itself.
    fn repository_object(&self) -> Result<ObjectRef>;

    /// Root of the class hierarchy.
    fn root_class(&self) -> Result<ClassRef>;

    /// Fetch an object by id.
    ///
    /// Fails with [`RepositoryError::NotFound`](crate::RepositoryError::NotFound)
    /// when no retrievable object has this id; any other error means the
    /// lookup itself failed.
    fn fetch(&self, id: &ObjectId) -> Result<ObjectRef>;
}
