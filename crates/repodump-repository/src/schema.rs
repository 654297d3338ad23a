//! System schema of the in-memory repository.
//!
//! Metadata lives in the system namespace: every class, property descriptor
//! and the repository object is an instance of one of the classes below, and
//! the values of their system properties are computed from the stored
//! definitions rather than stored.

use crate::DataType;

/// Root class of every hierarchy.
pub const OBJECT: &str = "Object";
/// Class of class descriptors.
pub const CLASS: &str = "Class";
/// Class of property descriptors.
pub const PROPERTY_INFO: &str = "PropertyInfo";
/// Class of the repository object.
pub const REPOSITORY: &str = "Repository";

pub const ID: &str = "Id";
pub const GUID: &str = "Guid";
/// Reference from any object to its class.
pub const CLASS_REF: &str = "Class";
pub const NAME: &str = "Name";
pub const NAMESPACE: &str = "Namespace";
pub const RETRIEVABLE: &str = "Retrievable";
pub const SUPER_CLASS: &str = "SuperClass";
pub const DECLARED_PROPERTIES: &str = "DeclaredProperties";
pub const SUB_CLASSES: &str = "SubClasses";
pub const DATA_TYPE: &str = "DataType";
pub const MULTI_VALUE: &str = "MultiValue";
pub const ROOT_CLASS: &str = "RootClass";
/// Entry point into the data objects of a repository.
pub const ROOT_FOLDER: &str = "RootFolder";

pub(crate) const OBJECT_CLASS: usize = 0;
pub(crate) const CLASS_CLASS: usize = 1;
pub(crate) const PROPERTY_INFO_CLASS: usize = 2;
pub(crate) const REPOSITORY_CLASS: usize = 3;

/// System classes in index order: (name, parent index).
pub(crate) const SYSTEM_CLASSES: [(&str, Option<usize>); 4] = [
    (OBJECT, None),
    (CLASS, Some(OBJECT_CLASS)),
    (PROPERTY_INFO, Some(OBJECT_CLASS)),
    (REPOSITORY, Some(OBJECT_CLASS)),
];

/// System properties in declaration order: (owning class, name, kind, multi-value).
pub(crate) const SYSTEM_PROPERTIES: [(usize, &str, DataType, bool); 16] = [
    (OBJECT_CLASS, ID, DataType::Id, false),
    (OBJECT_CLASS, GUID, DataType::Guid, false),
    (OBJECT_CLASS, CLASS_REF, DataType::Reference, false),
    (CLASS_CLASS, NAME, DataType::String, false),
    (CLASS_CLASS, NAMESPACE, DataType::String, false),
    (CLASS_CLASS, RETRIEVABLE, DataType::Boolean, false),
    (CLASS_CLASS, SUPER_CLASS, DataType::Reference, false),
    (CLASS_CLASS, DECLARED_PROPERTIES, DataType::Reference, true),
    (CLASS_CLASS, SUB_CLASSES, DataType::Reference, true),
    (PROPERTY_INFO_CLASS, NAME, DataType::String, false),
    (PROPERTY_INFO_CLASS, NAMESPACE, DataType::String, false),
    (PROPERTY_INFO_CLASS, DATA_TYPE, DataType::Integer, false),
    (PROPERTY_INFO_CLASS, MULTI_VALUE, DataType::Boolean, false),
    (REPOSITORY_CLASS, NAME, DataType::String, false),
    (REPOSITORY_CLASS, ROOT_CLASS, DataType::Reference, false),
    (REPOSITORY_CLASS, ROOT_FOLDER, DataType::Reference, false),
];
