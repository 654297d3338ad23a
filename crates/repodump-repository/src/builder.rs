//! Builder for in-memory repositories.
//!
//! ```
//! use repodump_repository::{DataType, RepositoryBuilder};
//!
//! let mut builder = RepositoryBuilder::new("repo-1", "Documents");
//!
//! // Define a class with two properties
//! let doc = builder.add_class("custom", "Doc", None);
//! let title = builder.add_property(doc, "custom", "title", DataType::String);
//! let owner = builder.add_property(doc, "custom", "owner", DataType::Reference);
//! let person = builder.add_class("custom", "Person", None);
//!
//! // Add objects
//! let a = builder.add_object("A", doc);
//! builder.set_string(a, title, "Quarterly report");
//! builder.set_reference(a, owner, "B");
//! builder.add_object("B", person);
//!
//! let repository = builder.build()?;
//! assert_eq!(repository.object_count(), 2);
//! # Ok::<(), repodump_repository::RepositoryError>(())
//! ```

use repodump_common::{Guid, ObjectId, QName, SYSTEM_NAMESPACE};

use crate::memory::{ClassDef, Entry, FxHashMap, ObjectDef, PropertyDef, Slot, Store};
use crate::schema::{SYSTEM_CLASSES, SYSTEM_PROPERTIES};
use crate::value::Literal;
use crate::{DataType, MemoryRepository, RepositoryError, Result};

/// Handle to a class added to a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassHandle(pub u32);

/// Handle to a property added to a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyHandle(pub u32);

/// Handle to an object added to a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u32);

/// Builder for [`MemoryRepository`].
///
/// The system classes are created up front; user classes without an explicit
/// parent derive from the root class. Values are checked against their
/// property declarations in [`build`](Self::build).
#[derive(Debug)]
pub struct RepositoryBuilder {
    id: ObjectId,
    name: String,
    classes: Vec<ClassDef>,
    properties: Vec<PropertyDef>,
    objects: Vec<ObjectDef>,
    root_folder: Option<ObjectId>,
    next_guid: u128,
    /// First handle that did not resolve; reported by `build`.
    invalid_handle: Option<(&'static str, u32)>,
}

impl RepositoryBuilder {
    /// Create a builder holding only the system schema.
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        let mut builder = Self {
            id: id.into(),
            name: name.into(),
            classes: Vec::new(),
            properties: Vec::new(),
            objects: Vec::new(),
            root_folder: None,
            next_guid: 1,
            invalid_handle: None,
        };

        for (name, parent) in SYSTEM_CLASSES {
            let qname = QName::system(name);
            builder.push_class(ObjectId::new(qname.to_string()), qname, parent);
        }
        for (class, name, data_type, multi_value) in SYSTEM_PROPERTIES {
            builder.push_property(
                None,
                ClassHandle(class as u32),
                QName::system(name),
                data_type,
                multi_value,
            );
        }

        builder
    }

    /// The root class of the hierarchy.
    pub fn root_class(&self) -> ClassHandle {
        ClassHandle(0)
    }

    /// Point the repository object's root folder at an object id.
    pub fn set_root_folder(&mut self, id: impl Into<ObjectId>) {
        self.root_folder = Some(id.into());
    }

    /// Add a retrievable class. Its id is its qualified name.
    pub fn add_class(&mut self, namespace: &str, name: &str, parent: Option<ClassHandle>) -> ClassHandle {
        let qname = QName::new(namespace, name);
        self.add_class_with_id(ObjectId::new(qname.to_string()), namespace, name, parent)
    }

    /// Add a retrievable class with an explicit id.
    pub fn add_class_with_id(
        &mut self,
        id: impl Into<ObjectId>,
        namespace: &str,
        name: &str,
        parent: Option<ClassHandle>,
    ) -> ClassHandle {
        let parent = parent.unwrap_or(self.root_class());
        self.check_handle("class", parent.0, self.classes.len());
        self.push_class(id.into(), QName::new(namespace, name), Some(parent.0 as usize))
    }

    /// Mark whether instances of a class can be fetched on their own.
    pub fn set_retrievable(&mut self, class: ClassHandle, retrievable: bool) {
        if let Some(def) = self.classes.get_mut(class.0 as usize) {
            def.retrievable = retrievable;
        }
    }

    /// Add a single-valued property to a class.
    pub fn add_property(
        &mut self,
        class: ClassHandle,
        namespace: &str,
        name: &str,
        data_type: DataType,
    ) -> PropertyHandle {
        self.push_property(None, class, QName::new(namespace, name), data_type, false)
    }

    /// Add a multi-valued property to a class.
    pub fn add_multi_property(
        &mut self,
        class: ClassHandle,
        namespace: &str,
        name: &str,
        data_type: DataType,
    ) -> PropertyHandle {
        self.push_property(None, class, QName::new(namespace, name), data_type, true)
    }

    /// Add a property with an explicit descriptor id.
    pub fn add_property_with_id(
        &mut self,
        id: impl Into<ObjectId>,
        class: ClassHandle,
        qname: QName,
        data_type: DataType,
        multi_value: bool,
    ) -> PropertyHandle {
        self.push_property(Some(id.into()), class, qname, data_type, multi_value)
    }

    /// Add a data object of the given class.
    pub fn add_object(&mut self, id: impl Into<ObjectId>, class: ClassHandle) -> ObjectHandle {
        self.check_handle("class", class.0, self.classes.len());
        let guid = self.allocate_guid();
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(ObjectDef {
            id: id.into(),
            class: class.0 as usize,
            guid,
            values: FxHashMap::default(),
        });
        handle
    }

    /// Find a class by qualified name.
    pub fn find_class(&self, qname: &QName) -> Option<ClassHandle> {
        self.classes
            .iter()
            .position(|def| def.qname == *qname)
            .map(|index| ClassHandle(index as u32))
    }

    /// Find a property declared on a class or inherited by it.
    pub fn find_property(&self, class: ClassHandle, qname: &QName) -> Option<PropertyHandle> {
        let mut current = self.classes.get(class.0 as usize).map(|_| class.0 as usize);
        while let Some(index) = current {
            let def = &self.classes[index];
            if let Some(&p) = def
                .declared
                .iter()
                .find(|&&p| self.properties[p].qname == *qname)
            {
                return Some(PropertyHandle(p as u32));
            }
            current = def.parent;
        }
        None
    }

    /// Declared kind and multi-value flag of a property.
    pub fn property_type(&self, property: PropertyHandle) -> Option<(DataType, bool)> {
        self.properties
            .get(property.0 as usize)
            .map(|def| (def.data_type, def.multi_value))
    }

    /// The class an object was added with.
    pub fn object_class(&self, object: ObjectHandle) -> Option<ClassHandle> {
        self.objects
            .get(object.0 as usize)
            .map(|def| ClassHandle(def.class as u32))
    }

    /// Set a single value.
    pub fn set_value(&mut self, object: ObjectHandle, property: PropertyHandle, value: Literal) {
        self.set_slot(object, property, Slot::Single(value));
    }

    /// Set all values of a multi-valued property.
    pub fn set_values(&mut self, object: ObjectHandle, property: PropertyHandle, values: Vec<Literal>) {
        self.set_slot(object, property, Slot::Multi(values));
    }

    pub fn set_string(&mut self, object: ObjectHandle, property: PropertyHandle, value: &str) {
        self.set_value(object, property, Literal::String(value.to_string()));
    }

    pub fn set_i32(&mut self, object: ObjectHandle, property: PropertyHandle, value: i32) {
        self.set_value(object, property, Literal::Integer(value));
    }

    pub fn set_bool(&mut self, object: ObjectHandle, property: PropertyHandle, value: bool) {
        self.set_value(object, property, Literal::Boolean(value));
    }

    /// Point a single-valued reference property at an object id.
    pub fn set_reference(&mut self, object: ObjectHandle, property: PropertyHandle, target: &str) {
        self.set_value(object, property, Literal::reference(target));
    }

    /// Point a multi-valued reference property at object ids, in order.
    pub fn set_references(&mut self, object: ObjectHandle, property: PropertyHandle, targets: &[&str]) {
        let values = targets.iter().map(|&id| Literal::reference(id)).collect();
        self.set_values(object, property, values);
    }

    /// Attach content bytes.
    pub fn set_content(&mut self, object: ObjectHandle, property: PropertyHandle, bytes: &[u8]) {
        self.set_value(object, property, Literal::content(bytes.to_vec()));
    }

    /// Clear a value back to null.
    pub fn clear_value(&mut self, object: ObjectHandle, property: PropertyHandle) {
        if let Some(def) = self.objects.get_mut(object.0 as usize) {
            def.values.remove(&(property.0 as usize));
        }
    }

    /// Validate and freeze the repository.
    ///
    /// Fails with [`RepositoryError::InvalidHandle`] if any handle passed to
    /// the builder did not refer to one of its classes, properties or objects.
    pub fn build(mut self) -> Result<MemoryRepository> {
        if let Some((kind, index)) = self.invalid_handle {
            return Err(RepositoryError::InvalidHandle { kind, index });
        }

        let guid = self.allocate_guid();
        let mut index: FxHashMap<ObjectId, Entry> = FxHashMap::default();
        let mut insert = |id: &ObjectId, entry: Entry| match index.insert(id.clone(), entry) {
            Some(_) => Err(RepositoryError::DuplicateId(id.clone())),
            None => Ok(()),
        };

        insert(&self.id, Entry::Repository)?;
        for (i, def) in self.classes.iter().enumerate() {
            insert(&def.id, Entry::Class(i))?;
        }
        for (i, def) in self.properties.iter().enumerate() {
            insert(&def.id, Entry::Property(i))?;
        }
        for (i, def) in self.objects.iter().enumerate() {
            insert(&def.id, Entry::Object(i))?;
        }

        let mut classes = self.classes;
        for i in 0..classes.len() {
            if let Some(parent) = classes[i].parent {
                classes[parent].sub_classes.push(i);
            }
        }

        let store = Store {
            id: self.id,
            name: self.name,
            guid,
            root_folder: self.root_folder,
            classes,
            properties: self.properties,
            objects: self.objects,
            index,
            system_property_count: SYSTEM_PROPERTIES.len(),
        };

        for object in &store.objects {
            let allowed = store.full_properties(object.class);
            for (&p, slot) in &object.values {
                let def = &store.properties[p];
                if !allowed.contains(&p) || p < store.system_property_count {
                    return Err(RepositoryError::PropertyNotFound {
                        object: object.id.clone(),
                        property: def.qname.clone(),
                    });
                }

                let fits = match slot {
                    Slot::Single(literal) => !def.multi_value && literal.data_type() == def.data_type,
                    Slot::Multi(literals) => {
                        def.multi_value && literals.iter().all(|l| l.data_type() == def.data_type)
                    }
                };
                if !fits {
                    return Err(RepositoryError::ValueMismatch {
                        object: object.id.clone(),
                        property: def.qname.clone(),
                        expected: def.data_type,
                    });
                }
            }
        }

        Ok(MemoryRepository::from_store(store))
    }

    fn check_handle(&mut self, kind: &'static str, index: u32, len: usize) {
        if index as usize >= len && self.invalid_handle.is_none() {
            self.invalid_handle = Some((kind, index));
        }
    }

    fn allocate_guid(&mut self) -> Guid {
        let guid = Guid::from_u128(self.next_guid);
        self.next_guid += 1;
        guid
    }

    fn push_class(&mut self, id: ObjectId, qname: QName, parent: Option<usize>) -> ClassHandle {
        let guid = self.allocate_guid();
        let handle = ClassHandle(self.classes.len() as u32);
        self.classes.push(ClassDef {
            id,
            qname,
            parent,
            sub_classes: Vec::new(),
            declared: Vec::new(),
            retrievable: true,
            guid,
        });
        handle
    }

    fn push_property(
        &mut self,
        id: Option<ObjectId>,
        class: ClassHandle,
        qname: QName,
        data_type: DataType,
        multi_value: bool,
    ) -> PropertyHandle {
        self.check_handle("class", class.0, self.classes.len());
        let class_index = class.0 as usize;
        let id = id.unwrap_or_else(|| {
            let owner = self
                .classes
                .get(class_index)
                .map(|def| def.qname.to_string())
                .unwrap_or_else(|| SYSTEM_NAMESPACE.to_string());
            ObjectId::new(format!("{}/{}", owner, qname))
        });

        let guid = self.allocate_guid();
        let handle = PropertyHandle(self.properties.len() as u32);
        self.properties.push(PropertyDef {
            id,
            qname,
            data_type,
            multi_value,
            guid,
        });
        if let Some(def) = self.classes.get_mut(class_index) {
            def.declared.push(handle.0 as usize);
        }
        handle
    }

    fn set_slot(&mut self, object: ObjectHandle, property: PropertyHandle, slot: Slot) {
        self.check_handle("object", object.0, self.objects.len());
        self.check_handle("property", property.0, self.properties.len());
        if let Some(def) = self.objects.get_mut(object.0 as usize) {
            def.values.insert(property.0 as usize, slot);
        }
    }
}
