//! In-memory repository.
//!
//! All definitions live in one immutable [`Store`] behind an `Arc`; object,
//! class and property handles are an `Arc` clone plus an index, so handing
//! out references is cheap and nothing is resolved until it is read.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use hashbrown::HashMap as FastHashMap;
use repodump_common::{Guid, ObjectId, QName};
use rustc_hash::FxHasher;

use crate::schema;
use crate::traits::{
    ClassDescriptor, ClassRef, DataObject, ObjectRef, PropertyDescriptor, PropertyInfoRef,
    Repository,
};
use crate::value::{Literal, MemoryContent, PropertyValue, Value};
use crate::{DataType, RepositoryBuilder, RepositoryError, Result};

pub(crate) type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

#[derive(Debug, Clone)]
pub(crate) struct ClassDef {
    pub id: ObjectId,
    pub qname: QName,
    pub parent: Option<usize>,
    pub sub_classes: Vec<usize>,
    pub declared: Vec<usize>,
    pub retrievable: bool,
    pub guid: Guid,
}

#[derive(Debug, Clone)]
pub(crate) struct PropertyDef {
    pub id: ObjectId,
    pub qname: QName,
    pub data_type: DataType,
    pub multi_value: bool,
    pub guid: Guid,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectDef {
    pub id: ObjectId,
    pub class: usize,
    pub guid: Guid,
    /// Values keyed by property index; a missing key reads as null or empty.
    pub values: FxHashMap<usize, Slot>,
}

#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Single(Literal),
    Multi(Vec<Literal>),
}

/// What an id resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Repository,
    Class(usize),
    Property(usize),
    Object(usize),
}

#[derive(Debug)]
pub(crate) struct Store {
    pub id: ObjectId,
    pub name: String,
    pub guid: Guid,
    pub root_folder: Option<ObjectId>,
    pub classes: Vec<ClassDef>,
    pub properties: Vec<PropertyDef>,
    pub objects: Vec<ObjectDef>,
    pub index: FxHashMap<ObjectId, Entry>,
    pub system_property_count: usize,
}

impl Store {
    fn entry_id(&self, entry: Entry) -> &ObjectId {
        match entry {
            Entry::Repository => &self.id,
            Entry::Class(i) => &self.classes[i].id,
            Entry::Property(i) => &self.properties[i].id,
            Entry::Object(i) => &self.objects[i].id,
        }
    }

    fn entry_guid(&self, entry: Entry) -> Guid {
        match entry {
            Entry::Repository => self.guid,
            Entry::Class(i) => self.classes[i].guid,
            Entry::Property(i) => self.properties[i].guid,
            Entry::Object(i) => self.objects[i].guid,
        }
    }

    fn entry_class(&self, entry: Entry) -> usize {
        match entry {
            Entry::Repository => schema::REPOSITORY_CLASS,
            Entry::Class(_) => schema::CLASS_CLASS,
            Entry::Property(_) => schema::PROPERTY_INFO_CLASS,
            Entry::Object(i) => self.objects[i].class,
        }
    }

    /// Property indices of a class, inherited first.
    pub(crate) fn full_properties(&self, class: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(index) = current {
            chain.push(index);
            current = self.classes[index].parent;
        }

        chain
            .iter()
            .rev()
            .flat_map(|&index| self.classes[index].declared.iter().copied())
            .collect()
    }
}

fn handle(store: &Arc<Store>, entry: Entry) -> ObjectRef {
    match entry {
        Entry::Class(index) => Arc::new(MemClass {
            store: Arc::clone(store),
            index,
        }),
        Entry::Property(index) => Arc::new(MemPropertyInfo {
            store: Arc::clone(store),
            index,
        }),
        Entry::Repository | Entry::Object(_) => Arc::new(MemObject {
            store: Arc::clone(store),
            entry,
        }),
    }
}

fn class_ref(store: &Arc<Store>, index: usize) -> ClassRef {
    Arc::new(MemClass {
        store: Arc::clone(store),
        index,
    })
}

fn property_ref(store: &Arc<Store>, index: usize) -> PropertyInfoRef {
    Arc::new(MemPropertyInfo {
        store: Arc::clone(store),
        index,
    })
}

fn resolve(store: &Arc<Store>, id: &ObjectId) -> Result<ObjectRef> {
    store
        .index
        .get(id)
        .map(|entry| handle(store, *entry))
        .ok_or_else(|| RepositoryError::NotFound(id.clone()))
}

fn entry_references(store: &Arc<Store>, entries: Vec<Entry>) -> PropertyValue {
    let store = Arc::clone(store);
    PropertyValue::References(Box::new(
        entries.into_iter().map(move |entry| Ok(handle(&store, entry))),
    ))
}

fn to_value(store: &Arc<Store>, literal: &Literal) -> Result<Value> {
    let value = match literal {
        Literal::String(v) => Value::String(v.clone()),
        Literal::Integer(v) => Value::Integer(*v),
        Literal::Short(v) => Value::Short(*v),
        Literal::Long(v) => Value::Long(*v),
        Literal::Float(v) => Value::Float(*v),
        Literal::Double(v) => Value::Double(*v),
        Literal::Boolean(v) => Value::Boolean(*v),
        Literal::DateTime(v) => Value::DateTime(*v),
        Literal::Blob(v) => Value::Blob(v.clone()),
        Literal::Reference(id) => Value::Reference(resolve(store, id)?),
        Literal::Content(bytes) => Value::Content(Arc::new(MemoryContent::new(Arc::clone(bytes)))),
        Literal::Id(v) => Value::Id(v.clone()),
        Literal::Guid(v) => Value::Guid(*v),
    };
    Ok(value)
}

fn read_property(store: &Arc<Store>, entry: Entry, name: &QName) -> Result<PropertyValue> {
    let class = store.entry_class(entry);
    let index = store
        .full_properties(class)
        .into_iter()
        .find(|&p| store.properties[p].qname == *name)
        .ok_or_else(|| RepositoryError::PropertyNotFound {
            object: store.entry_id(entry).clone(),
            property: name.clone(),
        })?;

    if index < store.system_property_count {
        return read_system_property(store, entry, name.name());
    }

    let def = &store.properties[index];
    let slot = match entry {
        Entry::Object(o) => store.objects[o].values.get(&index),
        _ => None,
    };

    match slot {
        None if !def.multi_value => Ok(PropertyValue::Single(None)),
        None if def.data_type == DataType::Reference => Ok(PropertyValue::no_references()),
        None => Ok(PropertyValue::Multi(Vec::new())),
        Some(Slot::Single(literal)) => Ok(PropertyValue::Single(Some(to_value(store, literal)?))),
        Some(Slot::Multi(literals)) if def.data_type == DataType::Reference => {
            let ids: Vec<ObjectId> = literals
                .iter()
                .filter_map(|literal| match literal {
                    Literal::Reference(id) => Some(id.clone()),
                    _ => None,
                })
                .collect();
            let store = Arc::clone(store);
            Ok(PropertyValue::References(Box::new(
                ids.into_iter().map(move |id| resolve(&store, &id)),
            )))
        }
        Some(Slot::Multi(literals)) => literals
            .iter()
            .map(|literal| to_value(store, literal))
            .collect::<Result<Vec<_>>>()
            .map(PropertyValue::Multi),
    }
}

fn read_system_property(store: &Arc<Store>, entry: Entry, name: &str) -> Result<PropertyValue> {
    let single = |value: Value| PropertyValue::Single(Some(value));

    let value = match (name, entry) {
        (schema::ID, _) => single(Value::Id(store.entry_id(entry).clone())),
        (schema::GUID, _) => single(Value::Guid(store.entry_guid(entry))),
        (schema::CLASS_REF, _) => single(Value::Reference(handle(
            store,
            Entry::Class(store.entry_class(entry)),
        ))),
        (schema::NAME, Entry::Repository) => single(Value::String(store.name.clone())),
        (schema::NAME, Entry::Class(i)) => {
            single(Value::String(store.classes[i].qname.name().to_string()))
        }
        (schema::NAME, Entry::Property(i)) => {
            single(Value::String(store.properties[i].qname.name().to_string()))
        }
        (schema::NAMESPACE, Entry::Class(i)) => {
            single(Value::String(store.classes[i].qname.namespace().to_string()))
        }
        (schema::NAMESPACE, Entry::Property(i)) => {
            single(Value::String(store.properties[i].qname.namespace().to_string()))
        }
        (schema::RETRIEVABLE, Entry::Class(i)) => single(Value::Boolean(store.classes[i].retrievable)),
        (schema::SUPER_CLASS, Entry::Class(i)) => PropertyValue::Single(
            store.classes[i]
                .parent
                .map(|parent| Value::Reference(handle(store, Entry::Class(parent)))),
        ),
        (schema::DECLARED_PROPERTIES, Entry::Class(i)) => entry_references(
            store,
            store.classes[i].declared.iter().map(|&p| Entry::Property(p)).collect(),
        ),
        (schema::SUB_CLASSES, Entry::Class(i)) => entry_references(
            store,
            store.classes[i].sub_classes.iter().map(|&c| Entry::Class(c)).collect(),
        ),
        (schema::DATA_TYPE, Entry::Property(i)) => {
            single(Value::Integer(i32::from(store.properties[i].data_type.code())))
        }
        (schema::MULTI_VALUE, Entry::Property(i)) => {
            single(Value::Boolean(store.properties[i].multi_value))
        }
        (schema::ROOT_CLASS, Entry::Repository) => single(Value::Reference(handle(
            store,
            Entry::Class(schema::OBJECT_CLASS),
        ))),
        (schema::ROOT_FOLDER, Entry::Repository) => match &store.root_folder {
            Some(id) => single(Value::Reference(resolve(store, id)?)),
            None => PropertyValue::Single(None),
        },
        _ => PropertyValue::Single(None),
    };
    Ok(value)
}

/// Handle to a data object or the repository object.
struct MemObject {
    store: Arc<Store>,
    entry: Entry,
}

impl DataObject for MemObject {
    fn id(&self) -> &ObjectId {
        self.store.entry_id(self.entry)
    }

    fn class(&self) -> ClassRef {
        class_ref(&self.store, self.store.entry_class(self.entry))
    }

    fn property(&self, name: &QName) -> Result<PropertyValue> {
        read_property(&self.store, self.entry, name)
    }
}

/// Handle to a class descriptor.
struct MemClass {
    store: Arc<Store>,
    index: usize,
}

impl MemClass {
    fn def(&self) -> &ClassDef {
        &self.store.classes[self.index]
    }
}

impl DataObject for MemClass {
    fn id(&self) -> &ObjectId {
        &self.def().id
    }

    fn class(&self) -> ClassRef {
        class_ref(&self.store, schema::CLASS_CLASS)
    }

    fn property(&self, name: &QName) -> Result<PropertyValue> {
        read_property(&self.store, Entry::Class(self.index), name)
    }
}

impl ClassDescriptor for MemClass {
    fn qname(&self) -> &QName {
        &self.def().qname
    }

    fn is_retrievable(&self) -> bool {
        self.def().retrievable
    }

    fn properties(&self) -> Result<Vec<PropertyInfoRef>> {
        Ok(self
            .store
            .full_properties(self.index)
            .into_iter()
            .map(|p| property_ref(&self.store, p))
            .collect())
    }

    fn declared_properties(&self) -> Result<Vec<PropertyInfoRef>> {
        Ok(self
            .def()
            .declared
            .iter()
            .map(|&p| property_ref(&self.store, p))
            .collect())
    }

    fn sub_classes(&self) -> Result<Vec<ClassRef>> {
        Ok(self
            .def()
            .sub_classes
            .iter()
            .map(|&c| class_ref(&self.store, c))
            .collect())
    }

    fn as_object(&self) -> &dyn DataObject {
        self
    }
}

/// Handle to a property descriptor.
struct MemPropertyInfo {
    store: Arc<Store>,
    index: usize,
}

impl MemPropertyInfo {
    fn def(&self) -> &PropertyDef {
        &self.store.properties[self.index]
    }
}

impl DataObject for MemPropertyInfo {
    fn id(&self) -> &ObjectId {
        &self.def().id
    }

    fn class(&self) -> ClassRef {
        class_ref(&self.store, schema::PROPERTY_INFO_CLASS)
    }

    fn property(&self, name: &QName) -> Result<PropertyValue> {
        read_property(&self.store, Entry::Property(self.index), name)
    }
}

impl PropertyDescriptor for MemPropertyInfo {
    fn qname(&self) -> &QName {
        &self.def().qname
    }

    fn data_type(&self) -> DataType {
        self.def().data_type
    }

    fn is_multi_value(&self) -> bool {
        self.def().multi_value
    }

    fn as_object(&self) -> &dyn DataObject {
        self
    }
}

/// A repository held entirely in memory.
///
/// Built with [`RepositoryBuilder`] or loaded from a
/// [`Snapshot`](crate::Snapshot). Cloning is cheap.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    store: Arc<Store>,
}

impl MemoryRepository {
    pub(crate) fn from_store(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Start building a repository.
    pub fn builder(id: impl Into<ObjectId>, name: impl Into<String>) -> RepositoryBuilder {
        RepositoryBuilder::new(id, name)
    }

    /// Display name of the repository.
    pub fn name(&self) -> &str {
        &self.store.name
    }

    /// Number of classes, system classes included.
    pub fn class_count(&self) -> usize {
        self.store.classes.len()
    }

    /// Number of data objects.
    pub fn object_count(&self) -> usize {
        self.store.objects.len()
    }

    /// Look up a class by qualified name.
    pub fn find_class(&self, qname: &QName) -> Option<ClassRef> {
        self.store
            .classes
            .iter()
            .position(|class| class.qname == *qname)
            .map(|index| class_ref(&self.store, index))
    }
}

impl Repository for MemoryRepository {
    fn id(&self) -> &ObjectId {
        &self.store.id
    }

    fn repository_object(&self) -> Result<ObjectRef> {
        Ok(handle(&self.store, Entry::Repository))
    }

    fn root_class(&self) -> Result<ClassRef> {
        Ok(class_ref(&self.store, schema::OBJECT_CLASS))
    }

    fn fetch(&self, id: &ObjectId) -> Result<ObjectRef> {
        match self.store.index.get(id) {
            Some(Entry::Object(index)) => {
                let class = self.store.objects[*index].class;
                if self.store.classes[class].retrievable {
                    Ok(handle(&self.store, Entry::Object(*index)))
                } else {
                    Err(RepositoryError::NotFound(id.clone()))
                }
            }
            Some(entry) => Ok(handle(&self.store, *entry)),
            None => Err(RepositoryError::NotFound(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryRepository {
        let mut builder = RepositoryBuilder::new("repo", "Sample");
        let doc = builder.add_class("custom", "Doc", None);
        let address = builder.add_class("custom", "Address", None);
        builder.set_retrievable(address, false);
        let title = builder.add_property(doc, "custom", "title", DataType::String);
        let tags = builder.add_multi_property(doc, "custom", "tags", DataType::String);
        let related = builder.add_multi_property(doc, "custom", "related", DataType::Reference);
        let home = builder.add_property(doc, "custom", "home", DataType::Reference);

        let a = builder.add_object("a", doc);
        builder.set_string(a, title, "First");
        builder.set_values(a, tags, vec!["x".into(), "y".into()]);
        builder.set_references(a, related, &["b", "a"]);
        builder.set_reference(a, home, "addr");
        builder.add_object("b", doc);
        builder.add_object("addr", address);
        builder.build().unwrap()
    }

    #[test]
    fn test_fetch_respects_retrievability() {
        let repo = sample();
        assert!(repo.fetch(&"a".into()).is_ok());
        assert!(matches!(repo.fetch(&"addr".into()), Err(e) if e.is_not_found()));
        assert!(matches!(repo.fetch(&"missing".into()), Err(e) if e.is_not_found()));
    }

    #[test]
    fn test_class_properties_inherit_system_first() {
        let repo = sample();
        let doc = repo.find_class(&QName::new("custom", "Doc")).unwrap();
        let names: Vec<String> = doc
            .properties()
            .unwrap()
            .iter()
            .map(|p| p.qname().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "opendma:Id",
                "opendma:Guid",
                "opendma:Class",
                "custom:title",
                "custom:tags",
                "custom:related",
                "custom:home",
            ]
        );
        assert_eq!(doc.declared_properties().unwrap().len(), 4);
    }

    #[test]
    fn test_read_values() {
        let repo = sample();
        let a = repo.fetch(&"a".into()).unwrap();

        match a.property(&QName::new("custom", "title")).unwrap() {
            PropertyValue::Single(Some(Value::String(s))) => assert_eq!(s, "First"),
            other => panic!("unexpected {:?}", other),
        }

        match a.property(&QName::new("custom", "related")).unwrap() {
            PropertyValue::References(iter) => {
                let ids: Vec<String> = iter.map(|r| r.unwrap().id().to_string()).collect();
                assert_eq!(ids, vec!["b", "a"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        match a.property(&QName::new("custom", "home")).unwrap() {
            PropertyValue::Single(Some(Value::Reference(obj))) => {
                assert_eq!(obj.id().as_str(), "addr");
                assert!(!obj.class().is_retrievable());
            }
            other => panic!("unexpected {:?}", other),
        }

        let b = repo.fetch(&"b".into()).unwrap();
        assert!(matches!(
            b.property(&QName::new("custom", "title")).unwrap(),
            PropertyValue::Single(None)
        ));
        assert!(matches!(
            b.property(&QName::new("custom", "tags")).unwrap(),
            PropertyValue::Multi(ref v) if v.is_empty()
        ));
    }

    #[test]
    fn test_unknown_property() {
        let repo = sample();
        let a = repo.fetch(&"a".into()).unwrap();
        let err = a.property(&QName::new("custom", "nope")).unwrap_err();
        assert!(matches!(err, RepositoryError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_class_objects_expose_metadata() {
        let repo = sample();
        let root = repo.root_class().unwrap();
        assert!(root.qname().is_system());
        let subs: Vec<String> = root
            .sub_classes()
            .unwrap()
            .iter()
            .map(|c| c.qname().to_string())
            .collect();
        assert_eq!(
            subs,
            vec![
                "opendma:Class",
                "opendma:PropertyInfo",
                "opendma:Repository",
                "custom:Doc",
                "custom:Address",
            ]
        );

        let doc = repo.find_class(&QName::new("custom", "Doc")).unwrap();
        assert_eq!(doc.class().qname().to_string(), "opendma:Class");
        match doc.property(&QName::system(schema::NAME)).unwrap() {
            PropertyValue::Single(Some(Value::String(s))) => assert_eq!(s, "Doc"),
            other => panic!("unexpected {:?}", other),
        }
        match doc.property(&QName::system(schema::SUPER_CLASS)).unwrap() {
            PropertyValue::Single(Some(Value::Reference(parent))) => {
                assert_eq!(parent.id().as_str(), "opendma:Object")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_repository_object() {
        let repo = sample();
        let obj = repo.repository_object().unwrap();
        assert_eq!(obj.id().as_str(), "repo");
        assert_eq!(obj.class().qname().to_string(), "opendma:Repository");
        match obj.property(&QName::system(schema::ROOT_CLASS)).unwrap() {
            PropertyValue::Single(Some(Value::Reference(root))) => {
                assert_eq!(root.id().as_str(), "opendma:Object")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
