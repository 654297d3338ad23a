//! JSON snapshots of a repository.
//!
//! A snapshot lists the repository object, user classes with their declared
//! properties, and data objects with their values keyed by qualified name:
//!
//! ```json
//! {
//!   "repository": { "id": "repo-1", "name": "Documents", "rootFolder": "A" },
//!   "classes": [
//!     { "namespace": "custom", "name": "Doc",
//!       "properties": [ { "namespace": "custom", "name": "owner", "type": "reference" } ] },
//!     { "namespace": "custom", "name": "Person" }
//!   ],
//!   "objects": [
//!     { "id": "A", "class": "custom:Doc", "properties": { "custom:owner": "B" } },
//!     { "id": "B", "class": "custom:Person" }
//!   ]
//! }
//! ```
//!
//! JSON values are read according to the declared kind: datetimes as
//! `yyyy-MM-dd HH:mm:ss`, blobs and content as standard Base64, references
//! and ids as id strings, guids in canonical form. `null` leaves a value unset.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::NaiveDateTime;
use repodump_common::{Guid, ObjectId, QName};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::Literal;
use crate::{DataType, MemoryRepository, RepositoryBuilder, RepositoryError, Result};

/// Datetime layout used in snapshots.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialized form of a whole repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub repository: RepositoryEntry,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
}

/// The repository object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEntry {
    pub id: ObjectId,
    pub name: String,
    /// Id of the object the export starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<ObjectId>,
}

/// A user class. Its parent must appear earlier in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<QName>,
    #[serde(default = "default_retrievable")]
    pub retrievable: bool,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

/// A property declared by a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub namespace: String,
    pub name: String,
    /// Lowercase kind name, e.g. `string` or `reference`.
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub multi_value: bool,
}

/// A data object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub id: ObjectId,
    pub class: QName,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

fn default_retrievable() -> bool {
    true
}

impl Snapshot {
    /// Read a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading snapshot");
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a snapshot document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the in-memory repository described by this snapshot.
    pub fn into_repository(self) -> Result<MemoryRepository> {
        let mut builder = RepositoryBuilder::new(self.repository.id, self.repository.name);
        if let Some(root) = self.repository.root_folder {
            builder.set_root_folder(root);
        }

        for class in self.classes {
            let qname = QName::new(class.namespace.as_str(), class.name.as_str());
            let parent = match &class.parent {
                Some(parent) => Some(builder.find_class(parent).ok_or_else(|| {
                    RepositoryError::Snapshot(format!(
                        "class {} names unknown parent {}",
                        qname, parent
                    ))
                })?),
                None => None,
            };

            let handle = match class.id {
                Some(id) => builder.add_class_with_id(id, &class.namespace, &class.name, parent),
                None => builder.add_class(&class.namespace, &class.name, parent),
            };
            builder.set_retrievable(handle, class.retrievable);

            for property in class.properties {
                let data_type = DataType::from_name(&property.data_type).ok_or_else(|| {
                    RepositoryError::Snapshot(format!(
                        "property {}:{} of class {} has unknown type {:?}",
                        property.namespace, property.name, qname, property.data_type
                    ))
                })?;
                let pname = QName::new(property.namespace, property.name);
                let id = property
                    .id
                    .unwrap_or_else(|| ObjectId::new(format!("{}/{}", qname, pname)));
                builder.add_property_with_id(id, handle, pname, data_type, property.multi_value);
            }
        }

        for object in self.objects {
            let class = builder.find_class(&object.class).ok_or_else(|| {
                RepositoryError::Snapshot(format!(
                    "object {} has unknown class {}",
                    object.id, object.class
                ))
            })?;
            let handle = builder.add_object(object.id.clone(), class);

            for (key, json) in &object.properties {
                let qname: QName = key.parse().map_err(|e| {
                    RepositoryError::Snapshot(format!("object {}: {}", object.id, e))
                })?;
                let unknown = || {
                    RepositoryError::Snapshot(format!(
                        "object {} has no property {}",
                        object.id, qname
                    ))
                };
                let property = builder.find_property(class, &qname).ok_or_else(unknown)?;
                let (data_type, multi_value) = builder.property_type(property).ok_or_else(unknown)?;

                let invalid = |reason: String| {
                    RepositoryError::Snapshot(format!(
                        "object {} property {}: {}",
                        object.id, qname, reason
                    ))
                };

                if json.is_null() {
                    continue;
                }
                if multi_value {
                    let items = json
                        .as_array()
                        .ok_or_else(|| invalid("expected an array".to_string()))?;
                    let values = items
                        .iter()
                        .map(|item| literal(data_type, item))
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(invalid)?;
                    builder.set_values(handle, property, values);
                } else {
                    let value = literal(data_type, json).map_err(invalid)?;
                    builder.set_value(handle, property, value);
                }
            }
        }

        builder.build()
    }
}

/// Interpret one JSON value as a literal of the given kind.
fn literal(kind: DataType, json: &serde_json::Value) -> std::result::Result<Literal, String> {
    let text = || {
        json.as_str()
            .ok_or_else(|| format!("expected a string for {}", kind))
    };
    let integer = || {
        json.as_i64()
            .ok_or_else(|| format!("expected an integer for {}", kind))
    };
    let number = || {
        json.as_f64()
            .ok_or_else(|| format!("expected a number for {}", kind))
    };

    let literal = match kind {
        DataType::String => Literal::String(text()?.to_string()),
        DataType::Integer => Literal::Integer(
            i32::try_from(integer()?).map_err(|_| "integer out of range".to_string())?,
        ),
        DataType::Short => Literal::Short(
            i16::try_from(integer()?).map_err(|_| "short out of range".to_string())?,
        ),
        DataType::Long => Literal::Long(integer()?),
        DataType::Float => Literal::Float(number()? as f32),
        DataType::Double => Literal::Double(number()?),
        DataType::Boolean => Literal::Boolean(
            json.as_bool()
                .ok_or_else(|| "expected a boolean".to_string())?,
        ),
        DataType::DateTime => Literal::DateTime(
            NaiveDateTime::parse_from_str(text()?, DATETIME_FORMAT).map_err(|e| e.to_string())?,
        ),
        DataType::Blob => Literal::Blob(BASE64.decode(text()?).map_err(|e| e.to_string())?),
        DataType::Content => {
            Literal::content(BASE64.decode(text()?).map_err(|e| e.to_string())?)
        }
        DataType::Reference => Literal::reference(text()?),
        DataType::Id => Literal::Id(ObjectId::new(text()?)),
        DataType::Guid => Literal::Guid(text()?.parse::<Guid>().map_err(|e| e.to_string())?),
    };
    Ok(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{PropertyValue, Value};
    use crate::Repository;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "repository": { "id": "repo-1", "name": "Documents", "rootFolder": "A" },
        "classes": [
            { "namespace": "custom", "name": "Doc",
              "properties": [
                { "namespace": "custom", "name": "title", "type": "string" },
                { "namespace": "custom", "name": "created", "type": "datetime" },
                { "namespace": "custom", "name": "owner", "type": "reference" },
                { "namespace": "custom", "name": "tags", "type": "string", "multiValue": true },
                { "namespace": "custom", "name": "body", "type": "content" }
              ] },
            { "namespace": "custom", "name": "Memo", "parent": "custom:Doc" },
            { "namespace": "custom", "name": "Person", "retrievable": false }
        ],
        "objects": [
            { "id": "A", "class": "custom:Memo",
              "properties": {
                "custom:title": "Hello",
                "custom:created": "2024-03-05 07:08:09",
                "custom:owner": "B",
                "custom:tags": ["x", "y"],
                "custom:body": "AAEC"
              } },
            { "id": "B", "class": "custom:Person", "properties": { } }
        ]
    }"#;

    #[test]
    fn test_snapshot_round_trip_into_repository() {
        let repo = Snapshot::from_json(SAMPLE).unwrap().into_repository().unwrap();
        assert_eq!(repo.object_count(), 2);

        let a = repo.fetch(&"A".into()).unwrap();
        assert_eq!(a.class().qname().to_string(), "custom:Memo");

        match a.property(&QName::new("custom", "created")).unwrap() {
            PropertyValue::Single(Some(Value::DateTime(dt))) => {
                assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2024-03-05 07:08:09")
            }
            other => panic!("unexpected {:?}", other),
        }
        match a.property(&QName::new("custom", "tags")).unwrap() {
            PropertyValue::Multi(values) => assert_eq!(values.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        match a.property(&QName::new("custom", "owner")).unwrap() {
            PropertyValue::Single(Some(Value::Reference(b))) => {
                assert_eq!(b.id().as_str(), "B");
                assert!(!b.class().is_retrievable());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_parent() {
        let json = r#"{
            "repository": { "id": "r", "name": "R" },
            "classes": [ { "namespace": "custom", "name": "Memo", "parent": "custom:Doc" } ]
        }"#;
        let err = Snapshot::from_json(json).unwrap().into_repository().unwrap_err();
        assert!(matches!(err, RepositoryError::Snapshot(ref msg) if msg.contains("custom:Doc")));
    }

    #[test]
    fn test_bad_value_names_object_and_property() {
        let json = r#"{
            "repository": { "id": "r", "name": "R" },
            "classes": [ { "namespace": "custom", "name": "Doc",
                "properties": [ { "namespace": "custom", "name": "count", "type": "integer" } ] } ],
            "objects": [ { "id": "A", "class": "custom:Doc", "properties": { "custom:count": "many" } } ]
        }"#;
        let err = Snapshot::from_json(json).unwrap().into_repository().unwrap_err();
        match err {
            RepositoryError::Snapshot(msg) => {
                assert!(msg.contains("A"));
                assert!(msg.contains("custom:count"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_name() {
        let json = r#"{
            "repository": { "id": "r", "name": "R" },
            "classes": [ { "namespace": "custom", "name": "Doc",
                "properties": [ { "namespace": "custom", "name": "x", "type": "decimal" } ] } ]
        }"#;
        assert!(matches!(
            Snapshot::from_json(json).unwrap().into_repository(),
            Err(RepositoryError::Snapshot(_))
        ));
    }

    #[test]
    fn test_null_leaves_value_unset() {
        let json = r#"{
            "repository": { "id": "r", "name": "R" },
            "classes": [ { "namespace": "custom", "name": "Doc",
                "properties": [ { "namespace": "custom", "name": "title", "type": "string" } ] } ],
            "objects": [ { "id": "A", "class": "custom:Doc", "properties": { "custom:title": null } } ]
        }"#;
        let repo = Snapshot::from_json(json).unwrap().into_repository().unwrap();
        let a = repo.fetch(&"A".into()).unwrap();
        assert!(matches!(
            a.property(&QName::new("custom", "title")).unwrap(),
            PropertyValue::Single(None)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let snapshot = Snapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.classes.len(), 3);
        assert_eq!(snapshot.repository.name, "Documents");
    }
}
