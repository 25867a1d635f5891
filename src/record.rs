//! Growing-guide records shared by the fruit, vegetable and greens collections.
//!
//! The API shape ([`Record`]) carries the identifier as a hex string under `id`; the stored shape
//! ([`RecordDocument`]) keeps it as a native ObjectId under `_id`. Both flatten the same
//! [`PlantProfile`].

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three collections exposed by the API. Each kind owns one MongoDB collection and one
/// `/api/{kind}` route prefix, both named by [`EntityKind::collection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Fruit,
    Vegetable,
    Green,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Fruit, EntityKind::Vegetable, EntityKind::Green];

    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Fruit => "fruits",
            EntityKind::Vegetable => "vegetables",
            EntityKind::Green => "greens",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Free-text cultivation attributes. Every field is optional; blank values are never written out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantProfile {
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub development_eta: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub ideal_development_temperature: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub harvest: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub sunlight: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub irrigation: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub planting: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub extra_info: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub observation: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub image_path: Option<String>,
}

impl PlantProfile {
    /// Every settable field with its stored name, blanks collapsed to `None`.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 11] {
        fn get(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.is_empty())
        }
        [
            ("name", get(&self.name)),
            ("description", get(&self.description)),
            ("development_eta", get(&self.development_eta)),
            ("ideal_development_temperature", get(&self.ideal_development_temperature)),
            ("harvest", get(&self.harvest)),
            ("sunlight", get(&self.sunlight)),
            ("irrigation", get(&self.irrigation)),
            ("planting", get(&self.planting)),
            ("extra_info", get(&self.extra_info)),
            ("observation", get(&self.observation)),
            ("image_path", get(&self.image_path)),
        ]
    }

    /// `$set` body that overwrites every field; absent values are stored as `null`.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        for (key, value) in self.fields() {
            let bson = value.map_or(Bson::Null, |s| Bson::String(s.to_string()));
            set.insert(key, bson);
        }
        set
    }

    /// Update operator that replaces every field and leaves `_id` alone.
    pub fn to_update_document(&self) -> Document {
        doc! { "$set": self.to_set_document() }
    }
}

mod hex_id {
    use mongodb::bson::oid::ObjectId;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        id: &Option<ObjectId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_str(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ObjectId>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|s| !s.is_empty())
            .map(|s| ObjectId::parse_str(&s).map_err(de::Error::custom))
            .transpose()
    }
}

/// A record as exchanged over HTTP.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, with = "hex_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub profile: PlantProfile,
}

impl Record {
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A record as stored in MongoDB.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub profile: PlantProfile,
}

impl From<Record> for RecordDocument {
    fn from(record: Record) -> Self {
        RecordDocument {
            id: record.id,
            profile: record.profile,
        }
    }
}

impl From<RecordDocument> for Record {
    fn from(doc: RecordDocument) -> Self {
        Record {
            id: doc.id,
            profile: doc.profile,
        }
    }
}
