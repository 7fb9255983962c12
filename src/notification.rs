//! Notification payloads delivered by Event Dripper webhooks.
//!
//! A [`Notification`] is only obtained from a verified request (see
//! [`crate::webhooks::construct_notification`]); it is plain data after that.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A trigger firing for one entity, with the events that caused it.
///
/// Decoding only accepts a JSON object. Missing or `null` fields take their
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub trigger_name: String,
    pub entity_id: String,
    /// Events in the order the sender listed them.
    pub events: Vec<Event>,
}

/// One occurrence within a notification.
///
/// A missing or `null` `at` decodes to the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    pub name: String,
    /// Opaque bytes supplied when the event was added.
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub data: Vec<u8>,
}

impl Notification {
    pub fn new(trigger_name: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            trigger_name: trigger_name.into(),
            entity_id: entity_id.into(),
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Most recent event, by position.
    pub fn latest_event(&self) -> Option<&Event> {
        self.events.last()
    }
}

impl Event {
    pub fn new(at: DateTime<Utc>, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            at,
            name: name.into(),
            data: data.into(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct NotificationFields {
    #[serde(deserialize_with = "null_as_default")]
    trigger_name: String,
    #[serde(deserialize_with = "null_as_default")]
    entity_id: String,
    #[serde(deserialize_with = "null_as_default")]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct EventFields {
    #[serde(default = "epoch", deserialize_with = "null_as_epoch")]
    at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, with = "base64_bytes")]
    data: Vec<u8>,
}

impl<'de> Deserialize<'de> for Notification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields: NotificationFields = deserialize_object(deserializer, "a notification object")?;
        Ok(Self {
            trigger_name: fields.trigger_name,
            entity_id: fields.entity_id,
            events: fields.events,
        })
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields: EventFields = deserialize_object(deserializer, "an event object")?;
        Ok(Self {
            at: fields.at,
            name: fields.name,
            data: fields.data,
        })
    }
}

/// Derived struct decoding also takes positional arrays; this only takes maps.
fn deserialize_object<'de, D, T>(deserializer: D, expecting: &'static str) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct ObjectVisitor<T> {
        expecting: &'static str,
        marker: PhantomData<T>,
    }

    impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str(self.expecting)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_map(ObjectVisitor {
        expecting,
        marker: PhantomData,
    })
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn null_as_epoch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(epoch))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Byte fields travel as standard base64 strings; `null` means no bytes.
pub(crate) mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD.decode(encoded).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
