//! `serde` support: any element serializes as the JSON value it describes.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::element::{Element, ValueKind};
use crate::view::DocumentView;

impl<D: DocumentView> Serialize for Element<'_, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value_kind() {
            ValueKind::Null => serializer.serialize_unit(),
            ValueKind::True => serializer.serialize_bool(true),
            ValueKind::False => serializer.serialize_bool(false),
            ValueKind::Number => {
                if let Ok(value) = self.get_i64() {
                    serializer.serialize_i64(value)
                } else if let Ok(value) = self.get_u64() {
                    serializer.serialize_u64(value)
                } else {
                    let value = self.get_f64().map_err(S::Error::custom)?;
                    serializer.serialize_f64(value)
                }
            }
            ValueKind::String => {
                let value = self.get_string().map_err(S::Error::custom)?;
                serializer.serialize_str(&value)
            }
            ValueKind::Array => {
                let items = self.enumerate_array().map_err(S::Error::custom)?;
                let len = self.array_length().map_err(S::Error::custom)?;
                let mut seq = serializer.serialize_seq(Some(len as usize))?;
                for item in items {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
            ValueKind::Object => {
                let properties = self.enumerate_object().map_err(S::Error::custom)?;
                // Length unknown up front: internal properties are skipped.
                let mut map = serializer.serialize_map(None)?;
                for property in properties {
                    if property.is_internal() {
                        continue;
                    }
                    let name = property.name_str().map_err(S::Error::custom)?;
                    map.serialize_entry(name.as_ref(), &property.value)?;
                }
                map.end()
            }
            ValueKind::Undefined => Err(S::Error::custom(format!(
                "row {} is not a value",
                self.index().0
            ))),
        }
    }
}
