//! JSON messages
//!
//! One object per message with a fixed key order: `date`, `time`, `host`,
//! `user`, the metadata keys, `pv`, `new`, `old` and the optional size and
//! burst keys. Floats are written with enough digits to round-trip and keep
//! a decimal point; non-finite floats become the strings `"Nan"`,
//! `"Infinity"` and `"-Infinity"`.

use std::sync::Arc;

use parking_lot::RwLock;
use putlog_core::numfmt::{format_round_trip, F32_ROUND_TRIP_PRECISION, F64_ROUND_TRIP_PRECISION};
use putlog_core::{FieldValue, Metadata, Scalar, SpecialFloat};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::value::RawValue;

use super::{write_time, LogRecord};
use crate::config::TimestampZone;
use crate::error::FormatError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

pub struct JsonFormatter {
    metadata: Arc<RwLock<Metadata>>,
    zone: TimestampZone,
}

impl JsonFormatter {
    pub fn new(metadata: Arc<RwLock<Metadata>>, zone: TimestampZone) -> Self {
        Self { metadata, zone }
    }

    pub fn format(&self, record: &LogRecord<'_>) -> Result<String, FormatError> {
        let metadata = self.metadata.read();
        let message = JsonMessage {
            record,
            metadata: &metadata,
            zone: self.zone,
        };
        Ok(serde_json::to_string(&message)?)
    }
}

struct JsonMessage<'a> {
    record: &'a LogRecord<'a>,
    metadata: &'a Metadata,
    zone: TimestampZone,
}

impl Serialize for JsonMessage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let event = self.record.event;
        let sized = event.field_type.is_array_like();

        let mut map = serializer.serialize_map(None)?;
        let mut date = String::with_capacity(10);
        write_time(&mut date, &event.timestamp, self.zone, DATE_FORMAT).map_err(S::Error::custom)?;
        let mut time = String::with_capacity(12);
        write_time(&mut time, &event.timestamp, self.zone, TIME_FORMAT).map_err(S::Error::custom)?;
        map.serialize_entry("date", &date)?;
        map.serialize_entry("time", &time)?;
        map.serialize_entry("host", &event.host)?;
        map.serialize_entry("user", &event.user)?;
        for (key, value) in self.metadata.iter() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("pv", &event.name)?;

        map.serialize_entry("new", &JsonValue(&event.new_value))?;
        if sized {
            map.serialize_entry("new-size", &event.new_value.size())?;
        }
        map.serialize_entry("old", &JsonValue(self.record.old_value))?;
        if sized {
            map.serialize_entry("old-size", &self.record.old_value.size())?;
        }

        if let Some(burst) = &self.record.burst {
            map.serialize_entry("min", &JsonScalar(burst.min))?;
            map.serialize_entry("max", &JsonScalar(burst.max))?;
            map.serialize_entry("burst", &burst.count)?;
        }
        map.end()
    }
}

struct JsonValue<'a>(&'a FieldValue);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            FieldValue::Scalar(scalar) => JsonScalar(scalar).serialize(serializer),
            FieldValue::LongString { text, .. } => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(text)?;
                seq.end()
            }
            FieldValue::Array(array) => {
                let elements = array.elements();
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements.iter() {
                    seq.serialize_element(&JsonScalar(&element))?;
                }
                seq.end()
            }
        }
    }
}

struct JsonScalar<'a>(&'a Scalar);

impl Serialize for JsonScalar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(special) = self.0.special_float() {
            return serializer.serialize_str(match special {
                SpecialFloat::Nan => "Nan",
                SpecialFloat::PositiveInfinity => "Infinity",
                SpecialFloat::NegativeInfinity => "-Infinity",
            });
        }
        match self.0 {
            Scalar::Int8(v) => serializer.serialize_i8(*v),
            Scalar::UInt8(v) => serializer.serialize_u8(*v),
            Scalar::Int16(v) => serializer.serialize_i16(*v),
            Scalar::UInt16(v) => serializer.serialize_u16(*v),
            Scalar::Int32(v) => serializer.serialize_i32(*v),
            Scalar::UInt32(v) => serializer.serialize_u32(*v),
            Scalar::Int64(v) => serializer.serialize_i64(*v),
            Scalar::UInt64(v) => serializer.serialize_u64(*v),
            Scalar::Float32(v) => {
                raw_number(format_round_trip(f64::from(*v), F32_ROUND_TRIP_PRECISION), serializer)
            }
            Scalar::Float64(v) => {
                raw_number(format_round_trip(*v, F64_ROUND_TRIP_PRECISION), serializer)
            }
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Emit already formatted number text verbatim
fn raw_number<S: Serializer>(text: String, serializer: S) -> Result<S::Ok, S::Error> {
    let raw = RawValue::from_string(text).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}
