//! Field values
//!
//! A put carries an old and a new [`FieldValue`]. Values are a closed sum type
//! over the element kinds a control-system field can hold, so every consumer
//! (equality, min/max tracking, formatting) matches exhaustively instead of
//! switching on an external type tag.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numfmt::{format_general, PLAIN_PRECISION};

/// Storage size of a bounded string field, including the terminator
pub const MAX_STRING_SIZE: usize = 40;

/// Longest text a bounded string value keeps
pub const MAX_STRING_CHARS: usize = MAX_STRING_SIZE - 1;

/// Default byte budget for one logged array or long string value
pub const DEFAULT_MAX_ARRAY_BYTES: usize = 400;

/// Placeholder logged when a field value cannot be read
pub const NOT_ACCESSIBLE: &str = "Not Accessible";

/// Element kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
}

impl ScalarKind {
    /// Whether values of this kind have an ordering for min/max tracking
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ScalarKind::String)
    }

    /// Whether values of this kind are floating point
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::Float32 | ScalarKind::Float64)
    }

    /// Bytes one element occupies in the source record
    pub fn element_bytes(&self) -> usize {
        match self {
            ScalarKind::Int8 | ScalarKind::UInt8 => 1,
            ScalarKind::Int16 | ScalarKind::UInt16 => 2,
            ScalarKind::Int32 | ScalarKind::UInt32 | ScalarKind::Float32 => 4,
            ScalarKind::Int64 | ScalarKind::UInt64 | ScalarKind::Float64 => 8,
            ScalarKind::String => MAX_STRING_SIZE,
        }
    }

    /// Number of elements that fit into a byte budget
    pub fn elements_within(&self, max_bytes: usize) -> usize {
        max_bytes / self.element_bytes()
    }

    fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int8 => "int8",
            ScalarKind::UInt8 => "uint8",
            ScalarKind::Int16 => "int16",
            ScalarKind::UInt16 => "uint16",
            ScalarKind::Int32 => "int32",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// A single element
    Scalar(ScalarKind),
    /// A character array displayed as one piece of text
    LongString,
    /// An array of elements
    Array(ScalarKind),
}

impl FieldType {
    /// Numeric single-element field, the only kind that gets min/max summaries
    pub fn is_numeric_scalar(&self) -> bool {
        matches!(self, FieldType::Scalar(kind) if kind.is_numeric())
    }

    /// Whether the structured format renders this type as a sequence with sizes
    pub fn is_array_like(&self) -> bool {
        matches!(self, FieldType::Array(_) | FieldType::LongString)
    }

    /// Whether consecutive puts of this type may be merged into a burst
    pub fn allows_burst_filter(&self) -> bool {
        !matches!(self, FieldType::LongString)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{}", kind),
            FieldType::LongString => write!(f, "long string"),
            FieldType::Array(kind) => write!(f, "{}[]", kind),
        }
    }
}

/// A single element value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
}

/// Non-finite float classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialFloat {
    Nan,
    PositiveInfinity,
    NegativeInfinity,
}

impl Scalar {
    /// Create a bounded string value, cutting text beyond the field size
    pub fn string(text: impl Into<String>) -> Self {
        Scalar::String(bound_text(text.into(), MAX_STRING_CHARS))
    }

    /// Element kind of this value
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int8(_) => ScalarKind::Int8,
            Scalar::UInt8(_) => ScalarKind::UInt8,
            Scalar::Int16(_) => ScalarKind::Int16,
            Scalar::UInt16(_) => ScalarKind::UInt16,
            Scalar::Int32(_) => ScalarKind::Int32,
            Scalar::UInt32(_) => ScalarKind::UInt32,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::UInt64(_) => ScalarKind::UInt64,
            Scalar::Float32(_) => ScalarKind::Float32,
            Scalar::Float64(_) => ScalarKind::Float64,
            Scalar::String(_) => ScalarKind::String,
        }
    }

    /// Type-aware exact equality.
    ///
    /// Floats compare numerically, so a NaN never equals anything.
    pub fn same_value(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Int8(a), Scalar::Int8(b)) => a == b,
            (Scalar::UInt8(a), Scalar::UInt8(b)) => a == b,
            (Scalar::Int16(a), Scalar::Int16(b)) => a == b,
            (Scalar::UInt16(a), Scalar::UInt16(b)) => a == b,
            (Scalar::Int32(a), Scalar::Int32(b)) => a == b,
            (Scalar::UInt32(a), Scalar::UInt32(b)) => a == b,
            (Scalar::Int64(a), Scalar::Int64(b)) => a == b,
            (Scalar::UInt64(a), Scalar::UInt64(b)) => a == b,
            (Scalar::Float32(a), Scalar::Float32(b)) => a == b,
            (Scalar::Float64(a), Scalar::Float64(b)) => a == b,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            _ => false,
        }
    }

    /// Smaller of two numeric values of the same kind
    pub fn min_with(&self, other: &Scalar) -> Option<Scalar> {
        self.pick(other, Ordering::Less)
    }

    /// Larger of two numeric values of the same kind
    pub fn max_with(&self, other: &Scalar) -> Option<Scalar> {
        self.pick(other, Ordering::Greater)
    }

    /// Returns `other` when it compares as `wanted` against `self`, else
    /// `self`. `None` for strings or mixed kinds.
    fn pick(&self, other: &Scalar, wanted: Ordering) -> Option<Scalar> {
        let chosen = match (self, other) {
            (Scalar::Int8(a), Scalar::Int8(b)) => Scalar::Int8(choose(*a, *b, wanted)),
            (Scalar::UInt8(a), Scalar::UInt8(b)) => Scalar::UInt8(choose(*a, *b, wanted)),
            (Scalar::Int16(a), Scalar::Int16(b)) => Scalar::Int16(choose(*a, *b, wanted)),
            (Scalar::UInt16(a), Scalar::UInt16(b)) => Scalar::UInt16(choose(*a, *b, wanted)),
            (Scalar::Int32(a), Scalar::Int32(b)) => Scalar::Int32(choose(*a, *b, wanted)),
            (Scalar::UInt32(a), Scalar::UInt32(b)) => Scalar::UInt32(choose(*a, *b, wanted)),
            (Scalar::Int64(a), Scalar::Int64(b)) => Scalar::Int64(choose(*a, *b, wanted)),
            (Scalar::UInt64(a), Scalar::UInt64(b)) => Scalar::UInt64(choose(*a, *b, wanted)),
            (Scalar::Float32(a), Scalar::Float32(b)) => Scalar::Float32(choose(*a, *b, wanted)),
            (Scalar::Float64(a), Scalar::Float64(b)) => Scalar::Float64(choose(*a, *b, wanted)),
            _ => return None,
        };
        Some(chosen)
    }

    /// Classify non-finite floats; `None` for finite values and non-floats
    pub fn special_float(&self) -> Option<SpecialFloat> {
        let value = match self {
            Scalar::Float32(v) => f64::from(*v),
            Scalar::Float64(v) => *v,
            _ => return None,
        };
        classify_special(value)
    }

    /// Plain text rendering: decimal integers, `%g` floats, raw strings
    pub fn to_plain_string(&self) -> String {
        match self {
            Scalar::Int8(v) => v.to_string(),
            Scalar::UInt8(v) => v.to_string(),
            Scalar::Int16(v) => v.to_string(),
            Scalar::UInt16(v) => v.to_string(),
            Scalar::Int32(v) => v.to_string(),
            Scalar::UInt32(v) => v.to_string(),
            Scalar::Int64(v) => v.to_string(),
            Scalar::UInt64(v) => v.to_string(),
            Scalar::Float32(v) => format_general(f64::from(*v), PLAIN_PRECISION),
            Scalar::Float64(v) => format_general(*v, PLAIN_PRECISION),
            Scalar::String(s) => s.clone(),
        }
    }
}

// Unordered pairs (NaN) keep the current value.
fn choose<T: PartialOrd + Copy>(current: T, candidate: T, wanted: Ordering) -> T {
    if candidate.partial_cmp(&current) == Some(wanted) {
        candidate
    } else {
        current
    }
}

fn classify_special(value: f64) -> Option<SpecialFloat> {
    if value.is_nan() {
        Some(SpecialFloat::Nan)
    } else if value.is_infinite() && value > 0.0 {
        Some(SpecialFloat::PositiveInfinity)
    } else if value.is_infinite() {
        Some(SpecialFloat::NegativeInfinity)
    } else {
        None
    }
}

/// Elements of an array value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayElements {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
}

impl ArrayElements {
    /// Element kind
    pub fn kind(&self) -> ScalarKind {
        match self {
            ArrayElements::Int8(_) => ScalarKind::Int8,
            ArrayElements::UInt8(_) => ScalarKind::UInt8,
            ArrayElements::Int16(_) => ScalarKind::Int16,
            ArrayElements::UInt16(_) => ScalarKind::UInt16,
            ArrayElements::Int32(_) => ScalarKind::Int32,
            ArrayElements::UInt32(_) => ScalarKind::UInt32,
            ArrayElements::Int64(_) => ScalarKind::Int64,
            ArrayElements::UInt64(_) => ScalarKind::UInt64,
            ArrayElements::Float32(_) => ScalarKind::Float32,
            ArrayElements::Float64(_) => ScalarKind::Float64,
            ArrayElements::String(_) => ScalarKind::String,
        }
    }

    /// Number of held elements
    pub fn len(&self) -> usize {
        match self {
            ArrayElements::Int8(v) => v.len(),
            ArrayElements::UInt8(v) => v.len(),
            ArrayElements::Int16(v) => v.len(),
            ArrayElements::UInt16(v) => v.len(),
            ArrayElements::Int32(v) => v.len(),
            ArrayElements::UInt32(v) => v.len(),
            ArrayElements::Int64(v) => v.len(),
            ArrayElements::UInt64(v) => v.len(),
            ArrayElements::Float32(v) => v.len(),
            ArrayElements::Float64(v) => v.len(),
            ArrayElements::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` as a scalar
    pub fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            ArrayElements::Int8(v) => v.get(index).map(|x| Scalar::Int8(*x)),
            ArrayElements::UInt8(v) => v.get(index).map(|x| Scalar::UInt8(*x)),
            ArrayElements::Int16(v) => v.get(index).map(|x| Scalar::Int16(*x)),
            ArrayElements::UInt16(v) => v.get(index).map(|x| Scalar::UInt16(*x)),
            ArrayElements::Int32(v) => v.get(index).map(|x| Scalar::Int32(*x)),
            ArrayElements::UInt32(v) => v.get(index).map(|x| Scalar::UInt32(*x)),
            ArrayElements::Int64(v) => v.get(index).map(|x| Scalar::Int64(*x)),
            ArrayElements::UInt64(v) => v.get(index).map(|x| Scalar::UInt64(*x)),
            ArrayElements::Float32(v) => v.get(index).map(|x| Scalar::Float32(*x)),
            ArrayElements::Float64(v) => v.get(index).map(|x| Scalar::Float64(*x)),
            ArrayElements::String(v) => v.get(index).map(|x| Scalar::String(x.clone())),
        }
    }

    /// Iterate over the held elements as scalars
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    fn truncate(&mut self, len: usize) {
        match self {
            ArrayElements::Int8(v) => v.truncate(len),
            ArrayElements::UInt8(v) => v.truncate(len),
            ArrayElements::Int16(v) => v.truncate(len),
            ArrayElements::UInt16(v) => v.truncate(len),
            ArrayElements::Int32(v) => v.truncate(len),
            ArrayElements::UInt32(v) => v.truncate(len),
            ArrayElements::Int64(v) => v.truncate(len),
            ArrayElements::UInt64(v) => v.truncate(len),
            ArrayElements::Float32(v) => v.truncate(len),
            ArrayElements::Float64(v) => v.truncate(len),
            ArrayElements::String(v) => v.truncate(len),
        }
    }
}

/// An array value: the logged elements plus the true source element count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    elements: ArrayElements,
    size: usize,
}

impl ArrayValue {
    /// Create an array value whose source size equals its element count
    pub fn new(elements: ArrayElements) -> Self {
        let size = elements.len();
        Self { elements, size }
    }

    /// Create an array value that reports a larger source size than it holds
    pub fn with_size(elements: ArrayElements, size: usize) -> Self {
        Self { elements, size }
    }

    pub fn elements(&self) -> &ArrayElements {
        &self.elements
    }

    /// Element count of the source field at the time of the put
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element count actually held and logged
    pub fn logged_len(&self) -> usize {
        self.elements.len()
    }

    pub fn kind(&self) -> ScalarKind {
        self.elements.kind()
    }
}

/// Value of a field at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Scalar(Scalar),
    LongString { text: String, size: usize },
    Array(ArrayValue),
}

impl FieldValue {
    /// The string placeholder used when a value cannot be read
    pub fn not_accessible() -> Self {
        FieldValue::Scalar(Scalar::string(NOT_ACCESSIBLE))
    }

    /// Long string value whose source size is the text length
    pub fn long_string(text: impl Into<String>) -> Self {
        let text = text.into();
        let size = text.len();
        FieldValue::LongString { text, size }
    }

    /// Type this value would be declared with
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Scalar(s) => FieldType::Scalar(s.kind()),
            FieldValue::LongString { .. } => FieldType::LongString,
            FieldValue::Array(a) => FieldType::Array(a.kind()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Source size: 1 for scalars, text bytes or element count otherwise
    pub fn size(&self) -> usize {
        match self {
            FieldValue::Scalar(_) => 1,
            FieldValue::LongString { size, .. } => *size,
            FieldValue::Array(a) => a.size(),
        }
    }

    /// Type-aware exact equality of the logged content.
    ///
    /// Arrays and long strings are equal only when they hold the same number
    /// of logged elements and every element compares equal.
    pub fn same_value(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => a.same_value(b),
            (FieldValue::LongString { text: a, .. }, FieldValue::LongString { text: b, .. }) => {
                a == b
            }
            (FieldValue::Array(a), FieldValue::Array(b)) => {
                a.logged_len() == b.logged_len()
                    && a.kind() == b.kind()
                    && a.elements().iter().zip(b.elements().iter()).all(|(x, y)| x.same_value(&y))
            }
            _ => false,
        }
    }

    /// Apply the logging limits: bounded strings keep 39 characters, arrays
    /// and long strings keep what fits in `max_bytes`. Source sizes are kept.
    pub fn capped(self, max_bytes: usize) -> Self {
        match self {
            FieldValue::Scalar(Scalar::String(s)) => {
                FieldValue::Scalar(Scalar::String(bound_text(s, MAX_STRING_CHARS)))
            }
            FieldValue::Scalar(s) => FieldValue::Scalar(s),
            FieldValue::LongString { text, size } => FieldValue::LongString {
                text: bound_bytes(text, max_bytes.saturating_sub(1)),
                size,
            },
            FieldValue::Array(ArrayValue { mut elements, size }) => {
                let cap = elements.kind().elements_within(max_bytes);
                if elements.len() > cap {
                    elements.truncate(cap);
                }
                if let ArrayElements::String(items) = &mut elements {
                    for item in items.iter_mut() {
                        *item = bound_text(std::mem::take(item), MAX_STRING_CHARS);
                    }
                }
                FieldValue::Array(ArrayValue { elements, size })
            }
        }
    }

    /// Render as one piece of plain text; arrays are comma separated
    pub fn to_plain_string(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.to_plain_string(),
            FieldValue::LongString { text, .. } => text.clone(),
            FieldValue::Array(a) => a
                .elements()
                .iter()
                .map(|e| e.to_plain_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<ArrayValue> for FieldValue {
    fn from(value: ArrayValue) -> Self {
        FieldValue::Array(value)
    }
}

fn bound_text(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

fn bound_bytes(text: String, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text[..cut].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality_is_type_aware() {
        assert!(Scalar::Int32(12).same_value(&Scalar::Int32(12)));
        assert!(!Scalar::Int32(12).same_value(&Scalar::Int64(12)));
        assert!(!Scalar::Float64(f64::NAN).same_value(&Scalar::Float64(f64::NAN)));
        assert!(Scalar::string("abc").same_value(&Scalar::string("abc")));
    }

    #[test]
    fn test_min_max_numeric() {
        let a = Scalar::Int16(-4);
        let b = Scalar::Int16(9);
        assert_eq!(a.min_with(&b), Some(Scalar::Int16(-4)));
        assert_eq!(a.max_with(&b), Some(Scalar::Int16(9)));

        let x = Scalar::Float32(1.5);
        let y = Scalar::Float32(-2.25);
        assert_eq!(x.min_with(&y), Some(Scalar::Float32(-2.25)));
        assert_eq!(x.max_with(&y), Some(Scalar::Float32(1.5)));
    }

    #[test]
    fn test_min_max_64_bit_exact() {
        let a = Scalar::UInt64(u64::MAX);
        let b = Scalar::UInt64(u64::MAX - 1);
        assert_eq!(a.min_with(&b), Some(Scalar::UInt64(u64::MAX - 1)));
        assert_eq!(a.max_with(&b), Some(Scalar::UInt64(u64::MAX)));

        let c = Scalar::Int64(i64::MIN);
        let d = Scalar::Int64(i64::MIN + 1);
        assert_eq!(c.min_with(&d), Some(Scalar::Int64(i64::MIN)));
        assert_eq!(d.max_with(&c), Some(Scalar::Int64(i64::MIN + 1)));
    }

    #[test]
    fn test_min_max_rejects_strings_and_mixed_kinds() {
        assert_eq!(Scalar::string("a").min_with(&Scalar::string("b")), None);
        assert_eq!(Scalar::Int8(1).max_with(&Scalar::UInt8(2)), None);
    }

    #[test]
    fn test_special_float() {
        assert_eq!(Scalar::Float64(f64::NAN).special_float(), Some(SpecialFloat::Nan));
        assert_eq!(
            Scalar::Float32(f32::INFINITY).special_float(),
            Some(SpecialFloat::PositiveInfinity)
        );
        assert_eq!(
            Scalar::Float64(f64::NEG_INFINITY).special_float(),
            Some(SpecialFloat::NegativeInfinity)
        );
        assert_eq!(Scalar::Float64(1.0).special_float(), None);
        assert_eq!(Scalar::Int32(1).special_float(), None);
    }

    #[test]
    fn test_bounded_string() {
        let long = "x".repeat(60);
        match Scalar::string(long) {
            Scalar::String(s) => assert_eq!(s.len(), MAX_STRING_CHARS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_array_capping_keeps_source_size() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let capped = FieldValue::Array(ArrayValue::new(ArrayElements::Float64(values)))
            .capped(DEFAULT_MAX_ARRAY_BYTES);
        match capped {
            FieldValue::Array(a) => {
                assert_eq!(a.logged_len(), 50);
                assert_eq!(a.size(), 100);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_string_array_capping() {
        let items: Vec<String> = (0..20).map(|i| format!("item{}", i)).collect();
        let capped = FieldValue::Array(ArrayValue::new(ArrayElements::String(items)))
            .capped(DEFAULT_MAX_ARRAY_BYTES);
        assert_eq!(capped.size(), 20);
        match capped {
            FieldValue::Array(a) => assert_eq!(a.logged_len(), 10),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_long_string_capping() {
        let value = FieldValue::long_string("é".repeat(300)).capped(DEFAULT_MAX_ARRAY_BYTES);
        match value {
            FieldValue::LongString { text, size } => {
                assert!(text.len() <= DEFAULT_MAX_ARRAY_BYTES - 1);
                assert_eq!(size, 600);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_array_equality() {
        let a = FieldValue::Array(ArrayValue::new(ArrayElements::Int32(vec![1, 2, 3])));
        let b = FieldValue::Array(ArrayValue::new(ArrayElements::Int32(vec![1, 2, 3])));
        let c = FieldValue::Array(ArrayValue::new(ArrayElements::Int32(vec![1, 2])));
        assert!(a.same_value(&b));
        assert!(!a.same_value(&c));
    }

    #[test]
    fn test_field_type_classification() {
        assert!(FieldType::Scalar(ScalarKind::Float64).is_numeric_scalar());
        assert!(!FieldType::Scalar(ScalarKind::String).is_numeric_scalar());
        assert!(!FieldType::Array(ScalarKind::Int32).is_numeric_scalar());
        assert!(FieldType::LongString.is_array_like());
        assert!(!FieldType::LongString.allows_burst_filter());
        assert_eq!(FieldType::Array(ScalarKind::UInt16).to_string(), "uint16[]");
    }

    #[test]
    fn test_plain_rendering() {
        assert_eq!(Scalar::Float64(0.5).to_plain_string(), "0.5");
        assert_eq!(Scalar::Int8(-3).to_plain_string(), "-3");
        let arr = FieldValue::Array(ArrayValue::new(ArrayElements::UInt8(vec![1, 2, 3])));
        assert_eq!(arr.to_plain_string(), "1,2,3");
    }
}
