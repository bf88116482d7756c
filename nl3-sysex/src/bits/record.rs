//! Decoded records and their values

use std::fmt;

use super::low_mask;
use super::schema::{Field, FieldKind, Schema};
use crate::error::Nl3Error;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uint(u32),
    Int(i32),
    Bool(bool),
    Array(Vec<u32>),
    Record(Record),
}

/// Bytes a parent's [`SubFraming`](super::SubFraming) skipped around a nested record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Skipped {
    pub head: Vec<u8>,
    pub tail: Vec<u8>,
}

/// A record decoded against a static schema
///
/// Holds one slot per schema field. Fields absent at the record's depth
/// (see [`Field::top_level_only`]) hold nothing and cannot be set. A nested
/// record also keeps the bytes its parent's framing skipped, so they are
/// written back unchanged.
#[derive(Clone)]
pub struct Record {
    schema: &'static Schema,
    depth: u8,
    values: Vec<Option<Value>>,
    skipped: Skipped,
}

impl Record {
    /// All-zero record for a top-level schema
    pub fn zeroed(schema: &'static Schema) -> Self {
        Self::zeroed_at(schema, 0)
    }

    pub(crate) fn zeroed_at(schema: &'static Schema, depth: u8) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| field.present_at(depth).then(|| zero_value(field, depth)))
            .collect();
        Self {
            schema,
            depth,
            values,
            skipped: Skipped::default(),
        }
    }

    pub(crate) fn from_parts(
        schema: &'static Schema,
        depth: u8,
        values: Vec<Option<Value>>,
    ) -> Self {
        Self {
            schema,
            depth,
            values,
            skipped: Skipped::default(),
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: Skipped) -> Self {
        self.skipped = skipped;
        self
    }

    pub(crate) fn skipped(&self) -> &Skipped {
        &self.skipped
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Nesting level this record was decoded at (0 for a standalone patch)
    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub(crate) fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Present fields with their values, in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&'static Field, &Value)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, v)))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.schema.field_index(name)?;
        self.values[index].as_ref()
    }

    pub fn uint(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn array(&self, name: &str) -> Option<&[u32]> {
        match self.get(name)? {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        match self.get(name)? {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn record_mut(&mut self, name: &str) -> Option<&mut Record> {
        let index = self.schema.field_index(name)?;
        match self.values[index].as_mut()? {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Replace a field's value after checking its kind and width
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Nl3Error> {
        let unknown = || Nl3Error::UnknownField {
            record: self.schema.name,
            field: name.to_string(),
        };
        let index = self.schema.field_index(name).ok_or_else(unknown)?;
        let field = &self.schema.fields[index];
        if !field.present_at(self.depth) {
            return Err(unknown());
        }

        check_value(self.schema, field, &value)?;
        if let Value::Record(inner) = &value {
            if inner.depth != self.depth + 1 {
                return Err(Nl3Error::WrongValueKind {
                    record: self.schema.name,
                    field: field.name,
                });
            }
        }

        self.values[index] = Some(value);
        Ok(())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name
            && self.depth == other.depth
            && self.values == other.values
            && self.skipped == other.skipped
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.schema.name);
        for (field, value) in self.fields() {
            out.field(field.name, value);
        }
        out.finish()
    }
}

fn zero_value(field: &Field, depth: u8) -> Value {
    match field.kind {
        FieldKind::Uint => Value::Uint(0),
        FieldKind::Int => Value::Int(0),
        FieldKind::Bool => Value::Bool(false),
        FieldKind::Array { len } => Value::Array(vec![0; len]),
        FieldKind::Nested { schema, .. } => Value::Record(Record::zeroed_at(schema, depth + 1)),
    }
}

pub(crate) fn fits_unsigned(value: u32, bits: u32) -> bool {
    bits >= 32 || value >> bits == 0
}

pub(crate) fn fits_signed(value: i32, bits: u32) -> bool {
    if bits >= 32 {
        return true;
    }
    let half = 1i64 << (bits - 1);
    (-half..half).contains(&(value as i64))
}

/// Check a value against its field's kind and width
pub(crate) fn check_value(schema: &Schema, field: &Field, value: &Value) -> Result<(), Nl3Error> {
    let out_of_range = |value: i64| Nl3Error::ValueOutOfRange {
        record: schema.name,
        field: field.name,
        value,
        bits: field.bits,
    };

    match (field.kind, value) {
        (FieldKind::Uint, Value::Uint(v)) => {
            if !fits_unsigned(*v, field.bits) {
                return Err(out_of_range(*v as i64));
            }
        }
        (FieldKind::Int, Value::Int(v)) => {
            if !fits_signed(*v, field.bits) {
                return Err(out_of_range(*v as i64));
            }
        }
        (FieldKind::Bool, Value::Bool(_)) => {}
        (FieldKind::Array { len }, Value::Array(elements)) => {
            if elements.len() != len {
                return Err(Nl3Error::ArrayLength {
                    record: schema.name,
                    field: field.name,
                    expected: len,
                    actual: elements.len(),
                });
            }
            if let Some(v) = elements.iter().find(|v| !fits_unsigned(**v, field.bits)) {
                return Err(out_of_range(*v as i64));
            }
        }
        (FieldKind::Nested { schema: sub, .. }, Value::Record(inner))
            if inner.schema.name == sub.name => {}
        _ => {
            return Err(Nl3Error::WrongValueKind {
                record: schema.name,
                field: field.name,
            });
        }
    }
    Ok(())
}

/// Two's-complement interpretation of the low `bits` bits
pub(crate) fn sign_extend(raw: u32, bits: u32) -> i32 {
    if bits == 0 || bits >= 32 {
        return raw as i32;
    }
    let shift = 32 - bits;
    ((raw << shift) as i32) >> shift
}

/// Raw bit pattern for a signed value
pub(crate) fn to_raw_signed(value: i32, bits: u32) -> u32 {
    value as u32 & low_mask(bits)
}
