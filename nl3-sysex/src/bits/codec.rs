//! Generic schema walk

use super::record::{check_value, sign_extend, to_raw_signed};
use super::schema::{FieldKind, Schema, check_nested};
use super::{BitReader, BitWriter, Record, Value};
use crate::error::Nl3Error;

/// Decode `data` as a top-level record of `schema`.
///
/// Bits left over after the last field are ignored.
pub fn decode(schema: &'static Schema, data: &[u8]) -> Result<Record, Nl3Error> {
    let mut reader = BitReader::new(data);
    decode_fields(schema, &mut reader, 0)
}

fn decode_fields(
    schema: &'static Schema,
    reader: &mut BitReader<'_>,
    depth: u8,
) -> Result<Record, Nl3Error> {
    let mut values = Vec::with_capacity(schema.fields.len());

    for field in schema.fields {
        if !field.present_at(depth) {
            values.push(None);
            continue;
        }

        let truncated = || Nl3Error::TruncatedInput {
            record: schema.name,
            field: field.name,
        };

        let value = match field.kind {
            FieldKind::Uint => Value::Uint(reader.read_bits(field.bits).ok_or_else(truncated)?),
            FieldKind::Int => {
                let raw = reader.read_bits(field.bits).ok_or_else(truncated)?;
                Value::Int(sign_extend(raw, field.bits))
            }
            FieldKind::Bool => Value::Bool(reader.read_bits(field.bits).ok_or_else(truncated)? != 0),
            FieldKind::Array { len } => {
                let elements = (0..len)
                    .map(|_| reader.read_bits(field.bits).ok_or_else(truncated))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Array(elements)
            }
            FieldKind::Nested {
                schema: sub,
                framing,
            } => {
                check_nested(schema, field, sub, framing, depth)?;

                let byte_len = (field.bits / 8) as usize;
                let mut raw = Vec::with_capacity(byte_len);
                for _ in 0..byte_len {
                    raw.push(reader.read_byte().ok_or_else(truncated)?);
                }

                let (inner, skipped) = framing.unwrap(&raw);
                let mut sub_reader = BitReader::new(&inner);
                let record = decode_fields(sub, &mut sub_reader, depth + 1)?;
                Value::Record(record.with_skipped(skipped))
            }
        };

        values.push(Some(value));
    }

    Ok(Record::from_parts(schema, depth, values))
}

/// Encode a record, flushing the final partial byte with zero bits
pub fn encode(record: &Record) -> Result<Vec<u8>, Nl3Error> {
    let mut writer = BitWriter::new();
    encode_fields(record, &mut writer)?;
    Ok(writer.finish())
}

fn encode_fields(record: &Record, writer: &mut BitWriter) -> Result<(), Nl3Error> {
    let schema = record.schema();
    let depth = record.depth();

    for (field, slot) in schema.fields.iter().zip(record.values()) {
        if !field.present_at(depth) {
            continue;
        }
        let wrong_kind = || Nl3Error::WrongValueKind {
            record: schema.name,
            field: field.name,
        };
        let value = slot.as_ref().ok_or_else(wrong_kind)?;
        check_value(schema, field, value)?;

        match (field.kind, value) {
            (_, Value::Uint(v)) => writer.write_bits(*v, field.bits),
            (_, Value::Int(v)) => writer.write_bits(to_raw_signed(*v, field.bits), field.bits),
            (_, Value::Bool(b)) => writer.write_bits(*b as u32, field.bits),
            (_, Value::Array(elements)) => {
                for element in elements {
                    writer.write_bits(*element, field.bits);
                }
            }
            (FieldKind::Nested { schema: sub, framing }, Value::Record(inner)) => {
                check_nested(schema, field, sub, framing, depth)?;
                if inner.depth() != depth + 1 {
                    return Err(wrong_kind());
                }

                let mut sub_writer = BitWriter::new();
                encode_fields(inner, &mut sub_writer)?;
                let bytes = framing
                    .wrap(&sub_writer.finish(), inner.skipped())
                    .ok_or_else(wrong_kind)?;
                if bytes.len() * 8 != field.bits as usize {
                    return Err(Nl3Error::SchemaMismatch {
                        record: schema.name,
                        field: field.name,
                        declared: field.bits,
                        actual: bytes.len() as u32 * 8,
                    });
                }
                for byte in bytes {
                    writer.write_byte(byte);
                }
            }
            (_, Value::Record(_)) => return Err(wrong_kind()),
        }
    }

    Ok(())
}
