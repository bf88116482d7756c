//! Static field tables

use super::record::Skipped;
use crate::error::Nl3Error;

/// Byte-level adjustments applied to a nested field's sub-buffer
///
/// On decode, `skip_*` bytes are set aside from the sub-buffer and `pad_*` zero
/// bytes are added around it before recursing. Encode undoes both: padding is
/// stripped and the set-aside bytes are written back (zeros for records that
/// were never decoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubFraming {
    pub pad_head: usize,
    pub pad_tail: usize,
    pub skip_head: usize,
    pub skip_tail: usize,
}

impl SubFraming {
    pub const NONE: Self = Self {
        pad_head: 0,
        pad_tail: 0,
        skip_head: 0,
        skip_tail: 0,
    };

    pub const fn padded(head: usize, tail: usize) -> Self {
        Self {
            pad_head: head,
            pad_tail: tail,
            ..Self::NONE
        }
    }

    pub const fn skipped(head: usize, tail: usize) -> Self {
        Self {
            skip_head: head,
            skip_tail: tail,
            ..Self::NONE
        }
    }

    /// Width in bits of the adjusted sub-buffer for a `declared`-bit field.
    /// Negative if the skips exceed the field.
    pub const fn inner_bits(&self, declared: u32) -> i64 {
        declared as i64 + 8 * (self.pad_head + self.pad_tail) as i64
            - 8 * (self.skip_head + self.skip_tail) as i64
    }

    /// Decode direction: raw field bytes to the buffer the sub-schema sees,
    /// plus the skipped bytes
    pub(crate) fn unwrap(&self, raw: &[u8]) -> (Vec<u8>, Skipped) {
        let head_end = self.skip_head.min(raw.len());
        let tail_start = raw.len().saturating_sub(self.skip_tail).max(head_end);
        let body = &raw[head_end..tail_start];

        let mut out = Vec::with_capacity(self.pad_head + body.len() + self.pad_tail);
        out.resize(self.pad_head, 0);
        out.extend_from_slice(body);
        out.resize(out.len() + self.pad_tail, 0);

        let skipped = Skipped {
            head: raw[..head_end].to_vec(),
            tail: raw[tail_start..].to_vec(),
        };
        (out, skipped)
    }

    /// Encode direction: sub-schema bytes back to the raw field bytes.
    /// `None` if `inner` is too short to strip the padding from.
    pub(crate) fn wrap(&self, inner: &[u8], skipped: &Skipped) -> Option<Vec<u8>> {
        let end = inner.len().checked_sub(self.pad_tail)?;
        let body = inner.get(self.pad_head..end)?;

        let mut out = Vec::with_capacity(self.skip_head + body.len() + self.skip_tail);
        push_skipped(&mut out, &skipped.head, self.skip_head);
        out.extend_from_slice(body);
        push_skipped(&mut out, &skipped.tail, self.skip_tail);
        Some(out)
    }
}

/// Append `saved` if it is exactly `len` bytes long, else `len` zeros
fn push_skipped(out: &mut Vec<u8>, saved: &[u8], len: usize) {
    if saved.len() == len {
        out.extend_from_slice(saved);
    } else {
        out.resize(out.len() + len, 0);
    }
}

/// Element kind of a field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Uint,
    Int,
    Bool,
    /// `len` elements of the field's bit width each
    Array { len: usize },
    /// Sub-record occupying the field's bit width as whole bytes
    Nested {
        schema: &'static Schema,
        framing: SubFraming,
    },
}

/// One entry in a schema table
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    /// Width of a scalar, of one array element, or of the whole nested record
    pub bits: u32,
    pub kind: FieldKind,
    /// Deepest nesting level at which the field is present
    pub max_depth: Option<u8>,
}

impl Field {
    pub const fn uint(name: &'static str, bits: u32) -> Self {
        Self {
            name,
            bits,
            kind: FieldKind::Uint,
            max_depth: None,
        }
    }

    pub const fn int(name: &'static str, bits: u32) -> Self {
        Self {
            name,
            bits,
            kind: FieldKind::Int,
            max_depth: None,
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            bits: 1,
            kind: FieldKind::Bool,
            max_depth: None,
        }
    }

    pub const fn array(name: &'static str, elem_bits: u32, len: usize) -> Self {
        Self {
            name,
            bits: elem_bits,
            kind: FieldKind::Array { len },
            max_depth: None,
        }
    }

    pub const fn nested(name: &'static str, bits: u32, schema: &'static Schema) -> Self {
        Self {
            name,
            bits,
            kind: FieldKind::Nested {
                schema,
                framing: SubFraming::NONE,
            },
            max_depth: None,
        }
    }

    /// Apply sub-buffer adjustments. No effect on non-nested fields.
    pub const fn framed(mut self, framing: SubFraming) -> Self {
        if let FieldKind::Nested { schema, .. } = self.kind {
            self.kind = FieldKind::Nested { schema, framing };
        }
        self
    }

    /// Present only when the record is decoded at depth 0
    pub const fn top_level_only(mut self) -> Self {
        self.max_depth = Some(0);
        self
    }

    pub const fn present_at(&self, depth: u8) -> bool {
        match self.max_depth {
            Some(max) => depth <= max,
            None => true,
        }
    }

    /// Total bits the field occupies in the stream
    pub const fn span(&self) -> u32 {
        match self.kind {
            FieldKind::Array { len } => self.bits * len as u32,
            _ => self.bits,
        }
    }
}

/// Ordered field table for one record kind
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Width in bits of the record when decoded at `depth`
    pub const fn bit_len(&self, depth: u8) -> u32 {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            if self.fields[i].present_at(depth) {
                total += self.fields[i].span();
            }
            i += 1;
        }
        total
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Verify every nested field (recursively) against its sub-schema,
    /// and that scalar widths are between 1 and 32 bits.
    pub fn check(&'static self) -> Result<(), Nl3Error> {
        self.check_at(0)
    }

    fn check_at(&'static self, depth: u8) -> Result<(), Nl3Error> {
        for field in self.fields.iter().filter(|f| f.present_at(depth)) {
            match field.kind {
                FieldKind::Nested { schema, framing } => {
                    check_nested(self, field, schema, framing, depth)?;
                    schema.check_at(depth + 1)?;
                }
                _ if field.bits == 0 || field.bits > 32 => {
                    return Err(Nl3Error::SchemaMismatch {
                        record: self.name,
                        field: field.name,
                        declared: field.bits,
                        actual: field.bits.clamp(1, 32),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A nested field must be whole bytes and match its sub-schema after framing
pub(crate) fn check_nested(
    parent: &Schema,
    field: &Field,
    schema: &Schema,
    framing: SubFraming,
    depth: u8,
) -> Result<(), Nl3Error> {
    let natural = schema.bit_len(depth + 1);
    if field.bits % 8 != 0 || framing.inner_bits(field.bits) != natural as i64 {
        return Err(Nl3Error::SchemaMismatch {
            record: parent.name,
            field: field.name,
            declared: field.bits,
            actual: natural,
        });
    }
    Ok(())
}
