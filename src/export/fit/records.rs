// ABOUTME: FIT record layouts as explicit field tables plus a little-endian record writer
// ABOUTME: Definition messages for file_id, file_creator, workout, workout_step and exercise_title
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// FIT base type codes used by the workout layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BaseType {
    /// Enumerated byte
    Enum = 0x00,
    /// Unsigned byte
    Uint8 = 0x02,
    /// Null-terminated UTF-8 string
    String = 0x07,
    /// Unsigned 16-bit
    Uint16 = 0x84,
    /// Unsigned 32-bit
    Uint32 = 0x86,
    /// Unsigned 32-bit, zero invalid
    Uint32z = 0x8C,
}

/// One field of a definition message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Profile field number
    pub number: u8,
    /// Size in bytes
    pub size: u8,
    /// Base type
    pub base_type: BaseType,
}

const fn field(number: u8, size: u8, base_type: BaseType) -> FieldDef {
    FieldDef {
        number,
        size,
        base_type,
    }
}

/// A definition message: local slot, global message number and field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDefinition {
    /// Local message type (0-15)
    pub local_type: u8,
    /// Global message number
    pub global_number: u16,
    /// Fields in data-record order
    pub fields: &'static [FieldDef],
}

impl MessageDefinition {
    /// Bytes one data record of this layout occupies, header included
    #[must_use]
    pub fn record_len(&self) -> usize {
        1 + self
            .fields
            .iter()
            .map(|field| usize::from(field.size))
            .sum::<usize>()
    }

    /// Bytes the definition message occupies
    #[must_use]
    pub const fn definition_len(&self) -> usize {
        6 + 3 * self.fields.len()
    }
}

/// Global message numbers
pub mod mesg {
    /// `file_id`
    pub const FILE_ID: u16 = 0;
    /// `workout`
    pub const WORKOUT: u16 = 26;
    /// `workout_step`
    pub const WORKOUT_STEP: u16 = 27;
    /// `file_creator`
    pub const FILE_CREATOR: u16 = 49;
    /// `exercise_title`
    pub const EXERCISE_TITLE: u16 = 264;
}

/// Fixed width of string fields (names and titles)
pub const STRING_FIELD_SIZE: u8 = 32;

/// `file_id`: serial, time created, manufacturer, product, file type
pub const FILE_ID: MessageDefinition = MessageDefinition {
    local_type: 0,
    global_number: mesg::FILE_ID,
    fields: &[
        field(3, 4, BaseType::Uint32z),
        field(4, 4, BaseType::Uint32),
        field(1, 2, BaseType::Uint16),
        field(2, 2, BaseType::Uint16),
        field(0, 1, BaseType::Enum),
    ],
};

/// `file_creator`: software and hardware version
pub const FILE_CREATOR: MessageDefinition = MessageDefinition {
    local_type: 1,
    global_number: mesg::FILE_CREATOR,
    fields: &[field(0, 2, BaseType::Uint16), field(1, 1, BaseType::Uint8)],
};

/// `workout`: sport, capabilities, step count, name, sub sport
pub const WORKOUT: MessageDefinition = MessageDefinition {
    local_type: 2,
    global_number: mesg::WORKOUT,
    fields: &[
        field(4, 1, BaseType::Enum),
        field(5, 4, BaseType::Uint32z),
        field(6, 2, BaseType::Uint16),
        field(8, STRING_FIELD_SIZE, BaseType::String),
        field(11, 1, BaseType::Enum),
    ],
};

/// `workout_step` for exercises: index, duration value/type, target type, intensity, category, name
pub const EXERCISE_STEP: MessageDefinition = MessageDefinition {
    local_type: 3,
    global_number: mesg::WORKOUT_STEP,
    fields: &[
        field(254, 2, BaseType::Uint16),
        field(2, 4, BaseType::Uint32),
        field(1, 1, BaseType::Enum),
        field(3, 1, BaseType::Enum),
        field(7, 1, BaseType::Enum),
        field(10, 2, BaseType::Uint16),
        field(11, 2, BaseType::Uint16),
    ],
};

/// `workout_step` for rest, warmup and cooldown: no exercise category
pub const REST_STEP: MessageDefinition = MessageDefinition {
    local_type: 4,
    global_number: mesg::WORKOUT_STEP,
    fields: &[
        field(254, 2, BaseType::Uint16),
        field(2, 4, BaseType::Uint32),
        field(1, 1, BaseType::Enum),
        field(3, 1, BaseType::Enum),
        field(7, 1, BaseType::Enum),
    ],
};

/// `workout_step` for repeats: index, first step to repeat, repeat count, duration type
pub const REPEAT_STEP: MessageDefinition = MessageDefinition {
    local_type: 5,
    global_number: mesg::WORKOUT_STEP,
    fields: &[
        field(254, 2, BaseType::Uint16),
        field(2, 4, BaseType::Uint32),
        field(4, 4, BaseType::Uint32),
        field(1, 1, BaseType::Enum),
    ],
};

/// `exercise_title`: step index, category, name, display title
pub const EXERCISE_TITLE: MessageDefinition = MessageDefinition {
    local_type: 6,
    global_number: mesg::EXERCISE_TITLE,
    fields: &[
        field(254, 2, BaseType::Uint16),
        field(0, 2, BaseType::Uint16),
        field(1, 2, BaseType::Uint16),
        field(2, STRING_FIELD_SIZE, BaseType::String),
    ],
};

const DEFINITION_FLAG: u8 = 0x40;

/// Little-endian writer for definition and data records
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    /// Empty writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a definition message
    pub fn define(&mut self, definition: &MessageDefinition) {
        self.buf.push(DEFINITION_FLAG | definition.local_type);
        self.buf.push(0); // reserved
        self.buf.push(0); // little-endian architecture
        self.buf
            .extend_from_slice(&definition.global_number.to_le_bytes());
        self.buf.push(u8::try_from(definition.fields.len()).unwrap_or(u8::MAX));
        for field in definition.fields {
            self.buf
                .extend_from_slice(&[field.number, field.size, field.base_type as u8]);
        }
    }

    /// Start a data record for `definition`
    pub fn record(&mut self, definition: &MessageDefinition) -> &mut Self {
        self.buf.push(definition.local_type);
        self
    }

    /// Append a byte
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Append a little-endian u16
    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Append a little-endian u32
    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Append a null-padded string of exactly `width` bytes
    ///
    /// At most `width - 1` bytes of text are kept, cut on a character boundary.
    pub fn string(&mut self, value: &str, width: u8) -> &mut Self {
        let width = usize::from(width);
        let text = truncate_utf8(value, width.saturating_sub(1));
        self.buf.extend_from_slice(text.as_bytes());
        self.buf.resize(self.buf.len() + (width - text.len()), 0);
        self
    }

    /// Bytes written so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing was written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finished data section
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Longest prefix of `value` fitting in `max_bytes` without splitting a character
#[must_use]
pub fn truncate_utf8(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_bytes() {
        let mut writer = RecordWriter::new();
        writer.define(&FILE_CREATOR);
        assert_eq!(
            writer.into_bytes(),
            vec![0x41, 0, 0, 49, 0, 2, 0, 2, 0x84, 1, 1, 0x02]
        );
    }

    #[test]
    fn test_string_is_padded_and_truncated() {
        let mut writer = RecordWriter::new();
        writer.string("Bench", 8);
        assert_eq!(writer.into_bytes(), b"Bench\0\0\0".to_vec());

        let long = "x".repeat(40);
        let mut writer = RecordWriter::new();
        writer.string(&long, STRING_FIELD_SIZE);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 0);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate_utf8("héllo", 2), "h");
    }

    #[test]
    fn test_record_len_matches_layout() {
        assert_eq!(EXERCISE_STEP.record_len(), 1 + 2 + 4 + 1 + 1 + 1 + 2 + 2);
        assert_eq!(REST_STEP.record_len(), 1 + 2 + 4 + 1 + 1 + 1);
        assert_eq!(REPEAT_STEP.record_len(), 1 + 2 + 4 + 4 + 1);
    }
}
