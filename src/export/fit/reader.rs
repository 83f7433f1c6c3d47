// ABOUTME: Structural FIT reader that checks framing, both CRCs and record layout
// ABOUTME: Walks definition and data messages so encoded workouts can be inspected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use pierre_core::errors::{AppError, AppResult};

use super::crc::crc16;
use super::records::mesg;
use super::FILE_SIGNATURE;

const DEFINITION_FLAG: u8 = 0x40;
const DEVELOPER_DATA_FLAG: u8 = 0x20;
const COMPRESSED_TIMESTAMP_FLAG: u8 = 0x80;
const LOCAL_TYPE_MASK: u8 = 0x0F;

#[derive(Debug, Clone)]
struct LocalDefinition {
    global_number: u16,
    big_endian: bool,
    fields: Vec<(u8, u8)>,
}

/// One decoded data message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRecord {
    /// Local message slot the record was written under
    pub local_type: u8,
    /// Global message number
    pub global_number: u16,
    big_endian: bool,
    fields: Vec<(u8, Vec<u8>)>,
}

impl FitRecord {
    /// Raw bytes of field `number`
    #[must_use]
    pub fn field_bytes(&self, number: u8) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == number)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Field numbers in record order
    pub fn field_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.fields.iter().map(|(number, _)| *number)
    }

    /// Unsigned integer value of a 1, 2 or 4 byte field
    #[must_use]
    pub fn field_u32(&self, number: u8) -> Option<u32> {
        let bytes = self.field_bytes(number)?;
        let value = match (bytes.len(), self.big_endian) {
            (1, _) => u32::from(bytes[0]),
            (2, false) => u32::from(u16::from_le_bytes([bytes[0], bytes[1]])),
            (2, true) => u32::from(u16::from_be_bytes([bytes[0], bytes[1]])),
            (4, false) => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            (4, true) => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            _ => return None,
        };
        Some(value)
    }

    /// String field with its null padding removed
    #[must_use]
    pub fn field_string(&self, number: u8) -> Option<String> {
        let bytes = self.field_bytes(number)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        String::from_utf8(bytes[..end].to_vec()).ok()
    }

    /// True for `workout_step` records
    #[must_use]
    pub const fn is_workout_step(&self) -> bool {
        self.global_number == mesg::WORKOUT_STEP
    }
}

/// A parsed and verified FIT file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitFile {
    /// Header size byte
    pub header_size: u8,
    /// Protocol version byte
    pub protocol_version: u8,
    /// Profile version
    pub profile_version: u16,
    /// Length of the data section as declared in the header
    pub data_size: u32,
    /// Data messages in file order
    pub records: Vec<FitRecord>,
}

fn malformed(message: impl Into<String>) -> AppError {
    AppError::invalid_input(format!("malformed FIT file: {}", message.into()))
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> AppResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| malformed(format!("record truncated at byte {}", self.pos)))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> AppResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn is_done(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl FitFile {
    /// Parse `bytes`, verifying the header, both CRCs and every record
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad signature, length, CRC, an undefined
    /// local message type or a truncated record
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        let header_size = *bytes.first().ok_or_else(|| malformed("empty input"))?;
        if header_size != 12 && header_size != 14 {
            return Err(malformed(format!("unsupported header size {header_size}")));
        }
        let header_len = usize::from(header_size);
        if bytes.len() < header_len {
            return Err(malformed("input shorter than its header"));
        }
        let header = &bytes[..header_len];
        if &header[8..12] != FILE_SIGNATURE {
            return Err(malformed("missing .FIT signature"));
        }
        if header_len == 14 {
            let stored = u16::from_le_bytes([header[12], header[13]]);
            if stored != 0 && stored != crc16(&header[..12]) {
                return Err(malformed("header CRC mismatch"));
            }
        }

        let data_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let data_len = data_size as usize;
        let expected_len = header_len + data_len + 2;
        if bytes.len() != expected_len {
            return Err(malformed(format!(
                "header declares {data_len} data bytes but file is {} bytes",
                bytes.len()
            )));
        }
        // CRC over the data plus its stored CRC folds to zero
        if crc16(&bytes[header_len..]) != 0 {
            return Err(malformed("data CRC mismatch"));
        }

        let records = Self::read_records(&bytes[header_len..header_len + data_len])?;
        Ok(Self {
            header_size,
            protocol_version: header[1],
            profile_version: u16::from_le_bytes([header[2], header[3]]),
            data_size,
            records,
        })
    }

    fn read_records(data: &[u8]) -> AppResult<Vec<FitRecord>> {
        let mut cursor = Cursor { data, pos: 0 };
        let mut definitions: HashMap<u8, LocalDefinition> = HashMap::new();
        let mut records = Vec::new();

        while !cursor.is_done() {
            let header = cursor.byte()?;
            if header & COMPRESSED_TIMESTAMP_FLAG != 0 {
                return Err(malformed("compressed timestamp headers are not supported"));
            }
            let local_type = header & LOCAL_TYPE_MASK;
            if header & DEFINITION_FLAG != 0 {
                if header & DEVELOPER_DATA_FLAG != 0 {
                    return Err(malformed("developer data fields are not supported"));
                }
                let fixed = cursor.take(5)?;
                let big_endian = fixed[1] == 1;
                let global_number = if big_endian {
                    u16::from_be_bytes([fixed[2], fixed[3]])
                } else {
                    u16::from_le_bytes([fixed[2], fixed[3]])
                };
                let count = usize::from(fixed[4]);
                let fields = cursor
                    .take(count * 3)?
                    .chunks_exact(3)
                    .map(|field| (field[0], field[1]))
                    .collect();
                definitions.insert(
                    local_type,
                    LocalDefinition {
                        global_number,
                        big_endian,
                        fields,
                    },
                );
                continue;
            }

            let definition = definitions.get(&local_type).ok_or_else(|| {
                malformed(format!("data record for undefined local type {local_type}"))
            })?;
            let mut fields = Vec::with_capacity(definition.fields.len());
            for (number, size) in &definition.fields {
                fields.push((*number, cursor.take(usize::from(*size))?.to_vec()));
            }
            records.push(FitRecord {
                local_type,
                global_number: definition.global_number,
                big_endian: definition.big_endian,
                fields,
            });
        }
        Ok(records)
    }

    /// Records of one global message type
    pub fn messages(&self, global_number: u16) -> impl Iterator<Item = &FitRecord> {
        self.records
            .iter()
            .filter(move |record| record.global_number == global_number)
    }

    /// Number of records of one global message type
    #[must_use]
    pub fn count(&self, global_number: u16) -> usize {
        self.messages(global_number).count()
    }

    /// Every `workout_step` record in order
    #[must_use]
    pub fn workout_steps(&self) -> Vec<&FitRecord> {
        self.messages(mesg::WORKOUT_STEP).collect()
    }

    /// Workout name from the `workout` message
    #[must_use]
    pub fn workout_name(&self) -> Option<String> {
        self.messages(mesg::WORKOUT)
            .next()
            .and_then(|record| record.field_string(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_signature() {
        let mut bytes = vec![14, 0x10, 0x7D, 0x52, 0, 0, 0, 0];
        bytes.extend_from_slice(b"NOPE");
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert!(FitFile::parse(&bytes).is_err());
    }

    #[test]
    fn test_empty_data_section_parses() {
        let mut bytes = vec![14, 0x10, 0x7D, 0x52, 0, 0, 0, 0];
        bytes.extend_from_slice(FILE_SIGNATURE);
        let crc = crc16(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        let file = FitFile::parse(&bytes).unwrap();
        assert!(file.records.is_empty());
        assert_eq!(file.data_size, 0);
    }
}
