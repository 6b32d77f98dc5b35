// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, CodecResult};

/// A forward-only cursor over a borrowed byte slice.
///
/// Decoders thread one reader through every nested value, so each sub-decoder consumes exactly
/// the bytes it needs and leaves the rest for its siblings.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Reads exactly `size` bytes, failing without consuming anything if fewer remain.
    pub fn read_exact(&mut self, size: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        if size > remaining {
            return Err(CodecError::NotEnoughBytes {
                requested: size,
                remaining,
            });
        }
        Ok(self.read_at_most(size))
    }

    pub fn read_at_most(&mut self, size: usize) -> &'a [u8] {
        let end = self.offset + size.min(self.remaining());
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        slice
    }

    pub fn read_remaining(&mut self) -> &'a [u8] {
        self.read_at_most(self.remaining())
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.read_exact(1)?[0])
    }

    /// Reads a 4-byte big-endian length or count prefix.
    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_consumed(&self) -> bool {
        self.offset == self.bytes.len()
    }

    pub fn assert_consumed(&self) -> CodecResult<()> {
        if self.is_consumed() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                remaining: self.remaining(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_exact_and_remaining() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(reader.read_exact(2).unwrap(), &[1, 2]);
        assert_eq!(reader.remaining(), 3);
        assert_eq!(
            reader.read_exact(4),
            Err(CodecError::NotEnoughBytes {
                requested: 4,
                remaining: 3
            })
        );
        // A failed read leaves the cursor untouched.
        assert_eq!(reader.offset(), 2);
        assert_eq!(reader.read_remaining(), &[3, 4, 5]);
        assert!(reader.is_consumed());
        assert!(reader.assert_consumed().is_ok());
    }

    #[test]
    fn test_read_at_most_truncates() {
        let mut reader = ByteReader::new(&[9]);
        assert_eq!(reader.read_at_most(4), &[9]);
        assert_eq!(reader.read_at_most(4), &[] as &[u8]);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut reader = ByteReader::new(&[0, 0, 0, 1, 7]);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert_eq!(
            reader.assert_consumed(),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }
}
