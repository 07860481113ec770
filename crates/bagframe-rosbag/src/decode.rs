//! Little-endian reader for ROS1 serialized message payloads.
//!
//! ROS1 lays out fields back to back with no padding. Strings and
//! variable-length arrays carry a `u32` length prefix, fixed-size arrays
//! don't.

use byteorder::{LittleEndian, ReadBytesExt};
use eyre::{Result, WrapErr, bail};
use std::io::Cursor;

/// A message type that can be read from its serialized payload.
pub trait Decode: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self>;
}

pub struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().wrap_err("payload ended inside a uint8")
    }

    pub fn i8(&mut self) -> Result<i8> {
        self.cursor.read_i8().wrap_err("payload ended inside an int8")
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.cursor
            .read_u16::<LittleEndian>()
            .wrap_err("payload ended inside a uint16")
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.cursor
            .read_u32::<LittleEndian>()
            .wrap_err("payload ended inside a uint32")
    }

    pub fn f64(&mut self) -> Result<f64> {
        self.cursor
            .read_f64::<LittleEndian>()
            .wrap_err("payload ended inside a float64")
    }

    /// Borrows the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.position();
        let bytes: &'a [u8] = *self.cursor.get_ref();
        let Some(slice) = start.checked_add(len).and_then(|end| bytes.get(start..end)) else {
            bail!(
                "payload truncated: need {len} bytes at offset {start}, {} left",
                self.remaining()
            );
        };
        self.cursor.set_position((start + len) as u64);
        Ok(slice)
    }

    fn length(&mut self) -> Result<usize> {
        Ok(self.u32()? as usize)
    }

    pub fn string(&mut self) -> Result<String> {
        let len = self.length()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).wrap_err("string field is not valid UTF-8")
    }

    /// Reads a `uint8[]` field.
    pub fn byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.length()?;
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a `float64[N]` field.
    pub fn f64_array<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut values = [0.0; N];
        for value in &mut values {
            *value = self.f64()?;
        }
        Ok(values)
    }

    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }
}
