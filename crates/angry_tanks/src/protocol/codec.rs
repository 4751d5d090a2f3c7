//! Little-endian field codec

use tank_engine::foundation::math::Vec2;

/// Errors raised while decoding a message
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The payload ended in the middle of a field
    #[error("unexpected end of message: needed {needed} more bytes at offset {offset}")]
    UnexpectedEnd {
        /// Offset of the field being read
        offset: usize,
        /// Bytes the field needed
        needed: usize,
    },

    /// A string field was not valid UTF-8
    #[error("string field at offset {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    /// The leading type byte is not a known message type
    #[error("unknown message type {0}")]
    UnknownMessageType(u8),

    /// A team byte is not a known team
    #[error("unknown team {0}")]
    UnknownTeam(u8),

    /// A string or blob is longer than its length prefix can express
    #[error("field of {0} bytes exceeds the 65535 byte limit")]
    FieldTooLong(usize),

    /// Bytes remained after the message was fully decoded
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// Appends little-endian fields to a growing buffer
#[derive(Debug, Default, Clone)]
pub struct MessageWriter {
    buffer: Vec<u8>,
}

impl MessageWriter {
    /// Creates an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a byte
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    /// Write a boolean as a single byte
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    /// Write a u16 in little-endian format
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write an i16 in little-endian format
    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a u32 in little-endian format
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write an f32 in little-endian format
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a vector as two f32 values
    pub fn write_vec2(&mut self, value: &Vec2) -> &mut Self {
        self.write_f32(value.x).write_f32(value.y)
    }

    /// Write a length-prefixed byte blob
    ///
    /// # Errors
    ///
    /// Fails if the blob is longer than `u16::MAX` bytes.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<&mut Self, ProtocolError> {
        let length = u16::try_from(value.len()).map_err(|_| ProtocolError::FieldTooLong(value.len()))?;
        self.write_u16(length);
        self.buffer.extend_from_slice(value);
        Ok(self)
    }

    /// Write a length-prefixed UTF-8 string
    ///
    /// # Errors
    ///
    /// Fails if the encoded string is longer than `u16::MAX` bytes.
    pub fn write_string(&mut self, value: &str) -> Result<&mut Self, ProtocolError> {
        self.write_bytes(value.as_bytes())
    }

    /// Finish writing and take the buffer
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

/// Reads little-endian fields from a payload
#[derive(Debug, Clone)]
pub struct MessageReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MessageReader<'a> {
    /// Creates a reader at the start of `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not read yet
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < count {
            return Err(ProtocolError::UnexpectedEnd {
                offset: self.position,
                needed: count - self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut array = [0; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    /// Read a byte
    ///
    /// # Errors
    ///
    /// Fails at the end of the payload.
    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a boolean byte; any non-zero value is true
    ///
    /// # Errors
    ///
    /// Fails at the end of the payload.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a little-endian u16
    ///
    /// # Errors
    ///
    /// Fails if fewer than two bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i16
    ///
    /// # Errors
    ///
    /// Fails if fewer than two bytes remain.
    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u32
    ///
    /// # Errors
    ///
    /// Fails if fewer than four bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian f32
    ///
    /// # Errors
    ///
    /// Fails if fewer than four bytes remain.
    pub fn read_f32(&mut self) -> Result<f32, ProtocolError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read a vector of two f32 values
    ///
    /// # Errors
    ///
    /// Fails if fewer than eight bytes remain.
    pub fn read_vec2(&mut self) -> Result<Vec2, ProtocolError> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        Ok(Vec2::new(x, y))
    }

    /// Read a length-prefixed byte blob
    ///
    /// # Errors
    ///
    /// Fails if the payload is shorter than the prefix claims.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let length = usize::from(self.read_u16()?);
        Ok(self.take(length)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string
    ///
    /// # Errors
    ///
    /// Fails on truncation or invalid UTF-8.
    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let length = usize::from(self.read_u16()?);
        let start = self.position;
        let bytes = self.take(length)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidUtf8(start))
    }

    /// Read everything left in the payload
    pub fn read_remaining(&mut self) -> Vec<u8> {
        let rest = self.data[self.position..].to_vec();
        self.position = self.data.len();
        rest
    }

    /// Ensure the whole payload was consumed
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TrailingBytes`] if anything is left.
    pub const fn finish(&self) -> Result<(), ProtocolError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(ProtocolError::TrailingBytes(remaining)),
        }
    }
}
