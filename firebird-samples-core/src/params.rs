//! Database parameter buffer

use crate::{ibase, FbError};

/// Builds a dpb: the version byte followed by `tag, length, value` clusters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpbBuilder {
    buffer: Vec<u8>,
}

impl Default for DpbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DpbBuilder {
    pub fn new() -> Self {
        let mut buffer = Vec::with_capacity(64);
        buffer.push(ibase::isc_dpb_version1 as u8);

        Self { buffer }
    }

    /// Append a string value. Fails if longer than 255 bytes
    pub fn insert_string(&mut self, tag: u32, value: &str) -> Result<&mut Self, FbError> {
        self.insert_bytes(tag, value.as_bytes())
    }

    pub fn insert_bytes(&mut self, tag: u32, value: &[u8]) -> Result<&mut Self, FbError> {
        if value.len() > u8::MAX as usize {
            return Err(FbError::from(format!(
                "Dpb value too long for the tag {} ({} bytes, max {})",
                tag,
                value.len(),
                u8::MAX
            )));
        }

        self.buffer.push(tag as u8);
        self.buffer.push(value.len() as u8);
        self.buffer.extend_from_slice(value);

        Ok(self)
    }

    /// Append a 4 bytes little endian integer
    pub fn insert_int(&mut self, tag: u32, value: u32) -> &mut Self {
        self.buffer.push(tag as u8);
        self.buffer.push(4);
        self.buffer.extend_from_slice(&value.to_le_bytes());

        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Nothing other than the version byte
    pub fn is_empty(&self) -> bool {
        self.buffer.len() <= 1
    }
}
