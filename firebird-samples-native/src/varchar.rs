use std::{mem, ptr, slice};

use crate::ibase;

#[repr(C)]
/// Structure expected by the `fbclient` for a `SQL_VARYING` value
pub struct InnerVarchar {
    len: u16,
    data: [u8; 0],
}

#[derive(Debug)]
/// Owned varchar buffer. The `fbclient` writes the length and
/// the bytes through the pointer returned by `as_mut_ptr`
pub struct Varchar {
    capacity: u16,
    /// `u16` words to keep the alignment of `InnerVarchar`
    buffer: Box<[u16]>,
}

impl Varchar {
    /// Allocate a new, empty, varchar buffer
    pub fn new(capacity: u16) -> Self {
        let words = 1 + (capacity as usize + 1) / mem::size_of::<u16>();

        Varchar {
            capacity,
            buffer: vec![0u16; words].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Get the received bytes
    pub fn as_bytes(&self) -> &[u8] {
        let inner = self.buffer.as_ptr() as *const InnerVarchar;
        let len = u16::min(self.capacity, self.buffer[0]) as usize;

        unsafe { slice::from_raw_parts(ptr::addr_of!((*inner).data) as *const u8, len) }
    }

    /// Get the pointer to the inner type, for the `sqldata` of a xsqlvar
    pub fn as_mut_ptr(&mut self) -> *mut InnerVarchar {
        self.buffer.as_mut_ptr() as *mut InnerVarchar
    }

    /// Space taken by the value on the message, as a `SQL_VARYING` with this capacity
    pub fn sqllen(&self) -> ibase::ISC_SHORT {
        self.capacity as ibase::ISC_SHORT
    }
}
