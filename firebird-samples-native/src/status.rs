//! Status vector of the client calls

pub use firebird_samples_core::FbError;
use std::{
    ops::{Deref, DerefMut},
    os::raw::c_char,
};

use crate::ibase::{self, IBase};

/// Firebird status vector. Filled by every fbclient call
pub struct Status(Box<ibase::ISC_STATUS_ARRAY>);

impl Default for Status {
    fn default() -> Self {
        Status(Box::new([0; 20]))
    }
}

impl Deref for Status {
    type Target = Box<ibase::ISC_STATUS_ARRAY>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Status {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Status {
    pub fn sql_code<I: IBase>(&self, ibase: &I) -> i32 {
        unsafe { ibase.isc_sqlcode()(self.0.as_ptr()) }
    }

    /// Every message of the vector, one per line
    pub fn message<I: IBase>(&self, ibase: &I) -> String {
        let mut buffer = [0u8; 1024];
        let mut lines = Vec::new();

        let mut ptr = self.0.as_ptr();

        loop {
            let len = unsafe {
                ibase.fb_interpret()(
                    buffer.as_mut_ptr() as *mut c_char,
                    buffer.len() as u32,
                    &mut ptr,
                )
            };

            if len <= 0 {
                break;
            }

            let len = (len as usize).min(buffer.len());
            lines.push(String::from_utf8_lossy(&buffer[..len]).into_owned());
        }

        lines.join("\n")
    }

    pub fn as_error<I: IBase>(&self, ibase: &I) -> FbError {
        FbError::Sql {
            code: self.sql_code(ibase),
            msg: self.message(ibase),
        }
    }
}
