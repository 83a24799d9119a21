//! Output descriptor for a single text column

use std::mem;

use crate::{ibase, varchar::Varchar};
use firebird_samples_core::{Charset, FbError};

/// A one column `XSQLDA`, with the column coerced to a nullable
/// `VARCHAR(capacity)`. The fbclient writes the value and the null
/// indicator directly into the owned buffers
pub struct TextColumn {
    xsqlda: Box<ibase::XSQLDA>,
    data: Varchar,
    null_ind: Box<ibase::ISC_SHORT>,
}

impl TextColumn {
    pub fn new(capacity: u16) -> Result<Self, FbError> {
        if capacity == 0 || capacity > ibase::MAX_VARCHAR_LENGTH {
            return Err(FbError::from(format!(
                "Invalid varchar length {}, must be between 1 and {}",
                capacity,
                ibase::MAX_VARCHAR_LENGTH
            )));
        }

        let mut data = Varchar::new(capacity);
        let mut null_ind = Box::new(0);

        // Safe, the struct is only made of integers and pointers
        let mut xsqlda: Box<ibase::XSQLDA> = Box::new(unsafe { mem::zeroed() });
        xsqlda.version = ibase::SQLDA_VERSION1 as ibase::ISC_SHORT;
        xsqlda.sqln = 1;
        xsqlda.sqld = 1;

        let var = &mut xsqlda.sqlvar[0];
        // + 1: nullable
        var.sqltype = ibase::SQL_VARYING as ibase::ISC_SHORT + 1;
        var.sqllen = data.sqllen();
        var.sqldata = data.as_mut_ptr() as *mut _;
        var.sqlind = &mut *null_ind;

        Ok(Self {
            xsqlda,
            data,
            null_ind,
        })
    }

    /// Pointer for the `out_xsqlda` of the fbclient calls
    pub fn as_ptr(&self) -> *const ibase::XSQLDA {
        &*self.xsqlda
    }

    pub fn is_null(&self) -> bool {
        *self.null_ind < 0
    }

    /// Decode the received value
    pub fn value(&self, charset: &Charset) -> Result<Option<String>, FbError> {
        if self.is_null() {
            return Ok(None);
        }

        charset.decode(self.data.as_bytes()).map(Some)
    }
}

impl std::fmt::Debug for TextColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextColumn")
            .field("capacity", &self.data.capacity())
            .field("null", &self.is_null())
            .finish()
    }
}

unsafe impl Send for TextColumn {}
