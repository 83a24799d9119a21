//! Text encoding of an attachment
//!
//! Firebird names: <http://www.destructor.de/firebird/charsets.htm>

use encoding::{all, types::EncodingRef, DecoderTrap, EncoderTrap};
use std::{borrow::Cow, fmt};

use crate::FbError;

/// Pairs the `isc_dpb_lc_ctype` name with the encoding that
/// converts sql text and results on this side
#[derive(Clone)]
pub struct Charset {
    pub on_firebird: &'static str,

    /// `None` for utf-8, which needs no conversion
    pub on_rust: Option<EncodingRef>,
}

impl Charset {
    pub fn decode<'a, B>(&self, bytes: B) -> Result<String, FbError>
    where
        B: Into<Cow<'a, [u8]>>,
    {
        let bytes = bytes.into();

        match self.on_rust {
            Some(enc) => enc
                .decode(&bytes, DecoderTrap::Strict)
                .map_err(|e| FbError::from(format!("Invalid {} text received: {}", enc.name(), e))),
            None => Ok(String::from_utf8(bytes.into_owned())?),
        }
    }

    /// Borrows the string when no conversion is needed
    pub fn encode<'a, S>(&self, s: S) -> Result<Cow<'a, [u8]>, FbError>
    where
        S: Into<Cow<'a, str>>,
    {
        let s = s.into();

        let enc = match self.on_rust {
            Some(enc) => enc,
            None => {
                return Ok(match s {
                    Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                    Cow::Owned(s) => Cow::Owned(s.into_bytes()),
                })
            }
        };

        enc.encode(&s, EncoderTrap::Strict)
            .map(Cow::Owned)
            .map_err(|e| FbError::from(format!("Text not representable in {}: {}", enc.name(), e)))
    }
}

impl Default for Charset {
    fn default() -> Self {
        UTF_8
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.on_firebird)
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.on_firebird == other.on_firebird
    }
}

pub const UTF_8: Charset = Charset {
    on_firebird: "UTF8",
    on_rust: None,
};

/// Latin 1
pub const ISO_8859_1: Charset = Charset {
    on_firebird: "ISO8859_1",
    on_rust: Some(all::ISO_8859_1),
};

/// Latin 1 plus the windows extras
pub const WIN_1252: Charset = Charset {
    on_firebird: "WIN1252",
    on_rust: Some(all::WINDOWS_1252),
};

pub const ASCII: Charset = Charset {
    on_firebird: "ASCII",
    on_rust: Some(all::ASCII),
};
