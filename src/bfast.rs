//! BFAST binary container decoding
//!
//! BFAST is a generic binary layout for an ordered set of named byte
//! buffers: a 32-byte little-endian header, an array table of begin/end
//! offsets, a name table, and the raw array data. Buffers may themselves be
//! BFAST containers, which are decoded recursively into children.
//!
//! Decoding is zero-copy: a [`Bfast`] holds byte-slice views into the input
//! buffer and stays valid for that buffer's lifetime.

use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Magic number identifying a BFAST container, little-endian
pub const MAGIC: u32 = 0xBFA5;

/// Size of the fixed header region in bytes (8 little-endian 32-bit words)
pub const HEADER_SIZE: usize = 32;

/// Size of one array-table record in bytes (4 little-endian 32-bit words)
pub const ARRAY_RECORD_SIZE: usize = 16;

/// Parsed BFAST header
///
/// The on-disk header stores `data_start` and `data_end` as 64-bit values
/// whose high word must be zero; only the low 32-bit word is consumed here.
/// A header is parsed unconditionally and carries its own validity verdict,
/// so probing arbitrary bytes never fails.
#[derive(Debug, Clone)]
pub struct Header {
    /// Magic number found in the first word
    pub magic: u32,
    /// Byte offset where array data begins
    pub data_start: u64,
    /// Byte offset one past the end of array data
    pub data_end: u64,
    /// Number of arrays in the container, including the name table
    pub num_arrays: u32,
    error: Option<String>,
}

impl Header {
    /// Read a header from the front of a byte buffer
    ///
    /// Never fails: a buffer too short to hold a header, or one whose fields
    /// violate the layout invariants, yields an invalid header with a
    /// diagnostic retrievable through [`Header::error`].
    pub fn read(bytes: &[u8]) -> Header {
        if bytes.len() < HEADER_SIZE {
            return Header {
                magic: 0,
                data_start: 0,
                data_end: 0,
                num_arrays: 0,
                error: Some("buffer too small to hold a container header".to_string()),
            };
        }
        let magic = LittleEndian::read_u32(&bytes[0..4]);
        let data_start = u64::from(LittleEndian::read_u32(&bytes[8..12]));
        let data_end = u64::from(LittleEndian::read_u32(&bytes[16..20]));
        let num_arrays = LittleEndian::read_u32(&bytes[24..28]);
        let error = Self::check(magic, data_start, data_end, num_arrays, bytes.len() as u64);
        Header {
            magic,
            data_start,
            data_end,
            num_arrays,
            error,
        }
    }

    fn check(
        magic: u32,
        data_start: u64,
        data_end: u64,
        num_arrays: u32,
        byte_length: u64,
    ) -> Option<String> {
        if magic != MAGIC {
            Some("not a BFAST container, or the endianness is swapped".to_string())
        } else if data_start <= HEADER_SIZE as u64 || data_start > byte_length {
            Some("data start is out of valid range".to_string())
        } else if data_end < data_start || data_end > byte_length {
            Some("data end is out of valid range".to_string())
        } else if u64::from(num_arrays) > data_end {
            Some("array count is out of valid range".to_string())
        } else {
            None
        }
    }

    /// Whether the header satisfies all layout invariants
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Diagnostic for an invalid header, `None` when valid
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Check whether a byte buffer starts with a valid BFAST header
///
/// This is a cheap guard used both by callers probing unknown data and by
/// the decoder's nested-container detection. It never fails; a buffer that
/// is not a container is a normal outcome, not an error.
pub fn is_bfast(bytes: &[u8]) -> bool {
    Header::read(bytes).is_valid()
}

/// A decoded BFAST container: named byte buffers plus nested children
///
/// Names are stored in array order and are not required to be unique;
/// [`Bfast::buffer`] returns the first match. Every buffer whose own bytes
/// pass header validation is additionally decoded as a child container.
#[derive(Debug, Clone)]
pub struct Bfast<'a> {
    /// The container's parsed header
    pub header: Header,
    /// Buffer names, in array order
    pub names: Vec<String>,
    /// Byte-slice views into the input, positionally paired with `names`
    pub buffers: Vec<&'a [u8]>,
    /// Nested containers, keyed by buffer name
    pub children: HashMap<String, Bfast<'a>>,
}

impl<'a> Bfast<'a> {
    /// Decode a BFAST container from a byte buffer
    ///
    /// The returned container borrows the input; no array data is copied.
    /// Nested containers are detected with [`is_bfast`] and decoded
    /// recursively. A buffer that fails the nested-header check is kept as
    /// opaque data; a buffer that passes it but then fails to decode
    /// propagates its error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedContainer`] for header or array-table
    /// violations, [`Error::InvalidNameTable`] when the name blob is not
    /// UTF-8, and [`Error::NameCountMismatch`] when the name count does not
    /// equal the data-buffer count.
    pub fn decode(bytes: &'a [u8]) -> Result<Bfast<'a>> {
        let header = Header::read(bytes);
        if let Some(err) = header.error() {
            return Err(Error::MalformedContainer(err.to_string()));
        }

        let num_arrays = header.num_arrays as usize;
        if num_arrays == 0 {
            return Err(Error::MalformedContainer(
                "container has no arrays; the first array must hold the name table".to_string(),
            ));
        }

        let mut arrays: Vec<&[u8]> = Vec::with_capacity(num_arrays);
        for i in 0..num_arrays {
            let at = HEADER_SIZE + i * ARRAY_RECORD_SIZE;
            let Some(record) = bytes.get(at..at + ARRAY_RECORD_SIZE) else {
                return Err(Error::MalformedContainer(format!(
                    "array table record {i} extends past the end of the buffer"
                )));
            };
            let begin = u64::from(LittleEndian::read_u32(&record[0..4]));
            let reserved0 = LittleEndian::read_u32(&record[4..8]);
            let end = u64::from(LittleEndian::read_u32(&record[8..12]));
            let reserved1 = LittleEndian::read_u32(&record[12..16]);
            if reserved0 != 0 || reserved1 != 0 {
                return Err(Error::MalformedContainer(format!(
                    "array table record {i} has a non-zero reserved word"
                )));
            }
            if begin < header.data_start || end < begin || end > header.data_end {
                return Err(Error::MalformedContainer(format!(
                    "array table record {i} is out of range: [{begin}, {end})"
                )));
            }
            arrays.push(&bytes[begin as usize..end as usize]);
        }

        // The first array is the NUL-separated name table for the rest.
        let blob = std::str::from_utf8(arrays[0])?;
        let names: Vec<String> = if blob.is_empty() {
            Vec::new()
        } else {
            blob.strip_suffix('\0')
                .unwrap_or(blob)
                .split('\0')
                .map(str::to_owned)
                .collect()
        };
        let buffers: Vec<&[u8]> = arrays[1..].to_vec();
        if names.len() != buffers.len() {
            return Err(Error::NameCountMismatch {
                expected: buffers.len(),
                found: names.len(),
            });
        }

        let mut children = HashMap::new();
        for (name, &buffer) in names.iter().zip(&buffers) {
            if is_bfast(buffer) {
                log::debug!("buffer '{name}' is a nested container, decoding recursively");
                children.insert(name.clone(), Bfast::decode(buffer)?);
            }
        }

        Ok(Bfast {
            header,
            names,
            buffers,
            children,
        })
    }

    /// Look up a data buffer by name; first match wins
    pub fn buffer(&self, name: &str) -> Option<&'a [u8]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.buffers[i])
    }

    /// Look up a nested container by name
    pub fn child(&self, name: &str) -> Option<&Bfast<'a>> {
        self.children.get(name)
    }

    /// Number of named data buffers in the container
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the container holds no data buffers
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
