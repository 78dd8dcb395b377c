//! G3D attribute descriptors and typed attribute data
//!
//! A G3D attribute is a flat byte buffer whose identity is a URN of the
//! form `g3d:<association>:<semantic>:<index>:<dataType>:<arity>`. The
//! descriptor names the geometric domain the buffer is indexed over, the
//! role it plays, and how to reinterpret its bytes as scalars.

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// The geometric domain an attribute is indexed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    /// The whole geometry
    All,
    /// No particular domain
    None,
    /// One element per vertex
    Vertex,
    /// One element per triangle corner
    Corner,
    /// One element per edge
    Edge,
    /// One element per face
    Face,
    /// One element per mesh
    Mesh,
    /// One element per submesh
    Submesh,
    /// One element per instance
    Instance,
    /// One element per material
    Material,
}

impl Association {
    /// The URN tag for this association
    pub fn as_str(&self) -> &'static str {
        match self {
            Association::All => "all",
            Association::None => "none",
            Association::Vertex => "vertex",
            Association::Corner => "corner",
            Association::Edge => "edge",
            Association::Face => "face",
            Association::Mesh => "mesh",
            Association::Submesh => "submesh",
            Association::Instance => "instance",
            Association::Material => "material",
        }
    }
}

impl FromStr for Association {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Association::All),
            "none" => Ok(Association::None),
            "vertex" => Ok(Association::Vertex),
            "corner" => Ok(Association::Corner),
            "edge" => Ok(Association::Edge),
            "face" => Ok(Association::Face),
            "mesh" => Ok(Association::Mesh),
            "submesh" => Ok(Association::Submesh),
            "instance" => Ok(Association::Instance),
            "material" => Ok(Association::Material),
            _ => Err(Error::UnknownAssociation(s.to_string())),
        }
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scalar type of the values inside an attribute buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer (descriptor-only; typed views are unsupported)
    Int64,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
}

impl DataType {
    /// Byte width of one scalar of this type
    pub fn size(&self) -> usize {
        match self {
            DataType::Int8 => 1,
            DataType::Int16 => 2,
            DataType::Int32 => 4,
            DataType::Int64 => 8,
            DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }

    /// The URN tag for this data type
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int8" => Ok(DataType::Int8),
            "int16" => Ok(DataType::Int16),
            "int32" => Ok(DataType::Int32),
            "int64" => Ok(DataType::Int64),
            "float32" => Ok(DataType::Float32),
            "float64" => Ok(DataType::Float64),
            _ => Err(Error::UnknownDataType(s.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one attribute buffer, parsed from its URN
///
/// The canonical string form is the URN itself and is the equality/hash key
/// for an attribute's identity:
///
/// ```
/// use libg3d::AttributeDescriptor;
///
/// let descriptor = AttributeDescriptor::parse("g3d:vertex:position:0:float32:3")?;
/// assert_eq!(descriptor.arity, 3);
/// assert_eq!(descriptor.to_string(), "g3d:vertex:position:0:float32:3");
/// # Ok::<(), libg3d::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    /// The domain the attribute is indexed over
    pub association: Association,
    /// The role of the attribute, e.g. "position", "index", "color"
    pub semantic: String,
    /// Disambiguates attributes sharing association and semantic (uv0, uv1)
    pub index: u32,
    /// Scalar type of the buffer's values
    pub data_type: DataType,
    /// Number of scalars per element (UVs 2, positions 3, matrices 16)
    pub arity: u32,
}

impl AttributeDescriptor {
    /// Create a descriptor from its parts
    pub fn new(
        association: Association,
        semantic: impl Into<String>,
        index: u32,
        data_type: DataType,
        arity: u32,
    ) -> Self {
        Self {
            association,
            semantic: semantic.into(),
            index,
            data_type,
            arity,
        }
    }

    /// Parse a descriptor from its URN form
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrn`] when the URN does not have exactly 6
    /// colon-separated parts or does not start with the literal `g3d`,
    /// [`Error::UnknownAssociation`] / [`Error::UnknownDataType`] for
    /// unrecognized vocabulary, and [`Error::MalformedInteger`] when the
    /// index or arity part is not a non-negative integer.
    pub fn parse(urn: &str) -> Result<Self> {
        let parts: Vec<&str> = urn.split(':').collect();
        if parts.len() != 6 {
            return Err(Error::InvalidUrn {
                urn: urn.to_string(),
                reason: format!("expected 6 colon-separated parts, found {}", parts.len()),
            });
        }
        if parts[0] != "g3d" {
            return Err(Error::InvalidUrn {
                urn: urn.to_string(),
                reason: "first part must be the literal 'g3d'".to_string(),
            });
        }
        let association: Association = parts[1].parse()?;
        let index: u32 = parts[3]
            .parse()
            .map_err(|_| Error::MalformedInteger(parts[3].to_string()))?;
        let data_type: DataType = parts[4].parse()?;
        let arity: u32 = parts[5]
            .parse()
            .map_err(|_| Error::MalformedInteger(parts[5].to_string()))?;
        Ok(Self {
            association,
            semantic: parts[2].to_string(),
            index,
            data_type,
            arity,
        })
    }

    /// The canonical URN form of this descriptor
    pub fn urn(&self) -> String {
        self.to_string()
    }

    /// Byte width of one scalar, derived from the data type
    pub fn scalar_size(&self) -> usize {
        self.data_type.size()
    }

    /// Byte size of one element: scalar width times arity
    pub fn element_size(&self) -> usize {
        self.data_type.size() * self.arity as usize
    }

    /// Re-parse the canonical form and check it reproduces this descriptor
    ///
    /// A failure here indicates an internal encoding bug in the URN
    /// round-trip, not a recoverable input condition.
    pub fn validate(&self) -> Result<()> {
        let urn = self.urn();
        let reparsed = Self::parse(&urn)?;
        if reparsed != *self {
            return Err(Error::InvalidUrn {
                urn,
                reason: "canonical form does not round-trip to an equal descriptor".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "g3d:{}:{}:{}:{}:{}",
            self.association, self.semantic, self.index, self.data_type, self.arity
        )
    }
}

/// Attribute data decoded into a typed scalar array
///
/// This is the explicit, checked reinterpretation of a raw byte buffer
/// according to a descriptor's data type. Scalars are decoded little-endian
/// into an owned array, since container byte views carry no alignment
/// guarantee.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArray {
    /// Signed 8-bit values
    Int8(Vec<i8>),
    /// Signed 16-bit values
    Int16(Vec<i16>),
    /// Signed 32-bit values
    Int32(Vec<i32>),
    /// 32-bit float values
    Float32(Vec<f32>),
    /// 64-bit float values
    Float64(Vec<f64>),
}

impl ScalarArray {
    /// Decode a byte buffer as a typed scalar array
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDataType`] for `int64` (no typed view is
    /// provided for 64-bit integers) and [`Error::MisalignedBuffer`] when
    /// the byte length is not a multiple of the scalar width.
    pub fn decode(bytes: &[u8], data_type: DataType) -> Result<Self> {
        let scalar = data_type.size();
        match data_type {
            DataType::Int64 => Err(Error::UnsupportedDataType(data_type.to_string())),
            _ if bytes.len() % scalar != 0 => Err(Error::MisalignedBuffer {
                len: bytes.len(),
                scalar,
            }),
            DataType::Int8 => Ok(Self::Int8(bytes.iter().map(|&b| b as i8).collect())),
            DataType::Int16 => Ok(Self::Int16(
                bytes.chunks_exact(2).map(LittleEndian::read_i16).collect(),
            )),
            DataType::Int32 => Ok(Self::Int32(
                bytes.chunks_exact(4).map(LittleEndian::read_i32).collect(),
            )),
            DataType::Float32 => Ok(Self::Float32(
                bytes.chunks_exact(4).map(LittleEndian::read_f32).collect(),
            )),
            DataType::Float64 => Ok(Self::Float64(
                bytes.chunks_exact(8).map(LittleEndian::read_f64).collect(),
            )),
        }
    }

    /// Number of scalars in the array
    pub fn len(&self) -> usize {
        match self {
            ScalarArray::Int8(v) => v.len(),
            ScalarArray::Int16(v) => v.len(),
            ScalarArray::Int32(v) => v.len(),
            ScalarArray::Float32(v) => v.len(),
            ScalarArray::Float64(v) => v.len(),
        }
    }

    /// Whether the array holds no scalars
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The data type the array was decoded as
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarArray::Int8(_) => DataType::Int8,
            ScalarArray::Int16(_) => DataType::Int16,
            ScalarArray::Int32(_) => DataType::Int32,
            ScalarArray::Float32(_) => DataType::Float32,
            ScalarArray::Float64(_) => DataType::Float64,
        }
    }

    /// View as signed 8-bit values, if that is the decoded type
    pub fn as_i8(&self) -> Option<&[i8]> {
        match self {
            ScalarArray::Int8(v) => Some(v),
            _ => None,
        }
    }

    /// View as signed 16-bit values, if that is the decoded type
    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            ScalarArray::Int16(v) => Some(v),
            _ => None,
        }
    }

    /// View as signed 32-bit values, if that is the decoded type
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            ScalarArray::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// View as 32-bit float values, if that is the decoded type
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            ScalarArray::Float32(v) => Some(v),
            _ => None,
        }
    }

    /// View as 64-bit float values, if that is the decoded type
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            ScalarArray::Float64(v) => Some(v),
            _ => None,
        }
    }
}

/// A descriptor paired with its decoded data
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Identity of the buffer
    pub descriptor: AttributeDescriptor,
    /// The buffer's scalars, decoded per the descriptor's data type
    pub data: ScalarArray,
}

impl Attribute {
    /// Build an attribute from a URN and a raw byte buffer
    ///
    /// # Errors
    ///
    /// Propagates descriptor parse errors and typed-view decode errors
    /// ([`Error::UnsupportedDataType`], [`Error::MisalignedBuffer`]).
    pub fn new(urn: &str, bytes: &[u8]) -> Result<Self> {
        let descriptor = AttributeDescriptor::parse(urn)?;
        let data = ScalarArray::decode(bytes, descriptor.data_type)?;
        Ok(Self { descriptor, data })
    }

    /// Number of elements in the buffer: scalar count divided by arity
    ///
    /// Zero-arity descriptors yield zero elements.
    pub fn element_count(&self) -> usize {
        let arity = self.descriptor.arity as usize;
        if arity == 0 {
            0
        } else {
            self.data.len() / arity
        }
    }
}
