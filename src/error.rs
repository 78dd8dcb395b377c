//! Error types for BFAST and G3D decoding
//!
//! This module provides error handling for container decoding, attribute
//! interpretation, and geometry construction. All errors include error codes
//! for categorization and enough context to identify the offending input.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: container decode errors
//! - **E2xxx**: attribute URN and typed-view errors
//! - **E3xxx**: geometry model errors (E31xx: validation failures)

use std::str::Utf8Error;
use thiserror::Error;

/// Result type for decode and construction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when decoding containers and building geometry
#[derive(Error, Debug)]
pub enum Error {
    /// The byte buffer is not a well-formed BFAST container
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Wrong magic number (not a BFAST file, or byte-swapped)
    /// - Header fields outside the buffer bounds
    /// - Array table records out of range or with non-zero reserved words
    /// - A container with no arrays at all (the first array must hold the
    ///   name table)
    #[error("[E1001] Malformed container: {0}")]
    MalformedContainer(String),

    /// The name table does not pair up with the data buffers
    ///
    /// **Error Code**: E1002
    ///
    /// The first array of a container is a NUL-separated list of names for
    /// the remaining arrays, so a container with `n` arrays must carry
    /// exactly `n - 1` names.
    #[error("[E1002] Name table mismatch: expected {expected} names, found {found}")]
    NameCountMismatch {
        /// Number of data buffers in the container
        expected: usize,
        /// Number of names decoded from the name table
        found: usize,
    },

    /// The name table is not valid UTF-8
    ///
    /// **Error Code**: E1003
    #[error("[E1003] Name table is not valid UTF-8: {0}")]
    InvalidNameTable(#[from] Utf8Error),

    /// An attribute URN does not follow the `g3d:` grammar
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Wrong number of colon-separated parts (must be exactly 6)
    /// - First part is not the literal tag `g3d`
    #[error("[E2001] Invalid attribute URN '{urn}': {reason}")]
    InvalidUrn {
        /// The URN that failed to parse
        urn: String,
        /// What was wrong with it
        reason: String,
    },

    /// The association part of a URN is not a known geometric domain
    ///
    /// **Error Code**: E2002
    #[error("[E2002] Unknown attribute association: '{0}'")]
    UnknownAssociation(String),

    /// The data-type part of a URN is not a known scalar type
    ///
    /// **Error Code**: E2003
    #[error("[E2003] Unknown attribute data type: '{0}'")]
    UnknownDataType(String),

    /// The index or arity part of a URN is not a non-negative integer
    ///
    /// **Error Code**: E2004
    #[error("[E2004] Malformed integer in attribute URN: '{0}'")]
    MalformedInteger(String),

    /// A typed view was requested for a data type with no native array form
    ///
    /// **Error Code**: E2005
    ///
    /// 64-bit integer attributes can be described but not materialized as a
    /// typed view.
    #[error("[E2005] Unsupported data type for typed views: {0}")]
    UnsupportedDataType(String),

    /// A buffer's byte length is not a multiple of its scalar width
    ///
    /// **Error Code**: E2006
    ///
    /// Reinterpreting bytes as a typed view requires the byte length to
    /// divide evenly; a misaligned buffer is rejected rather than silently
    /// truncated.
    #[error("[E2006] Misaligned buffer: {len} bytes is not a multiple of the scalar width {scalar}")]
    MisalignedBuffer {
        /// Byte length of the offending buffer
        len: usize,
        /// Scalar width implied by the attribute's data type
        scalar: usize,
    },

    /// A required attribute buffer is absent from the container
    ///
    /// **Error Code**: E3001
    ///
    /// Positions and indices are mandatory; all other well-known attributes
    /// have defaults.
    #[error("[E3001] Missing required attribute buffer: {0}")]
    MissingRequiredAttribute(&'static str),

    /// A structural invariant of the geometry model does not hold
    ///
    /// See [`ValidationError`] for the individual failures.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Structural invariant violations reported by [`crate::Geometry::validate`]
///
/// Validation is an explicit operation, separate from construction; it
/// re-checks every invariant of the flat attribute arrays and reports the
/// first violation found.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Position buffer length is not a multiple of 3
    #[error("[E3101] Invalid position buffer: length {len} is not a multiple of 3")]
    InvalidPositionBuffer {
        /// Scalar length of the position buffer
        len: usize,
    },

    /// Index buffer length is not a multiple of 3
    #[error("[E3102] Invalid index count: {len} is not a multiple of 3")]
    InvalidIndexCount {
        /// Length of the index buffer
        len: usize,
    },

    /// A corner index references a vertex outside the position buffer
    #[error("[E3103] Vertex index out of range: index {index} is {value}, vertex count is {vertex_count}")]
    VertexIndexOutOfRange {
        /// Position of the offending value in the index buffer
        index: usize,
        /// The offending corner index
        value: u32,
        /// Number of vertices in the model
        vertex_count: usize,
    },

    /// Instance mesh and instance transform buffers disagree on the instance count
    #[error("[E3104] Instance buffers mismatched: {meshes} instance meshes, {transforms} instance transforms")]
    InstanceBufferMismatch {
        /// Number of per-instance mesh references
        meshes: usize,
        /// Number of 4x4 transforms in the transform buffer
        transforms: usize,
    },

    /// Instance transform buffer length is not a multiple of 16
    #[error("[E3105] Invalid instance transform buffer: length {len} is not a multiple of 16")]
    InvalidInstanceTransforms {
        /// Scalar length of the transform buffer
        len: usize,
    },

    /// An instance references a mesh outside the mesh table
    #[error("[E3106] Instance mesh out of range: instance {instance} references mesh {mesh}, mesh count is {mesh_count}")]
    InstanceMeshOutOfRange {
        /// The offending instance
        instance: usize,
        /// The mesh it references
        mesh: i32,
        /// Number of meshes in the model
        mesh_count: usize,
    },

    /// A mesh submesh offset points outside the submesh table
    #[error("[E3107] Mesh submesh offset out of range: mesh {mesh} starts at submesh {offset}, submesh count is {submesh_count}")]
    MeshSubmeshOffsetOutOfRange {
        /// The offending mesh
        mesh: usize,
        /// Its stored submesh offset
        offset: i32,
        /// Number of submeshes in the model
        submesh_count: usize,
    },

    /// Mesh submesh offsets are not strictly increasing
    #[error("[E3108] Mesh submesh offsets out of sequence at mesh {mesh}")]
    MeshSubmeshOffsetOutOfSequence {
        /// First mesh whose offset does not increase
        mesh: usize,
    },

    /// Submesh index-offset and submesh material buffers differ in length
    #[error("[E3109] Mismatched submesh buffers: {offsets} index offsets, {materials} material assignments")]
    MismatchedSubmeshBuffers {
        /// Length of the submesh index-offset buffer
        offsets: usize,
        /// Length of the submesh material buffer
        materials: usize,
    },

    /// A submesh index offset is not a multiple of 3
    #[error("[E3110] Invalid submesh index offset: submesh {submesh} starts at {offset}, which is not a multiple of 3")]
    InvalidSubmeshIndexOffset {
        /// The offending submesh
        submesh: usize,
        /// Its stored index offset
        offset: i32,
    },

    /// A submesh index offset points outside the index buffer
    #[error("[E3111] Submesh index offset out of range: submesh {submesh} starts at {offset}, index count is {index_count}")]
    SubmeshIndexOffsetOutOfRange {
        /// The offending submesh
        submesh: usize,
        /// Its stored index offset
        offset: i32,
        /// Length of the index buffer
        index_count: usize,
    },

    /// Submesh index offsets are not strictly increasing
    #[error("[E3112] Submesh index offsets out of sequence at submesh {submesh}")]
    SubmeshIndexOffsetOutOfSequence {
        /// First submesh whose offset does not increase
        submesh: usize,
    },

    /// A submesh references a material outside the material color table
    #[error("[E3113] Submesh material out of range: submesh {submesh} references material {material}, material count is {material_count}")]
    SubmeshMaterialOutOfRange {
        /// The offending submesh
        submesh: usize,
        /// The material it references
        material: i32,
        /// Number of materials in the model
        material_count: usize,
    },

    /// Material color buffer length is not a multiple of 4
    #[error("[E3114] Invalid material color buffer: length {len} is not a multiple of 4")]
    InvalidMaterialColors {
        /// Scalar length of the material color buffer
        len: usize,
    },
}
