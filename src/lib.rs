//! # libg3d
//!
//! A pure Rust decoder for BFAST binary containers and the G3D geometry
//! attribute format.
//!
//! BFAST is a generic binary layout for an ordered set of named byte
//! buffers with a validated header and array table; containers nest. G3D
//! layers a geometry schema on top: meshes, submeshes, instances, and
//! materials encoded as flat attribute buffers identified by URNs such as
//! `g3d:vertex:position:0:float32:3`.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Zero-copy container decoding with recursive nested-container support
//! - Checked reinterpretation of attribute buffers as typed scalar arrays
//! - Mesh-level reconstruction: vertex ranges, mesh-local indices,
//!   instance grouping, and per-mesh transparency
//! - Explicit structural validation with specific, named failures
//!
//! ## Example
//!
//! ```no_run
//! use libg3d::Geometry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("model.vim")?;
//! let geometry = Geometry::from_bytes(&bytes)?;
//!
//! println!(
//!     "{} meshes, {} instances, {} materials",
//!     geometry.mesh_count(),
//!     geometry.instance_count(),
//!     geometry.material_count()
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attribute;
pub mod bfast;
pub mod error;
pub mod model;
mod validator;

pub use attribute::{Association, Attribute, AttributeDescriptor, DataType, ScalarArray};
pub use bfast::{Bfast, Header, is_bfast};
pub use error::{Error, Result, ValidationError};
pub use model::{DEFAULT_COLOR, Geometry, urns};

impl Geometry {
    /// Decode a geometry model from a raw byte buffer
    ///
    /// Decodes the buffer as a BFAST container and binds the well-known
    /// G3D attributes. Some producers wrap their geometry in an outer
    /// container under a child named `geometry`; when such a child exists
    /// it is used instead of the top-level container.
    ///
    /// # Errors
    ///
    /// Propagates container decode errors, attribute decode errors, and
    /// [`Error::MissingRequiredAttribute`] when positions or indices are
    /// absent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use libg3d::Geometry;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let bytes = std::fs::read("model.vim")?;
    /// let geometry = Geometry::from_bytes(&bytes)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Geometry> {
        let container = Bfast::decode(bytes)?;
        match container.child("geometry") {
            Some(child) => {
                log::debug!("descending into the 'geometry' child container");
                Geometry::from_bfast(child)
            }
            None => Geometry::from_bfast(&container),
        }
    }
}
