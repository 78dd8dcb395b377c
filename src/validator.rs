//! Validation logic for G3D geometry models
//!
//! The container format never guarantees the internal consistency of the
//! flat attribute arrays, so validation is an explicit pass over a
//! constructed [`Geometry`]. It checks:
//! - Position and index buffer divisibility
//! - Corner indices within the vertex count
//! - Instance mesh/transform parity and transform arity
//! - Offset arrays strictly increasing and within their target ranges
//! - Material references within the color table
//!
//! The first violated invariant is returned as its specific
//! [`ValidationError`]; a model that passes every check returns `Ok`.

use crate::error::ValidationError;
use crate::model::{COLOR_SIZE, Geometry, MATRIX_SIZE, POSITION_SIZE};

/// Validate a constructed geometry model, reporting the first violation
pub(crate) fn validate_geometry(geometry: &Geometry) -> Result<(), ValidationError> {
    validate_position_buffer(geometry)?;
    validate_index_buffer(geometry)?;
    validate_instances(geometry)?;
    validate_mesh_offsets(geometry)?;
    validate_submeshes(geometry)?;
    validate_material_colors(geometry)?;
    Ok(())
}

/// Position scalars come in xyz triples
fn validate_position_buffer(geometry: &Geometry) -> Result<(), ValidationError> {
    let len = geometry.positions().len();
    if len % POSITION_SIZE != 0 {
        return Err(ValidationError::InvalidPositionBuffer { len });
    }
    Ok(())
}

/// Indices come in triangles and must reference existing vertices
fn validate_index_buffer(geometry: &Geometry) -> Result<(), ValidationError> {
    let indices = geometry.indices();
    if indices.len() % 3 != 0 {
        return Err(ValidationError::InvalidIndexCount { len: indices.len() });
    }
    let vertex_count = geometry.vertex_count();
    for (index, &value) in indices.iter().enumerate() {
        if value as usize >= vertex_count {
            return Err(ValidationError::VertexIndexOutOfRange {
                index,
                value,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Instance buffers agree on the instance count and reference real meshes
fn validate_instances(geometry: &Geometry) -> Result<(), ValidationError> {
    let meshes = geometry.instance_meshes();
    let transforms = geometry.instance_transforms();

    if !meshes.is_empty() && !transforms.is_empty() && meshes.len() != transforms.len() / MATRIX_SIZE
    {
        return Err(ValidationError::InstanceBufferMismatch {
            meshes: meshes.len(),
            transforms: transforms.len() / MATRIX_SIZE,
        });
    }
    if transforms.len() % MATRIX_SIZE != 0 {
        return Err(ValidationError::InvalidInstanceTransforms {
            len: transforms.len(),
        });
    }

    let mesh_count = geometry.mesh_count();
    for (instance, &mesh) in meshes.iter().enumerate() {
        // Negative references are the "unassigned" sentinel.
        if mesh >= 0 && mesh as usize >= mesh_count {
            return Err(ValidationError::InstanceMeshOutOfRange {
                instance,
                mesh,
                mesh_count,
            });
        }
    }
    Ok(())
}

/// Mesh submesh offsets stay inside the submesh table and strictly increase
fn validate_mesh_offsets(geometry: &Geometry) -> Result<(), ValidationError> {
    let offsets = geometry.mesh_submesh_offsets();
    let submesh_count = geometry.submesh_count();

    for (mesh, &offset) in offsets.iter().enumerate() {
        if offset < 0 || offset as usize >= submesh_count {
            return Err(ValidationError::MeshSubmeshOffsetOutOfRange {
                mesh,
                offset,
                submesh_count,
            });
        }
    }
    for (mesh, pair) in offsets.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(ValidationError::MeshSubmeshOffsetOutOfSequence { mesh });
        }
    }
    Ok(())
}

/// Submesh offsets are triangle-aligned, in range, strictly increasing, and
/// material assignments pair up and resolve
fn validate_submeshes(geometry: &Geometry) -> Result<(), ValidationError> {
    let offsets = geometry.submesh_index_offsets();
    let materials = geometry.submesh_materials();
    let index_count = geometry.indices().len();

    if !materials.is_empty() && materials.len() != offsets.len() {
        return Err(ValidationError::MismatchedSubmeshBuffers {
            offsets: offsets.len(),
            materials: materials.len(),
        });
    }

    for (submesh, &offset) in offsets.iter().enumerate() {
        if offset % 3 != 0 {
            return Err(ValidationError::InvalidSubmeshIndexOffset { submesh, offset });
        }
    }
    for (submesh, &offset) in offsets.iter().enumerate() {
        if offset < 0 || offset as usize >= index_count {
            return Err(ValidationError::SubmeshIndexOffsetOutOfRange {
                submesh,
                offset,
                index_count,
            });
        }
    }
    for (submesh, pair) in offsets.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(ValidationError::SubmeshIndexOffsetOutOfSequence { submesh });
        }
    }

    let material_count = geometry.material_count();
    for (submesh, &material) in materials.iter().enumerate() {
        // -1 means "no material".
        if material >= 0 && material as usize >= material_count {
            return Err(ValidationError::SubmeshMaterialOutOfRange {
                submesh,
                material,
                material_count,
            });
        }
    }
    Ok(())
}

/// Material color scalars come in RGBA quadruples
fn validate_material_colors(geometry: &Geometry) -> Result<(), ValidationError> {
    let len = geometry.material_colors().len();
    if len % COLOR_SIZE != 0 {
        return Err(ValidationError::InvalidMaterialColors { len });
    }
    Ok(())
}
