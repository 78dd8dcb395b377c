//! Tests for explicit structural validation of geometry models
//!
//! Each invariant is violated in isolation and checked to produce its
//! specific failure, with everything else in the model kept valid.

mod common;

use common::{floats_le, ints_le};
use libg3d::{Attribute, Geometry, ValidationError, urns};

fn attr(urn: &str, bytes: &[u8]) -> Attribute {
    Attribute::new(urn, bytes).unwrap()
}

fn positions_for(count: usize) -> Vec<u8> {
    floats_le(&(0..count).flat_map(|i| [i as f32, 0.0, 0.0]).collect::<Vec<_>>())
}

/// A fully consistent model: two meshes, two submeshes, two instances,
/// one material.
fn valid_attributes() -> Vec<Attribute> {
    let transforms: Vec<f32> = (0..32).map(|i| i as f32).collect();
    vec![
        attr(urns::POSITIONS, &positions_for(6)),
        attr(urns::INDICES, &ints_le(&[0, 1, 2, 3, 4, 5])),
        attr(urns::MESH_SUBMESH_OFFSETS, &ints_le(&[0, 1])),
        attr(urns::SUBMESH_INDEX_OFFSETS, &ints_le(&[0, 3])),
        attr(urns::SUBMESH_MATERIALS, &ints_le(&[0, -1])),
        attr(urns::MATERIAL_COLORS, &floats_le(&[0.2, 0.4, 0.6, 1.0])),
        attr(urns::INSTANCE_MESHES, &ints_le(&[0, 1])),
        attr(urns::INSTANCE_TRANSFORMS, &floats_le(&transforms)),
    ]
}

fn replace(attributes: Vec<Attribute>, urn: &str, bytes: &[u8]) -> Vec<Attribute> {
    let mut out: Vec<Attribute> = attributes
        .into_iter()
        .filter(|a| a.descriptor.urn() != urn)
        .collect();
    out.push(attr(urn, bytes));
    out
}

#[test]
fn test_valid_model_passes() {
    let geometry = Geometry::from_attributes(&valid_attributes()).unwrap();
    geometry.validate().unwrap();
}

#[test]
fn test_position_buffer_not_divisible_by_three() {
    let attrs = replace(valid_attributes(), urns::POSITIONS, &floats_le(&[0.0; 17]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InvalidPositionBuffer { len: 17 }
    );
}

#[test]
fn test_index_buffer_not_divisible_by_three() {
    let attrs = replace(valid_attributes(), urns::INDICES, &ints_le(&[0, 1, 2, 3]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InvalidIndexCount { len: 4 }
    );
}

#[test]
fn test_vertex_index_out_of_range() {
    let attrs = replace(valid_attributes(), urns::INDICES, &ints_le(&[0, 1, 2, 3, 4, 11]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    // Mesh 1's range is [3, 4, 11], rebased by its minimum of 3 to [0, 1, 8].
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::VertexIndexOutOfRange {
            index: 5,
            value: 8,
            vertex_count: 6
        }
    );
}

#[test]
fn test_instance_buffer_mismatch() {
    let transforms: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let attrs = replace(
        valid_attributes(),
        urns::INSTANCE_TRANSFORMS,
        &floats_le(&transforms),
    );
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InstanceBufferMismatch {
            meshes: 2,
            transforms: 1
        }
    );
}

#[test]
fn test_instance_transforms_not_divisible_by_sixteen() {
    let attrs = replace(
        valid_attributes(),
        urns::INSTANCE_TRANSFORMS,
        &floats_le(&[0.0; 40]),
    );
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InvalidInstanceTransforms { len: 40 }
    );
}

#[test]
fn test_instance_mesh_out_of_range() {
    let attrs = replace(valid_attributes(), urns::INSTANCE_MESHES, &ints_le(&[0, 5]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InstanceMeshOutOfRange {
            instance: 1,
            mesh: 5,
            mesh_count: 2
        }
    );
}

#[test]
fn test_negative_instance_mesh_is_allowed() {
    let attrs = replace(valid_attributes(), urns::INSTANCE_MESHES, &ints_le(&[-1, 1]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    geometry.validate().unwrap();
}

#[test]
fn test_mesh_submesh_offset_out_of_range() {
    let attrs = replace(valid_attributes(), urns::MESH_SUBMESH_OFFSETS, &ints_le(&[0, 5]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::MeshSubmeshOffsetOutOfRange {
            mesh: 1,
            offset: 5,
            submesh_count: 2
        }
    );
}

#[test]
fn test_mesh_submesh_offsets_out_of_sequence() {
    let attrs = replace(valid_attributes(), urns::MESH_SUBMESH_OFFSETS, &ints_le(&[0, 0]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::MeshSubmeshOffsetOutOfSequence { mesh: 0 }
    );
}

#[test]
fn test_mismatched_submesh_buffers() {
    let attrs = replace(valid_attributes(), urns::SUBMESH_MATERIALS, &ints_le(&[0]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::MismatchedSubmeshBuffers {
            offsets: 2,
            materials: 1
        }
    );
}

#[test]
fn test_submesh_index_offset_not_divisible_by_three() {
    let attrs = replace(valid_attributes(), urns::SUBMESH_INDEX_OFFSETS, &ints_le(&[0, 4]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    // The misalignment is the specific failure reported, nothing else.
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InvalidSubmeshIndexOffset {
            submesh: 1,
            offset: 4
        }
    );
}

#[test]
fn test_submesh_index_offset_out_of_range() {
    let attrs = replace(valid_attributes(), urns::SUBMESH_INDEX_OFFSETS, &ints_le(&[0, 9]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::SubmeshIndexOffsetOutOfRange {
            submesh: 1,
            offset: 9,
            index_count: 6
        }
    );
}

#[test]
fn test_submesh_index_offsets_out_of_sequence() {
    let attrs = replace(valid_attributes(), urns::SUBMESH_INDEX_OFFSETS, &ints_le(&[3, 3]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::SubmeshIndexOffsetOutOfSequence { submesh: 0 }
    );
}

#[test]
fn test_submesh_material_out_of_range() {
    let attrs = replace(valid_attributes(), urns::SUBMESH_MATERIALS, &ints_le(&[0, 7]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::SubmeshMaterialOutOfRange {
            submesh: 1,
            material: 7,
            material_count: 1
        }
    );
}

#[test]
fn test_material_colors_not_divisible_by_four() {
    let attrs = replace(valid_attributes(), urns::MATERIAL_COLORS, &floats_le(&[0.5; 7]));
    let geometry = Geometry::from_attributes(&attrs).unwrap();
    assert_eq!(
        geometry.validate().unwrap_err(),
        ValidationError::InvalidMaterialColors { len: 7 }
    );
}
