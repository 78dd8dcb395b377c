//! The G3D geometry model
//!
//! [`Geometry`] aggregates the well-known G3D attribute buffers into one
//! read-only model and derives the structure the flat arrays only imply:
//! per-mesh vertex offsets, mesh-local (rebased) indices, instance-to-mesh
//! groupings, and per-mesh transparency. The format itself never guarantees
//! the internal consistency of the arrays; [`Geometry::validate`] checks it
//! explicitly.
//!
//! The mesh/submesh/instance hierarchy is encoded as offset arrays: an
//! offset array `O` of length `n` over a space of total size `T` gives
//! element `k` the range `[O[k], O[k+1])`, with the last range ending at
//! `T`. Mesh vertex ranges follow the same convention over the computed
//! vertex offsets.

use rayon::prelude::*;

use crate::attribute::Attribute;
use crate::bfast::Bfast;
use crate::error::{Error, Result, ValidationError};

/// Well-known attribute URNs consumed by [`Geometry`]
pub mod urns {
    /// Vertex positions, flat xyz triples
    pub const POSITIONS: &str = "g3d:vertex:position:0:float32:3";
    /// Triangle corner indices into the position buffer
    pub const INDICES: &str = "g3d:corner:index:0:int32:1";
    /// Per-instance mesh reference, negative meaning unassigned
    pub const INSTANCE_MESHES: &str = "g3d:instance:mesh:0:int32:1";
    /// Per-instance 4x4 transform, 16 floats each
    pub const INSTANCE_TRANSFORMS: &str = "g3d:instance:transform:0:float32:16";
    /// Per-mesh starting submesh index
    pub const MESH_SUBMESH_OFFSETS: &str = "g3d:mesh:submeshoffset:0:int32:1";
    /// Per-submesh starting index into the index buffer
    pub const SUBMESH_INDEX_OFFSETS: &str = "g3d:submesh:indexoffset:0:int32:1";
    /// Per-submesh material reference, -1 meaning no material
    pub const SUBMESH_MATERIALS: &str = "g3d:submesh:material:0:int32:1";
    /// Material colors, flat RGBA quadruples
    pub const MATERIAL_COLORS: &str = "g3d:material:color:0:float32:4";

    /// All well-known URNs, in binding order
    pub const ALL: [&str; 8] = [
        POSITIONS,
        INDICES,
        INSTANCE_MESHES,
        INSTANCE_TRANSFORMS,
        MESH_SUBMESH_OFFSETS,
        SUBMESH_INDEX_OFFSETS,
        SUBMESH_MATERIALS,
        MATERIAL_COLORS,
    ];
}

/// Scalars per vertex position
pub const POSITION_SIZE: usize = 3;
/// Scalars per material color
pub const COLOR_SIZE: usize = 4;
/// Scalars per instance transform
pub const MATRIX_SIZE: usize = 16;

/// Color used when a submesh has no material assignment
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// A decoded G3D geometry model
///
/// Built once from a snapshot of decoded attributes and read-only
/// thereafter. The index buffer is owned by the model and holds mesh-local
/// (rebased) indices; the raw decoded input is never aliased or mutated.
#[derive(Debug, Clone)]
pub struct Geometry {
    positions: Vec<f32>,
    indices: Vec<u32>,
    instance_meshes: Vec<i32>,
    instance_transforms: Vec<f32>,
    mesh_submesh_offsets: Vec<i32>,
    submesh_index_offsets: Vec<i32>,
    submesh_materials: Vec<i32>,
    material_colors: Vec<f32>,
    mesh_vertex_offsets: Vec<u32>,
    mesh_instances: Vec<Vec<u32>>,
    mesh_transparent: Vec<bool>,
}

fn find<'a>(attributes: &'a [Attribute], urn: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.descriptor.urn() == urn)
}

/// `start(k) = O[k]`, clamped to `[0, total]` so unvalidated offset data
/// cannot produce out-of-bounds ranges; `k` past the array yields `total`.
fn offset_start(offsets: &[i32], k: usize, total: usize) -> usize {
    offsets
        .get(k)
        .map_or(total, |&v| (v.max(0) as usize).min(total))
}

/// `end(k) = O[k + 1]` when present, else `total`, with the same clamping.
fn offset_end(offsets: &[i32], k: usize, total: usize) -> usize {
    if k + 1 < offsets.len() {
        (offsets[k + 1].max(0) as usize).min(total)
    } else {
        total
    }
}

impl Geometry {
    /// Build a model from a decoded container
    ///
    /// Binds the eight well-known attributes by exact URN; buffers under
    /// other names are ignored.
    ///
    /// # Errors
    ///
    /// Propagates attribute decode errors and construction errors from
    /// [`Geometry::from_attributes`].
    pub fn from_bfast(bfast: &Bfast<'_>) -> Result<Geometry> {
        let mut attributes = Vec::new();
        for urn in urns::ALL {
            if let Some(bytes) = bfast.buffer(urn) {
                attributes.push(Attribute::new(urn, bytes)?);
            }
        }
        Geometry::from_attributes(&attributes)
    }

    /// Build a model from decoded attributes
    ///
    /// Positions and indices are required; the two offset arrays default to
    /// `[0]` (the whole buffer as one mesh with one submesh) and the
    /// remaining optional attributes default to empty. Derived structures
    /// are computed eagerly: mesh vertex offsets, rebased indices, instance
    /// groups, and per-mesh transparency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredAttribute`] when positions or
    /// indices are absent.
    pub fn from_attributes(attributes: &[Attribute]) -> Result<Geometry> {
        let positions = find(attributes, urns::POSITIONS)
            .and_then(|a| a.data.as_f32())
            .ok_or(Error::MissingRequiredAttribute("positions"))?
            .to_vec();

        // Indices are stored signed but read as non-negative corner
        // references; the cast preserves the bit pattern.
        let indices: Vec<u32> = find(attributes, urns::INDICES)
            .and_then(|a| a.data.as_i32())
            .ok_or(Error::MissingRequiredAttribute("indices"))?
            .iter()
            .map(|&i| i as u32)
            .collect();

        let mesh_submesh_offsets = find(attributes, urns::MESH_SUBMESH_OFFSETS)
            .and_then(|a| a.data.as_i32())
            .map_or_else(|| vec![0], <[i32]>::to_vec);
        let submesh_index_offsets = find(attributes, urns::SUBMESH_INDEX_OFFSETS)
            .and_then(|a| a.data.as_i32())
            .map_or_else(|| vec![0], <[i32]>::to_vec);
        let submesh_materials = find(attributes, urns::SUBMESH_MATERIALS)
            .and_then(|a| a.data.as_i32())
            .map_or_else(Vec::new, <[i32]>::to_vec);
        let material_colors = find(attributes, urns::MATERIAL_COLORS)
            .and_then(|a| a.data.as_f32())
            .map_or_else(Vec::new, <[f32]>::to_vec);
        let instance_meshes = find(attributes, urns::INSTANCE_MESHES)
            .and_then(|a| a.data.as_i32())
            .map_or_else(Vec::new, <[i32]>::to_vec);
        let instance_transforms = find(attributes, urns::INSTANCE_TRANSFORMS)
            .and_then(|a| a.data.as_f32())
            .map_or_else(Vec::new, <[f32]>::to_vec);

        let mut geometry = Geometry {
            positions,
            indices,
            instance_meshes,
            instance_transforms,
            mesh_submesh_offsets,
            submesh_index_offsets,
            submesh_materials,
            material_colors,
            mesh_vertex_offsets: Vec::new(),
            mesh_instances: Vec::new(),
            mesh_transparent: Vec::new(),
        };
        geometry.mesh_vertex_offsets = geometry.compute_mesh_vertex_offsets();
        geometry.rebase_indices();
        geometry.mesh_instances = geometry.compute_mesh_instances();
        geometry.mesh_transparent = geometry.compute_mesh_transparent();
        Ok(geometry)
    }

    /// Index of the first vertex of each mesh
    ///
    /// The offset of a mesh is the minimum corner index in its index range.
    /// Single-mesh files are assumed pre-based and get offset 0 without
    /// scanning.
    fn compute_mesh_vertex_offsets(&self) -> Vec<u32> {
        let count = self.mesh_count();
        if count == 1 {
            return vec![0];
        }
        (0..count)
            .into_par_iter()
            .map(|mesh| {
                let start = self.mesh_index_start(mesh).min(self.indices.len());
                let end = self.mesh_index_end(mesh).min(self.indices.len()).max(start);
                self.indices[start..end].iter().copied().min().unwrap_or(0)
            })
            .collect()
    }

    /// Rewrite each mesh's indices relative to its own first vertex
    ///
    /// Only applies to models with more than one mesh; a single mesh keeps
    /// its indices untouched, matching the offset computation.
    fn rebase_indices(&mut self) {
        let count = self.mesh_count();
        if count <= 1 {
            return;
        }
        for mesh in 0..count {
            let offset = self.mesh_vertex_offsets[mesh];
            if offset == 0 {
                continue;
            }
            let start = self.mesh_index_start(mesh).min(self.indices.len());
            let end = self.mesh_index_end(mesh).min(self.indices.len()).max(start);
            for index in &mut self.indices[start..end] {
                *index -= offset;
            }
        }
    }

    /// Group instances under the mesh they reference, in instance order
    fn compute_mesh_instances(&self) -> Vec<Vec<u32>> {
        let mut groups = vec![Vec::new(); self.mesh_count()];
        for (instance, &mesh) in self.instance_meshes.iter().enumerate() {
            if mesh < 0 {
                continue;
            }
            match groups.get_mut(mesh as usize) {
                Some(group) => group.push(instance as u32),
                None => {
                    log::warn!("instance {instance} references mesh {mesh}, which does not exist");
                }
            }
        }
        groups
    }

    /// A mesh is transparent when any of its submeshes resolves to a color
    /// with alpha below 1
    fn compute_mesh_transparent(&self) -> Vec<bool> {
        (0..self.mesh_count())
            .into_par_iter()
            .map(|mesh| {
                (self.mesh_submesh_start(mesh)..self.mesh_submesh_end(mesh))
                    .any(|submesh| self.submesh_color(submesh)[3] < 1.0)
            })
            .collect()
    }

    /// Check every structural invariant of the model
    ///
    /// Not run implicitly by construction. Returns the first violation
    /// found: buffer divisibility, index bounds, instance/transform parity,
    /// offset monotonicity and ranges, and material references.
    ///
    /// # Errors
    ///
    /// The specific [`ValidationError`] for the first violated invariant.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        crate::validator::validate_geometry(self)
    }

    // ------------- whole model -----------------

    /// Number of vertices in the position buffer
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_SIZE
    }

    /// Flat xyz position scalars
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Corner indices, mesh-local after construction
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    // ------------- meshes -----------------

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        self.mesh_submesh_offsets.len()
    }

    /// First index of a mesh's range in the index buffer
    pub fn mesh_index_start(&self, mesh: usize) -> usize {
        self.submesh_index_start(self.mesh_submesh_start(mesh))
    }

    /// One past the last index of a mesh's range in the index buffer
    pub fn mesh_index_end(&self, mesh: usize) -> usize {
        let last = self.mesh_submesh_end(mesh);
        if last == 0 {
            return self.mesh_index_start(mesh);
        }
        self.submesh_index_end(last - 1)
    }

    /// Number of corner indices in a mesh
    pub fn mesh_index_count(&self, mesh: usize) -> usize {
        self.mesh_index_end(mesh)
            .saturating_sub(self.mesh_index_start(mesh))
    }

    /// First vertex of a mesh
    pub fn mesh_vertex_start(&self, mesh: usize) -> usize {
        self.mesh_vertex_offsets
            .get(mesh)
            .map_or(self.vertex_count(), |&v| v as usize)
    }

    /// One past the last vertex of a mesh
    pub fn mesh_vertex_end(&self, mesh: usize) -> usize {
        if mesh + 1 < self.mesh_vertex_offsets.len() {
            self.mesh_vertex_offsets[mesh + 1] as usize
        } else {
            self.vertex_count()
        }
    }

    /// Number of vertices in a mesh
    pub fn mesh_vertex_count(&self, mesh: usize) -> usize {
        self.mesh_vertex_end(mesh)
            .saturating_sub(self.mesh_vertex_start(mesh))
    }

    /// First submesh of a mesh
    pub fn mesh_submesh_start(&self, mesh: usize) -> usize {
        offset_start(&self.mesh_submesh_offsets, mesh, self.submesh_count())
    }

    /// One past the last submesh of a mesh
    pub fn mesh_submesh_end(&self, mesh: usize) -> usize {
        offset_end(&self.mesh_submesh_offsets, mesh, self.submesh_count())
    }

    /// Number of submeshes in a mesh
    pub fn mesh_submesh_count(&self, mesh: usize) -> usize {
        self.mesh_submesh_end(mesh)
            .saturating_sub(self.mesh_submesh_start(mesh))
    }

    /// Instances referencing a mesh, in ascending instance order
    pub fn mesh_instances(&self, mesh: usize) -> &[u32] {
        self.mesh_instances.get(mesh).map_or(&[], Vec::as_slice)
    }

    /// Whether any submesh of a mesh resolves to a transparent color
    pub fn mesh_transparent(&self, mesh: usize) -> bool {
        self.mesh_transparent.get(mesh).copied().unwrap_or(false)
    }

    /// Computed first-vertex offsets, one per mesh, ascending
    pub fn mesh_vertex_offsets(&self) -> &[u32] {
        &self.mesh_vertex_offsets
    }

    // ------------- submeshes -----------------

    /// Number of submeshes
    pub fn submesh_count(&self) -> usize {
        self.submesh_index_offsets.len()
    }

    /// First index of a submesh's range in the index buffer
    pub fn submesh_index_start(&self, submesh: usize) -> usize {
        offset_start(&self.submesh_index_offsets, submesh, self.indices.len())
    }

    /// One past the last index of a submesh's range in the index buffer
    pub fn submesh_index_end(&self, submesh: usize) -> usize {
        offset_end(&self.submesh_index_offsets, submesh, self.indices.len())
    }

    /// Number of corner indices in a submesh
    pub fn submesh_index_count(&self, submesh: usize) -> usize {
        self.submesh_index_end(submesh)
            .saturating_sub(self.submesh_index_start(submesh))
    }

    /// Resolved RGBA color of a submesh
    ///
    /// Resolves through the submesh's material assignment; a submesh with
    /// no assignment, or a model with no material table, yields
    /// [`DEFAULT_COLOR`].
    pub fn submesh_color(&self, submesh: usize) -> [f32; 4] {
        match self.submesh_materials.get(submesh) {
            Some(&material) => self.material_color(material),
            None => DEFAULT_COLOR,
        }
    }

    // ------------- instances -----------------

    /// Number of instances
    pub fn instance_count(&self) -> usize {
        self.instance_meshes.len()
    }

    /// A 16-float view of one instance's 4x4 transform
    ///
    /// `None` when the transform buffer does not cover the instance.
    pub fn instance_transform(&self, instance: usize) -> Option<&[f32]> {
        let base = instance * MATRIX_SIZE;
        self.instance_transforms.get(base..base + MATRIX_SIZE)
    }

    // ------------- materials -----------------

    /// Number of materials in the color table
    pub fn material_count(&self) -> usize {
        self.material_colors.len() / COLOR_SIZE
    }

    /// RGBA color of a material
    ///
    /// A negative material index means "no material" and yields
    /// [`DEFAULT_COLOR`], as does an index past the color table.
    pub fn material_color(&self, material: i32) -> [f32; 4] {
        if material < 0 {
            return DEFAULT_COLOR;
        }
        let base = material as usize * COLOR_SIZE;
        match self.material_colors.get(base..base + COLOR_SIZE) {
            Some(color) => [color[0], color[1], color[2], color[3]],
            None => DEFAULT_COLOR,
        }
    }

    // ------------- raw buffers -----------------

    /// Per-instance mesh references, as stored
    pub fn instance_meshes(&self) -> &[i32] {
        &self.instance_meshes
    }

    /// Flat per-instance transform scalars, as stored
    pub fn instance_transforms(&self) -> &[f32] {
        &self.instance_transforms
    }

    /// Per-mesh submesh offsets, as stored
    pub fn mesh_submesh_offsets(&self) -> &[i32] {
        &self.mesh_submesh_offsets
    }

    /// Per-submesh index offsets, as stored
    pub fn submesh_index_offsets(&self) -> &[i32] {
        &self.submesh_index_offsets
    }

    /// Per-submesh material references, as stored
    pub fn submesh_materials(&self) -> &[i32] {
        &self.submesh_materials
    }

    /// Flat RGBA material color scalars, as stored
    pub fn material_colors(&self) -> &[f32] {
        &self.material_colors
    }
}
