use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use thiserror::Error;

use super::constants::{
    CORPUS_LENGTH, CORPUS_RADIUS, CORPUS_SEGMENTS, HEMISPHERE_OFFSET_X, HEMISPHERE_RADIUS,
    HEMISPHERE_SEGMENTS,
};
use super::geometry::{neural_connections, LineSegment, MeshGeometry};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("invalid glTF: {0}")]
    Parse(#[from] gltf::Error),
    #[error("no mesh geometry in asset")]
    NoGeometry,
    #[error("mesh has no readable positions")]
    NoPositions,
    #[error("malformed Draco primitive: {0}")]
    Draco(String),
    #[error("asset is Draco-compressed but no decoder is available")]
    NoDecoder,
}

/// glTF extension storing a primitive as one Draco-compressed buffer view.
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// A compressed primitive lifted out of a glb: the encoded bytes plus the
/// Draco unique ids of the attributes inside them.
#[derive(Clone, Debug, PartialEq)]
pub struct DracoPrimitive {
    pub data: Vec<u8>,
    pub position_id: u32,
    pub normal_id: Option<u32>,
}

/// Decoded Draco mesh, de-indexed into plain arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
}

/// Turns compressed primitive data back into vertex arrays.
pub trait MeshDecoder {
    fn decode(&self, primitive: &DracoPrimitive) -> Result<DecodedMesh, ModelError>;
}

/// Parsed glb contents, before any decompression.
#[derive(Clone, Debug)]
pub enum ModelAsset {
    Mesh(MeshGeometry),
    Draco(DracoPrimitive),
}

impl ModelAsset {
    pub fn is_compressed(&self) -> bool {
        matches!(self, ModelAsset::Draco(_))
    }

    /// Final geometry, running `decoder` on compressed primitives.
    pub fn into_geometry(
        self,
        decoder: Option<&dyn MeshDecoder>,
    ) -> Result<MeshGeometry, ModelError> {
        match self {
            ModelAsset::Mesh(geometry) => Ok(geometry),
            ModelAsset::Draco(primitive) => {
                let decoded = decoder.ok_or(ModelError::NoDecoder)?.decode(&primitive)?;
                if decoded.positions.is_empty() {
                    return Err(ModelError::NoPositions);
                }
                let indices = Some(decoded.indices).filter(|i| !i.is_empty());
                Ok(MeshGeometry::from_parts(
                    decoded.positions,
                    decoded.normals,
                    indices,
                ))
            }
        }
    }
}

/// One renderable piece of the brain, all sharing the brain material.
#[derive(Clone, Debug)]
pub struct MeshPart {
    pub name: &'static str,
    pub geometry: MeshGeometry,
}

/// The brain as a group of parts plus optional connection lines, all moved by
/// a single model transform.
#[derive(Clone, Debug, Default)]
pub struct BrainModel {
    pub parts: Vec<MeshPart>,
    pub connections: Vec<LineSegment>,
}

impl BrainModel {
    pub fn geometry_count(&self) -> usize {
        self.parts.len() + usize::from(!self.connections.is_empty())
    }
}

/// Outcome of the asset load. Both variants carry a usable model.
#[derive(Clone, Debug)]
pub enum ModelOutcome {
    Loaded(BrainModel),
    Fallback(BrainModel),
}

impl ModelOutcome {
    pub fn model(&self) -> &BrainModel {
        match self {
            ModelOutcome::Loaded(m) | ModelOutcome::Fallback(m) => m,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ModelOutcome::Fallback(_))
    }
}

/// Find the first mesh primitive in binary glTF bytes. Draco primitives are
/// returned still compressed.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelAsset, ModelError> {
    // Validation rejects the required Draco extension, so look for it first
    let unchecked = gltf::Gltf::from_slice_without_validation(bytes)?;
    if let Some(primitive) = find_draco_primitive(&unchecked)? {
        return Ok(ModelAsset::Draco(primitive));
    }

    let gltf = gltf::Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref();
    let primitive = gltf
        .meshes()
        .flat_map(|m| m.primitives().collect::<Vec<_>>())
        .find(|p| p.get(&gltf::Semantic::Positions).is_some())
        .ok_or(ModelError::NoGeometry)?;
    let reader = primitive.reader(|buffer| match buffer.source() {
        gltf::buffer::Source::Bin => blob,
        gltf::buffer::Source::Uri(_) => None,
    });
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or(ModelError::NoPositions)?
        .collect();
    if positions.is_empty() {
        return Err(ModelError::NoPositions);
    }
    let normals = reader.read_normals().map(|n| n.collect::<Vec<_>>());
    let indices = reader
        .read_indices()
        .map(|i| i.into_u32().collect::<Vec<_>>());
    Ok(ModelAsset::Mesh(MeshGeometry::from_parts(positions, normals, indices)))
}

fn find_draco_primitive(gltf: &gltf::Gltf) -> Result<Option<DracoPrimitive>, ModelError> {
    let Some(ext) = gltf
        .meshes()
        .flat_map(|m| m.primitives().collect::<Vec<_>>())
        .find_map(|p| p.extension_value(DRACO_EXTENSION).cloned())
    else {
        return Ok(None);
    };
    let malformed = |what: &str| ModelError::Draco(what.to_string());

    let attribute_id = |name: &str| {
        ext.get("attributes")
            .and_then(|a| a.get(name))
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
    };
    let position_id = attribute_id("POSITION").ok_or_else(|| malformed("no POSITION attribute"))?;
    let view_index = ext
        .get("bufferView")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| malformed("no bufferView"))?;
    let view = usize::try_from(view_index)
        .ok()
        .and_then(|i| gltf.views().nth(i))
        .ok_or_else(|| malformed("unknown bufferView"))?;
    let blob = match view.buffer().source() {
        gltf::buffer::Source::Bin => gltf.blob.as_deref(),
        gltf::buffer::Source::Uri(_) => None,
    }
    .ok_or_else(|| malformed("bufferView is not in the BIN chunk"))?;
    let data = view
        .offset()
        .checked_add(view.length())
        .and_then(|end| blob.get(view.offset()..end))
        .ok_or_else(|| malformed("bufferView out of range"))?;

    Ok(Some(DracoPrimitive {
        data: data.to_vec(),
        position_id,
        normal_id: attribute_id("NORMAL"),
    }))
}

/// Two offset hemispheres joined by a cylindrical corpus.
pub fn procedural_brain() -> BrainModel {
    let mut left = MeshGeometry::sphere_segment(
        HEMISPHERE_RADIUS,
        HEMISPHERE_SEGMENTS,
        HEMISPHERE_SEGMENTS,
        0.0,
        PI,
    );
    left.translate(Vec3::new(-HEMISPHERE_OFFSET_X, 0.0, 0.0));
    let mut right = MeshGeometry::sphere_segment(
        HEMISPHERE_RADIUS,
        HEMISPHERE_SEGMENTS,
        HEMISPHERE_SEGMENTS,
        PI,
        PI,
    );
    right.translate(Vec3::new(HEMISPHERE_OFFSET_X, 0.0, 0.0));
    let mut corpus = MeshGeometry::cylinder(CORPUS_RADIUS, CORPUS_LENGTH, CORPUS_SEGMENTS);
    corpus.rotate_z(PI / 2.0);
    BrainModel {
        parts: vec![
            MeshPart {
                name: "left-hemisphere",
                geometry: left,
            },
            MeshPart {
                name: "right-hemisphere",
                geometry: right,
            },
            MeshPart {
                name: "corpus",
                geometry: corpus,
            },
        ],
        connections: Vec::new(),
    }
}

/// Turn the load result into a model. Any failure is logged and replaced by
/// the procedural brain; this never errors.
pub fn resolve_model<R: Rng + ?Sized>(
    geometry: Result<MeshGeometry, ModelError>,
    rng: &mut R,
) -> ModelOutcome {
    match geometry {
        Ok(geometry) => {
            let connections = neural_connections(&geometry.positions, rng);
            log::info!(
                "[model] loaded brain: {} vertices, {} connections",
                geometry.vertex_count(),
                connections.len()
            );
            ModelOutcome::Loaded(BrainModel {
                parts: vec![MeshPart {
                    name: "brain",
                    geometry,
                }],
                connections,
            })
        }
        Err(e) => {
            log::error!("[model] error loading brain model: {}", e);
            let model = procedural_brain();
            log::info!("[model] procedural fallback with {} parts", model.parts.len());
            ModelOutcome::Fallback(model)
        }
    }
}
