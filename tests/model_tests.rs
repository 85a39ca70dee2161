// Host-side tests for model loading and the procedural fallback.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod geometry {
    include!("../src/core/geometry.rs");
}
mod model {
    include!("../src/core/model.rs");
}

use model::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;

/// Minimal binary glTF: one triangle, positions only, in the embedded BIN chunk.
fn triangle_glb(positions: [[f32; 3]; 3]) -> Vec<u8> {
    let mut bin: Vec<u8> = Vec::new();
    for p in positions {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    let json = format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"#,
            r#""buffers":[{{"byteLength":{len}}}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{len}}}],"#,
            r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","#,
            r#""min":[{},{},{}],"max":[{},{},{}]}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}}}}]}}]}}"#
        ),
        min[0],
        min[1],
        min[2],
        max[0],
        max[1],
        max[2],
        len = bin.len()
    );
    pack_glb(json, bin)
}

/// Header, JSON chunk and BIN chunk, each chunk padded to four bytes.
fn pack_glb(json: String, mut bin: Vec<u8>) -> Vec<u8> {
    let mut json = json.into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

/// A glb whose only primitive is stored with `KHR_draco_mesh_compression`.
/// The POSITION accessor has no buffer view; the data lives in the payload.
fn draco_glb(payload: &[u8]) -> Vec<u8> {
    let json = format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"#,
            r#""extensionsUsed":["KHR_draco_mesh_compression"],"#,
            r#""extensionsRequired":["KHR_draco_mesh_compression"],"#,
            r#""buffers":[{{"byteLength":{len}}}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{len}}}],"#,
            r#""accessors":["#,
            r#"{{"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
            r#"{{"componentType":5126,"count":3,"type":"VEC3"}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0,"NORMAL":1}},"#,
            r#""extensions":{{"KHR_draco_mesh_compression":"#,
            r#"{{"bufferView":0,"attributes":{{"POSITION":2,"NORMAL":5}}}}}}}}]}}]}}"#
        ),
        len = payload.len()
    );
    pack_glb(json, payload.to_vec())
}

fn mesh(asset: ModelAsset) -> geometry::MeshGeometry {
    match asset {
        ModelAsset::Mesh(g) => g,
        ModelAsset::Draco(p) => panic!("unexpected Draco primitive {:?}", p),
    }
}

/// Stands in for the page's Draco decoder and counts how often it is asked.
struct MockDecoder {
    calls: Cell<u32>,
    result: Result<DecodedMesh, String>,
}

impl MockDecoder {
    fn triangle() -> Self {
        Self {
            calls: Cell::new(0),
            result: Ok(DecodedMesh {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normals: Some(vec![[0.0, 0.0, 1.0]; 3]),
                indices: vec![0, 1, 2],
            }),
        }
    }

    fn failing() -> Self {
        Self {
            calls: Cell::new(0),
            result: Err("DecodeBufferToMesh failed".into()),
        }
    }
}

impl MeshDecoder for MockDecoder {
    fn decode(&self, _primitive: &DracoPrimitive) -> Result<DecodedMesh, ModelError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone().map_err(ModelError::Draco)
    }
}

#[test]
fn parses_positions_and_buckets_regions() {
    let glb = triangle_glb([[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]);
    let g = mesh(parse_glb(&glb).expect("valid glb"));
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.regions, vec![0.0, 1.0, 0.5]);
    assert_eq!(g.indices, vec![0, 1, 2]);
    assert_eq!(g.normals.len(), 3);
}

#[test]
fn asset_without_meshes_has_no_geometry() {
    let err = parse_glb(br#"{"asset":{"version":"2.0"}}"#).unwrap_err();
    assert!(matches!(err, ModelError::NoGeometry), "{:?}", err);
}

#[test]
fn garbage_bytes_are_a_parse_error() {
    let err = parse_glb(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
    assert!(matches!(err, ModelError::Parse(_)), "{:?}", err);
}

#[test]
fn loaded_outcome_wraps_single_mesh() {
    let glb = triangle_glb([[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]);
    let mut rng = StdRng::seed_from_u64(3);
    let geometry = parse_glb(&glb).and_then(|a| a.into_geometry(None));
    let outcome = resolve_model(geometry, &mut rng);
    assert!(!outcome.is_fallback());
    let model = outcome.model();
    assert_eq!(model.parts.len(), 1);
    assert_eq!(model.parts[0].geometry.vertex_count(), 3);
}

#[test]
fn fetch_failure_falls_back_to_three_primitives() {
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = resolve_model(Err(ModelError::Fetch("404".into())), &mut rng);
    assert!(outcome.is_fallback());
    let model = outcome.model();
    let names: Vec<&str> = model.parts.iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["left-hemisphere", "right-hemisphere", "corpus"]);
    assert!(model.connections.is_empty());
    assert_eq!(model.geometry_count(), 3);
    for part in &model.parts {
        assert!(part.geometry.vertex_count() > 0, "{} is empty", part.name);
        assert!(!part.geometry.indices.is_empty());
        assert_eq!(part.geometry.regions.len(), part.geometry.vertex_count());
    }
}

#[test]
fn malformed_asset_falls_back_too() {
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = resolve_model(parse_glb(b"not a model").map(mesh), &mut rng);
    assert!(outcome.is_fallback());
    assert_eq!(outcome.model().parts.len(), 3);
}

#[test]
fn fallback_hemispheres_sit_either_side_of_the_midline() {
    let model = procedural_brain();
    let mean_x = |part: &MeshPart| {
        let g = &part.geometry;
        g.positions.iter().map(|p| p[0]).sum::<f32>() / g.vertex_count() as f32
    };
    assert!((mean_x(&model.parts[0]) + 0.4).abs() < 1e-3);
    assert!((mean_x(&model.parts[1]) - 0.4).abs() < 1e-3);

    // Corpus lies along x after its quarter turn
    let corpus = &model.parts[2].geometry;
    let max_x = corpus.positions.iter().map(|p| p[0].abs()).fold(0.0, f32::max);
    assert!((max_x - 1.25).abs() < 1e-3);
}

#[test]
fn draco_primitive_is_lifted_out_compressed() {
    let payload = b"DRACO\x02\x02\x01compressed";
    let asset = parse_glb(&draco_glb(payload)).expect("draco glb parses");
    assert!(asset.is_compressed());
    let ModelAsset::Draco(primitive) = asset else {
        unreachable!()
    };
    assert_eq!(primitive.data, payload.to_vec());
    assert_eq!(primitive.position_id, 2);
    assert_eq!(primitive.normal_id, Some(5));
}

#[test]
fn draco_asset_goes_through_the_decoder() {
    let decoder = MockDecoder::triangle();
    let asset = parse_glb(&draco_glb(b"DRACOmesh")).expect("draco glb parses");
    let geometry = asset.into_geometry(Some(&decoder));
    assert_eq!(decoder.calls.get(), 1);

    let mut rng = StdRng::seed_from_u64(3);
    let outcome = resolve_model(geometry, &mut rng);
    assert!(!outcome.is_fallback());
    let g = &outcome.model().parts[0].geometry;
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.indices, vec![0, 1, 2]);
    assert_eq!(g.normals[0], [0.0, 0.0, 1.0]);
}

#[test]
fn plain_mesh_never_reaches_the_decoder() {
    let decoder = MockDecoder::triangle();
    let glb = triangle_glb([[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]);
    let asset = parse_glb(&glb).expect("valid glb");
    assert!(!asset.is_compressed());
    asset.into_geometry(Some(&decoder)).expect("plain mesh");
    assert_eq!(decoder.calls.get(), 0);
}

#[test]
fn draco_without_a_decoder_falls_back() {
    let geometry = parse_glb(&draco_glb(b"DRACOmesh")).and_then(|a| a.into_geometry(None));
    assert!(matches!(geometry, Err(ModelError::NoDecoder)), "{:?}", geometry);
    let mut rng = StdRng::seed_from_u64(3);
    assert!(resolve_model(geometry, &mut rng).is_fallback());
}

#[test]
fn decoder_failure_falls_back() {
    let decoder = MockDecoder::failing();
    let geometry = parse_glb(&draco_glb(b"DRACOmesh"))
        .and_then(|a| a.into_geometry(Some(&decoder)));
    assert!(matches!(geometry, Err(ModelError::Draco(_))), "{:?}", geometry);
    let mut rng = StdRng::seed_from_u64(3);
    assert!(resolve_model(geometry, &mut rng).is_fallback());
}
