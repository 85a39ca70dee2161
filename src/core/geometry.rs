use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

use super::constants::{
    CONNECTION_KEEP_PROBABILITY, CONNECTION_X_BAND, REGION_LEFT, REGION_LEFT_MAX_X, REGION_MID,
    REGION_RIGHT, REGION_RIGHT_MIN_X,
};

/// CPU-side triangle mesh with the per-vertex "region" attribute the brain
/// material shades by.
#[derive(Clone, Debug, Default)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub regions: Vec<f32>,
    pub indices: Vec<u32>,
}

/// A straight segment between two sampled vertices.
pub type LineSegment = [[f32; 3]; 2];

/// Bucket a vertex into the left / mid / right zone by its x coordinate.
#[inline]
pub fn region_for_x(x: f32) -> f32 {
    if x < REGION_LEFT_MAX_X {
        REGION_LEFT
    } else if x > REGION_RIGHT_MIN_X {
        REGION_RIGHT
    } else {
        REGION_MID
    }
}

pub fn compute_regions(positions: &[[f32; 3]]) -> Vec<f32> {
    positions.iter().map(|p| region_for_x(p[0])).collect()
}

/// Area-weighted smooth normals from indexed triangles.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if ia >= positions.len() || ib >= positions.len() || ic >= positions.len() {
            continue;
        }
        let a = Vec3::from(positions[ia]);
        let b = Vec3::from(positions[ib]);
        let c = Vec3::from(positions[ic]);
        let n = (b - a).cross(c - a);
        acc[ia] += n;
        acc[ib] += n;
        acc[ic] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

impl MeshGeometry {
    /// Build from raw attributes, filling in whatever is missing: sequential
    /// indices, smooth normals, and the region attribute.
    pub fn from_parts(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => compute_vertex_normals(&positions, &indices),
        };
        let regions = compute_regions(&positions);
        Self {
            positions,
            normals,
            regions,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from(*p) + offset).to_array();
        }
        self.regions = compute_regions(&self.positions);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        let rot = |v: [f32; 3]| [v[0] * c - v[1] * s, v[0] * s + v[1] * c, v[2]];
        for p in &mut self.positions {
            *p = rot(*p);
        }
        for n in &mut self.normals {
            *n = rot(*n);
        }
        self.regions = compute_regions(&self.positions);
    }

    /// Partial UV sphere spanning `phi_length` radians of longitude starting at
    /// `phi_start`; full latitude range.
    pub fn sphere_segment(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
    ) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);
        let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
        let mut normals = Vec::with_capacity(positions.capacity());
        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            let theta = v * PI;
            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let phi = phi_start + u * phi_length;
                let p = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                positions.push(p.to_array());
                normals.push(p.normalize_or_zero().to_array());
            }
        }
        let row = w + 1;
        let mut indices = Vec::with_capacity((w * h * 6) as usize);
        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        let regions = compute_regions(&positions);
        Self {
            positions,
            normals,
            regions,
            indices,
        }
    }

    /// Capped cylinder along the Y axis, centred on the origin.
    pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let half = height * 0.5;
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        // Side wall: two rings
        for ring in 0..=1u32 {
            let y = half - ring as f32 * height;
            for x in 0..=radial {
                let theta = x as f32 / radial as f32 * 2.0 * PI;
                let (s, c) = theta.sin_cos();
                positions.push([radius * s, y, radius * c]);
                normals.push([s, 0.0, c]);
            }
        }
        let row = radial + 1;
        for x in 0..radial {
            let a = x;
            let b = row + x;
            let c = row + x + 1;
            let d = x + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        // Caps: one centre vertex per segment, then the rim ring
        for (y, ny) in [(half, 1.0_f32), (-half, -1.0_f32)] {
            let center_start = positions.len() as u32;
            for _ in 0..radial {
                positions.push([0.0, y, 0.0]);
                normals.push([0.0, ny, 0.0]);
            }
            let rim_start = positions.len() as u32;
            for x in 0..=radial {
                let theta = x as f32 / radial as f32 * 2.0 * PI;
                let (s, c) = theta.sin_cos();
                positions.push([radius * s, y, radius * c]);
                normals.push([0.0, ny, 0.0]);
            }
            for x in 0..radial {
                let c = center_start + x;
                let i = rim_start + x;
                if ny > 0.0 {
                    indices.extend_from_slice(&[i, i + 1, c]);
                } else {
                    indices.extend_from_slice(&[i + 1, i, c]);
                }
            }
        }

        let regions = compute_regions(&positions);
        Self {
            positions,
            normals,
            regions,
            indices,
        }
    }
}

/// Sample sparse "neural connection" segments: walk the vertices in order,
/// keep those close to the midline (|x| < band) with a small probability and
/// join each kept point to the next one.
pub fn neural_connections<R: Rng + ?Sized>(positions: &[[f32; 3]], rng: &mut R) -> Vec<LineSegment> {
    let picked: Vec<[f32; 3]> = positions
        .iter()
        .filter(|p| p[0].abs() < CONNECTION_X_BAND && rng.gen_bool(CONNECTION_KEEP_PROBABILITY))
        .copied()
        .collect();
    picked.windows(2).map(|w| [w[0], w[1]]).collect()
}
