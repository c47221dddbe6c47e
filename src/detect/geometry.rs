use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::components::MeshHandle;

/// Triangle mesh prepared for collision queries: face normals and
/// edge/vertex adjacency are computed once at build time. Face winding is
/// counter-clockwise seen from outside; normals follow `(b-a) x (c-a)`.
pub struct CollisionMesh {
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
    face_normals: Vec<Vec3>,
    /// Sorted vertex pair -> faces sharing that edge.
    edge_faces: HashMap<(usize, usize), Vec<usize>>,
    /// Vertex -> faces touching it.
    vertex_faces: HashMap<usize, Vec<usize>>,
}

impl CollisionMesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> Self {
        let mut face_normals = Vec::with_capacity(faces.len());
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        let mut vertex_faces: HashMap<usize, Vec<usize>> = HashMap::new();

        for (i, face) in faces.iter().enumerate() {
            let [a, b, c] = *face;
            let normal = (vertices[b] - vertices[a])
                .cross(vertices[c] - vertices[a])
                .normalize_or_zero();
            face_normals.push(normal);

            for (va, vb) in [(a, b), (b, c), (c, a)] {
                let key = if va < vb { (va, vb) } else { (vb, va) };
                edge_faces.entry(key).or_default().push(i);
            }
            for v in [a, b, c] {
                vertex_faces.entry(v).or_default().push(i);
            }
        }

        Self {
            vertices,
            faces,
            face_normals,
            edge_faces,
            vertex_faces,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }
}

/// Owns the collision meshes referenced by `Shape::Mesh` handles.
#[derive(Default)]
pub struct MeshStore {
    meshes: Vec<CollisionMesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mesh: CollisionMesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&CollisionMesh> {
        self.meshes.get(handle.0)
    }
}

/// Which feature of a triangle the closest point landed on. Indices are
/// corner slots (0..3) of the queried triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TriRegion {
    Face,
    Edge(usize, usize),
    Vertex(usize),
}

/// Closest point on triangle `abc` to point `p`, with the feature region
/// it lies on (Ericson's barycentric region walk).
pub(crate) fn closest_point_on_triangle(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> (Vec3, TriRegion) {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, TriRegion::Vertex(0));
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, TriRegion::Vertex(1));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, TriRegion::Edge(0, 1));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, TriRegion::Vertex(2));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, TriRegion::Edge(0, 2));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, TriRegion::Edge(1, 2));
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a + ab * v + ac * w, TriRegion::Face)
}

/// Deepest contact between a world-space sphere and a transformed mesh.
/// Returns the contact normal (mesh toward sphere, from the stored face
/// normals) and the penetration depth, or `None` when clear.
///
/// Face contacts use the face normal directly; edge contacts average the
/// two adjacent face normals; vertex contacts average every face touching
/// the vertex.
pub(crate) fn sphere_mesh_contact(
    mesh: &CollisionMesh,
    transform: Mat4,
    center: Vec3,
    radius: f32,
) -> Option<(Vec3, f32)> {
    let verts: Vec<Vec3> = mesh
        .vertices
        .iter()
        .map(|v| transform.transform_point3(*v))
        .collect();

    let mut best: Option<(f32, usize, TriRegion)> = None;
    for (i, face) in mesh.faces.iter().enumerate() {
        let (closest, region) =
            closest_point_on_triangle(verts[face[0]], verts[face[1]], verts[face[2]], center);
        let dist = (center - closest).length();
        let depth = radius - dist;
        if depth > 0.0 {
            let deeper = best.map_or(true, |(d, _, _)| depth > d);
            if deeper {
                best = Some((depth, i, region));
            }
        }
    }

    let (depth, face_idx, region) = best?;
    let face = mesh.faces[face_idx];
    let world_normal = |i: usize| transform.transform_vector3(mesh.face_normals[i]);

    let normal = match region {
        TriRegion::Face => world_normal(face_idx),
        TriRegion::Edge(s0, s1) => {
            let (va, vb) = (face[s0], face[s1]);
            let key = if va < vb { (va, vb) } else { (vb, va) };
            let adjacent = &mesh.edge_faces[&key];
            debug_assert!(
                adjacent.len() >= 2,
                "edge contact expects two adjacent faces"
            );
            adjacent
                .iter()
                .fold(Vec3::ZERO, |acc, &f| acc + world_normal(f))
        }
        TriRegion::Vertex(s) => {
            let touching = &mesh.vertex_faces[&face[s]];
            touching
                .iter()
                .fold(Vec3::ZERO, |acc, &f| acc + world_normal(f))
        }
    };

    let normal = normal.normalize_or_zero();
    Some((normal, depth))
}

/// Contact between a world-space sphere and an axis-aligned box. Returns
/// the normal (box toward sphere) and penetration depth.
pub(crate) fn sphere_aabb_contact(
    box_center: Vec3,
    half_extents: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<(Vec3, f32)> {
    let local = center - box_center;
    let clamped = local.clamp(-half_extents, half_extents);

    if local != clamped {
        // Sphere center outside the box: measure to the surface point.
        let diff = local - clamped;
        let dist = diff.length();
        let depth = radius - dist;
        if depth <= 0.0 {
            return None;
        }
        return Some((diff / dist, depth));
    }

    // Center inside the box: push out through the nearest face.
    let face_dist = half_extents - local.abs();
    let (axis_dist, normal) = if face_dist.x <= face_dist.y && face_dist.x <= face_dist.z {
        (face_dist.x, Vec3::X * signum_or_one(local.x))
    } else if face_dist.y <= face_dist.z {
        (face_dist.y, Vec3::Y * signum_or_one(local.y))
    } else {
        (face_dist.z, Vec3::Z * signum_or_one(local.z))
    };
    Some((normal, axis_dist + radius))
}

fn signum_or_one(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 quad floor on the XZ plane, normals facing +Y.
    fn floor_mesh() -> CollisionMesh {
        let vertices = vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 3, 2]];
        CollisionMesh::new(vertices, faces)
    }

    #[test]
    fn triangle_regions_classify_correctly() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 2.0);

        let (p, region) = closest_point_on_triangle(a, b, c, Vec3::new(0.5, 1.0, 0.5));
        assert_eq!(region, TriRegion::Face);
        assert!((p - Vec3::new(0.5, 0.0, 0.5)).length() < 1e-5);

        let (p, region) = closest_point_on_triangle(a, b, c, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(region, TriRegion::Vertex(0));
        assert_eq!(p, a);

        let (p, region) = closest_point_on_triangle(a, b, c, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(region, TriRegion::Edge(0, 1));
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn face_contact_uses_the_face_normal() {
        let mesh = floor_mesh();
        let (normal, depth) =
            sphere_mesh_contact(&mesh, Mat4::IDENTITY, Vec3::new(0.25, 0.3, -0.25), 0.5).unwrap();
        assert!((normal - Vec3::Y).length() < 1e-5);
        assert!((depth - 0.2).abs() < 1e-5);
    }

    #[test]
    fn edge_contact_averages_adjacent_face_normals() {
        let mesh = floor_mesh();
        // Above the shared diagonal between the two triangles.
        let (normal, _depth) =
            sphere_mesh_contact(&mesh, Mat4::IDENTITY, Vec3::new(0.5, 0.3, 0.5), 0.5).unwrap();
        // Both faces are coplanar, so the average is still straight up.
        assert!((normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn clear_sphere_reports_nothing() {
        let mesh = floor_mesh();
        assert!(sphere_mesh_contact(&mesh, Mat4::IDENTITY, Vec3::new(0.0, 2.0, 0.0), 0.5).is_none());
    }

    #[test]
    fn mesh_transform_is_honoured() {
        let mesh = floor_mesh();
        let raised = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));
        assert!(sphere_mesh_contact(&mesh, raised, Vec3::new(0.0, 0.5, 0.0), 0.4).is_none());
        let (normal, depth) =
            sphere_mesh_contact(&mesh, raised, Vec3::new(0.0, 3.3, 0.0), 0.5).unwrap();
        assert!((normal - Vec3::Y).length() < 1e-5);
        assert!((depth - 0.2).abs() < 1e-5);
    }

    #[test]
    fn aabb_contact_from_outside_and_inside() {
        // Outside: sphere right of a unit box.
        let (normal, depth) =
            sphere_aabb_contact(Vec3::ZERO, Vec3::ONE, Vec3::new(1.3, 0.0, 0.0), 0.5).unwrap();
        assert_eq!(normal, Vec3::X);
        assert!((depth - 0.2).abs() < 1e-5);

        // Inside: nearest face is +X.
        let (normal, depth) =
            sphere_aabb_contact(Vec3::ZERO, Vec3::ONE, Vec3::new(0.8, 0.1, 0.0), 0.25).unwrap();
        assert_eq!(normal, Vec3::X);
        assert!((depth - 0.45).abs() < 1e-5);

        // Clear.
        assert!(sphere_aabb_contact(Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 0.0, 0.0), 0.5).is_none());
    }

    #[test]
    fn mesh_store_hands_out_stable_handles() {
        let mut store = MeshStore::new();
        let h = store.add(floor_mesh());
        assert!(store.get(h).is_some());
        assert_eq!(store.get(h).unwrap().faces().len(), 2);
    }
}
