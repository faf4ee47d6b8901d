//! Screen-to-world picking: pointer coordinates to normalized device
//! coordinates, rays through the camera and ray/sphere intersection.

use bevy::math::{Mat4, Vec2, Vec3};

/// Bounding rectangle of the pointer surface in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: size.x,
            height: size.y,
        }
    }
}

/// Map a client-space point to normalized device coordinates.
///
/// The top-left corner maps to `(-1, 1)` and the bottom-right to `(1, -1)`.
/// Returns `None` for a degenerate rectangle.
pub fn client_to_ndc(point: Vec2, rect: SurfaceRect) -> Option<Vec2> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let x = (point.x - rect.left) / rect.width * 2.0 - 1.0;
    let y = -((point.y - rect.top) / rect.height * 2.0 - 1.0);
    Some(Vec2::new(x, y))
}

/// A ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Build a ray, normalizing `direction`. `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first intersection with a sphere.
    ///
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// What a pickable mesh represents within a planet group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshTag {
    /// The planet body itself. Only these meshes take part in picking.
    Planet,
    Atmosphere,
    Ring,
}

/// World-space bounding sphere of a leaf mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickMesh {
    pub center: Vec3,
    pub radius: f32,
    pub tag: MeshTag,
}

impl PickMesh {
    pub fn planet(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            tag: MeshTag::Planet,
        }
    }
}

/// Nearest planet-tagged mesh hit by the ray, with its key and distance.
pub fn nearest_hit<K>(
    ray: &PickRay,
    candidates: impl IntoIterator<Item = (K, PickMesh)>,
) -> Option<(K, f32)> {
    candidates
        .into_iter()
        .filter(|(_, mesh)| mesh.tag == MeshTag::Planet)
        .filter_map(|(key, mesh)| {
            ray.intersect_sphere(mesh.center, mesh.radius)
                .map(|t| (key, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Camera that can cast a ray through a point in normalized device
/// coordinates.
pub trait CameraView: Send + Sync {
    fn ray_through(&self, ndc: Vec2) -> Option<PickRay>;
}

/// Camera described by its inverse view-projection.
///
/// Follows Bevy's reverse-Z convention: the near plane sits at NDC depth 1
/// and depth decreases towards the far plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionCamera {
    world_from_clip: Mat4,
}

impl ProjectionCamera {
    pub fn new(world_from_view: Mat4, clip_from_view: Mat4) -> Self {
        Self {
            world_from_clip: world_from_view * clip_from_view.inverse(),
        }
    }
}

impl CameraView for ProjectionCamera {
    fn ray_through(&self, ndc: Vec2) -> Option<PickRay> {
        let near = self.world_from_clip.project_point3(ndc.extend(1.0));
        let farther = self.world_from_clip.project_point3(ndc.extend(0.5));
        if !near.is_finite() || !farther.is_finite() {
            return None;
        }
        PickRay::new(near, farther - near)
    }
}
