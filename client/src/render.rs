//! Software rendering pipeline.
//!
//! Pure geometry stages (camera-space transform, depth sort, backface cull,
//! near-plane clip, perspective projection, flat shading) produce
//! screen-space polygons; only [`draw_scene`] touches the window. The view
//! transform is a two-step yaw-then-pitch rotation with a 90 degree yaw
//! offset rather than an orthonormal basis rebuild; the rendered look
//! depends on that exact composition, so it must not be "corrected".

use crate::camera::Camera;
use macroquad::prelude::{draw_line, draw_triangle, vec2, Color, BLACK};
use shared::world::CUBOID_FACES;
use shared::{Cuboid, Rgb, Vec3, FOCAL_LENGTH, LIGHT_DIR, NEAR_CLIP_PLANE};

/// A face that survived the pipeline: screen-space points in draw order plus
/// the shaded fill color.
#[derive(Debug, Clone)]
pub struct RenderFace {
    pub points: Vec<(f32, f32)>,
    pub color: Rgb,
}

/// Transforms world-space points into camera space: translate by the camera
/// position, rotate by -(yaw + 90°) about the vertical axis, then by -pitch
/// applied to the yaw-rotated result.
pub fn world_to_camera(camera: &Camera, points: &[Vec3]) -> Vec<Vec3> {
    let rad_yaw = (-camera.yaw - 90.0).to_radians();
    let rad_pitch = (-camera.pitch).to_radians();
    let (cos_y, sin_y) = (rad_yaw.cos(), rad_yaw.sin());
    let (cos_p, sin_p) = (rad_pitch.cos(), rad_pitch.sin());

    points
        .iter()
        .map(|point| {
            let t = point.sub(&camera.position);
            let x_rot = t.x * cos_y - t.z * sin_y;
            let z_rot = t.x * sin_y + t.z * cos_y;
            let y_rot = t.y * cos_p - z_rot * sin_p;
            let z_final = t.y * sin_p + z_rot * cos_p;
            Vec3::new(x_rot, y_rot, z_final)
        })
        .collect()
}

/// Projects one camera-space point to screen coordinates. Points at or
/// behind the camera plane (z >= 0) have no projection.
pub fn project_point(point: Vec3, width: f32, height: f32) -> Option<(f32, f32)> {
    if point.z >= 0.0 {
        return None;
    }
    let factor = FOCAL_LENGTH / -point.z;
    Some((
        point.x * factor + width / 2.0,
        -point.y * factor + height / 2.0,
    ))
}

/// Clips a camera-space polygon against the near plane, edge by edge.
///
/// "In front" means z < [`NEAR_CLIP_PLANE`]. A polygon fully in front comes
/// back with its vertex count and cyclic order intact (rotated by one); one
/// fully behind comes back empty. Edges with no depth difference are skipped
/// rather than divided.
pub fn clip_near_plane(poly: &[Vec3]) -> Vec<Vec3> {
    let mut clipped = Vec::with_capacity(poly.len() + 1);
    for i in 0..poly.len() {
        let p1 = poly[i];
        let p2 = poly[(i + 1) % poly.len()];
        let p1_in = p1.z < NEAR_CLIP_PLANE;
        let p2_in = p2.z < NEAR_CLIP_PLANE;

        if p1_in && p2_in {
            clipped.push(p2);
        } else if p1_in || p2_in {
            if p2.z - p1.z == 0.0 {
                continue;
            }
            let t = (NEAR_CLIP_PLANE - p1.z) / (p2.z - p1.z);
            let intersection = Vec3::new(
                p1.x + t * (p2.x - p1.x),
                p1.y + t * (p2.y - p1.y),
                NEAR_CLIP_PLANE,
            );
            if p1_in {
                clipped.push(intersection);
            } else {
                clipped.push(intersection);
                clipped.push(p2);
            }
        }
    }
    clipped
}

/// Normal from the cross product of a face's first two edges.
pub fn face_normal(verts: &[Vec3]) -> Vec3 {
    verts[1].sub(&verts[0]).cross(&verts[2].sub(&verts[0]))
}

/// Backface test in camera space: a face whose normal points along its own
/// position vector looks away from the camera. This is a normal-dot-vertex
/// test, not a normal-dot-view-direction test.
pub fn is_backface(verts: &[Vec3]) -> bool {
    face_normal(verts).dot(&verts[0]) >= 0.0
}

struct PendingFace {
    depth: f32,
    verts: [Vec3; 4],
    color: Rgb,
}

/// Runs every pipeline stage except the raster: returns the faces to draw,
/// farthest first, already projected and shaded.
pub fn build_scene<'a, I>(camera: &Camera, objects: I, width: f32, height: f32) -> Vec<RenderFace>
where
    I: IntoIterator<Item = &'a Cuboid>,
{
    let mut faces: Vec<PendingFace> = Vec::new();
    for object in objects {
        let cam_verts = world_to_camera(camera, &object.world_vertices());
        for indices in CUBOID_FACES.iter() {
            let verts = [
                cam_verts[indices[0]],
                cam_verts[indices[1]],
                cam_verts[indices[2]],
                cam_verts[indices[3]],
            ];
            let depth = verts.iter().map(|v| v.z).fold(f32::INFINITY, f32::min);
            faces.push(PendingFace {
                depth,
                verts,
                color: object.color,
            });
        }
    }

    // Painter's algorithm: smaller (more negative) depth is farther and gets
    // drawn first. The sort is stable, so tied faces keep submission order.
    faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let mut scene = Vec::new();
    for face in &faces {
        if is_backface(&face.verts) {
            continue;
        }

        let clipped = clip_near_plane(&face.verts);
        if clipped.len() < 3 {
            continue;
        }

        let mut points = Vec::with_capacity(clipped.len());
        let mut behind = false;
        for v in &clipped {
            match project_point(*v, width, height) {
                Some(p) => points.push(p),
                None => {
                    behind = true;
                    break;
                }
            }
        }
        if behind {
            continue;
        }

        // Shading uses the unclipped face normal.
        let normal = face_normal(&face.verts);
        let magnitude = normal.magnitude();
        if magnitude == 0.0 {
            continue;
        }
        let intensity = normal.scale(1.0 / magnitude).dot(&LIGHT_DIR);
        let shade = intensity.max(0.1) * 0.7 + 0.3;

        scene.push(RenderFace {
            points,
            color: shade_color(face.color, shade),
        });
    }
    scene
}

fn shade_color(color: Rgb, shade: f32) -> Rgb {
    let apply = |c: u8| (c as f32 * shade).min(255.0) as u8;
    (apply(color.0), apply(color.1), apply(color.2))
}

/// Raster shell: fills each convex polygon as a triangle fan and strokes a
/// one-pixel dark outline, in the order [`build_scene`] produced.
pub fn draw_scene(faces: &[RenderFace]) {
    for face in faces {
        let fill = Color::from_rgba(face.color.0, face.color.1, face.color.2, 255);
        let first = vec2(face.points[0].0, face.points[0].1);
        for i in 1..face.points.len() - 1 {
            draw_triangle(
                first,
                vec2(face.points[i].0, face.points[i].1),
                vec2(face.points[i + 1].0, face.points[i + 1].1),
                fill,
            );
        }
        for i in 0..face.points.len() {
            let (x1, y1) = face.points[i];
            let (x2, y2) = face.points[(i + 1) % face.points.len()];
            draw_line(x1, y1, x2, y2, 1.0, BLACK);
        }
    }
}

/// Projects one world-space point through the same transform and projection
/// the scene uses, for overlay elements. `None` when behind the camera.
pub fn project_world_point(
    camera: &Camera,
    point: Vec3,
    width: f32,
    height: f32,
) -> Option<(f32, f32)> {
    let cam = world_to_camera(camera, std::slice::from_ref(&point));
    project_point(cam[0], width, height)
}
