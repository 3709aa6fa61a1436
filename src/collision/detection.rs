use super::manifold::{CollisionManifold, ContactPoint};
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

// Reference-face selection bias, so the choice does not flip between
// nearly equal faces from one step to the next.
const RELATIVE_TOLERANCE: f64 = 0.98;
const ABSOLUTE_TOLERANCE: f64 = 0.001;

/// Narrow-phase test between two bodies. Returns a manifold with the normal
/// pointing from `body_a` to `body_b`, or `None` when they are separated.
pub fn check_collision(
    body_a: &RigidBody,
    body_a_idx: usize,
    body_b: &RigidBody,
    body_b_idx: usize,
) -> Option<CollisionManifold> {
    if !body_a.calculate_aabb().overlaps(&body_b.calculate_aabb()) {
        return None;
    }
    let hull_a = body_a.world_hull()?;
    let hull_b = body_b.world_hull()?;
    let (normal, depth, contact) = collide_convex(&hull_a, &hull_b)?;
    Some(CollisionManifold {
        body_a_idx,
        body_b_idx,
        normal,
        depth,
        contact,
    })
}

/// Outward unit normals of a convex polygon, one per edge `i -> i+1`.
/// Works for either winding by orienting each normal away from the vertex mean.
pub fn outward_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    let n = vertices.len();
    let center = vertices.iter().fold(Vec2::ZERO, |acc, v| acc + *v) / n as f64;
    (0..n)
        .map(|i| {
            let v1 = vertices[i];
            let v2 = vertices[(i + 1) % n];
            let normal = (v2 - v1).perpendicular().normalize();
            if normal.dot(v1 - center) < 0.0 {
                -normal
            } else {
                normal
            }
        })
        .collect()
}

/// Deepest signed distance of `other` behind any face of `poly`.
/// Positive means a separating axis exists. Returns `(face_index, separation)`.
fn find_max_separation(poly: &[Vec2], normals: &[Vec2], other: &[Vec2]) -> (usize, f64) {
    let mut best_index = 0;
    let mut max_separation = f64::NEG_INFINITY;
    for (i, normal) in normals.iter().enumerate() {
        let support = other
            .iter()
            .map(|v| normal.dot(*v - poly[i]))
            .fold(f64::INFINITY, f64::min);
        if support > max_separation {
            max_separation = support;
            best_index = i;
        }
    }
    (best_index, max_separation)
}

/// Edge of `incident` whose normal is most anti-parallel to `reference_normal`.
fn find_incident_edge(incident: &[Vec2], incident_normals: &[Vec2], reference_normal: Vec2) -> [Vec2; 2] {
    let mut index = 0;
    let mut min_dot = f64::INFINITY;
    for (i, normal) in incident_normals.iter().enumerate() {
        let d = normal.dot(reference_normal);
        if d < min_dot {
            min_dot = d;
            index = i;
        }
    }
    [incident[index], incident[(index + 1) % incident.len()]]
}

/// Keeps the part of a point or segment where `normal . p <= offset`.
fn clip_to_half_plane(points: &[Vec2], normal: Vec2, offset: f64) -> Vec<Vec2> {
    let distances: Vec<f64> = points.iter().map(|p| normal.dot(*p) - offset).collect();
    let mut out: Vec<Vec2> = points
        .iter()
        .zip(&distances)
        .filter(|(_, d)| **d <= 0.0)
        .map(|(p, _)| *p)
        .collect();
    if let ([p0, p1], [d0, d1]) = (points, distances.as_slice()) {
        if d0 * d1 < 0.0 {
            out.push(*p0 + (*p1 - *p0) * (d0 / (d0 - d1)));
        }
    }
    out
}

/// SAT test with reference-face clipping between two convex hulls.
/// Returns `(normal A->B, depth, contact)`.
fn collide_convex(hull_a: &[Vec2], hull_b: &[Vec2]) -> Option<(Vec2, f64, ContactPoint)> {
    let normals_a = outward_normals(hull_a);
    let normals_b = outward_normals(hull_b);

    let (face_a, separation_a) = find_max_separation(hull_a, &normals_a, hull_b);
    if separation_a > 0.0 {
        return None;
    }
    let (face_b, separation_b) = find_max_separation(hull_b, &normals_b, hull_a);
    if separation_b > 0.0 {
        return None;
    }

    // Pick the reference face from the shape with the shallower penetration.
    let flip = separation_b > RELATIVE_TOLERANCE * separation_a + ABSOLUTE_TOLERANCE;
    let (reference, reference_normals, face, incident, incident_normals) = if flip {
        (hull_b, &normals_b, face_b, hull_a, &normals_a)
    } else {
        (hull_a, &normals_a, face_a, hull_b, &normals_b)
    };

    let ref_v1 = reference[face];
    let ref_v2 = reference[(face + 1) % reference.len()];
    let ref_normal = reference_normals[face];
    let tangent = (ref_v2 - ref_v1).normalize();

    let incident_edge = find_incident_edge(incident, incident_normals, ref_normal);

    // Clip the incident edge to the side planes of the reference face.
    let clipped = clip_to_half_plane(&incident_edge, -tangent, -tangent.dot(ref_v1));
    let clipped = clip_to_half_plane(&clipped, tangent, tangent.dot(ref_v2));

    // Keep the clipped points that lie behind the reference face.
    let mut depth: f64 = 0.0;
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for point in &clipped {
        let separation = ref_normal.dot(*point - ref_v1);
        if separation <= 0.0 {
            depth = depth.max(-separation);
            sum += *point;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }

    // Incident points sit on the incident surface; lift them onto the reference face.
    let on_incident = sum / count as f64;
    let on_reference = on_incident + ref_normal * depth;
    let (normal, contact) = if flip {
        (-ref_normal, ContactPoint { point_a: on_incident, point_b: on_reference })
    } else {
        (ref_normal, ContactPoint { point_a: on_reference, point_b: on_incident })
    };
    Some((normal, depth, contact))
}
