use glam::{Affine3A, Mat3A, Vec3};

/// Build the rotation `Rx(rx) * Ry(ry) * Rz(rz)`, all angles in radians.
///
/// Applied to a column vector, Z acts first, then Y, then X.
pub fn rotation_from_euler(rx: f32, ry: f32, rz: f32) -> Mat3A {
    Mat3A::from_rotation_x(rx) * Mat3A::from_rotation_y(ry) * Mat3A::from_rotation_z(rz)
}

/// Unit normal of the triangle `(a, b, c)`, wound counter-clockwise.
/// Degenerate triangles give `Vec3::ZERO`.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Transform that maps a unit cube centred on the origin onto a thin box running from a joint
/// to its child, `offset` being the child's translation in the joint's space.
///
/// The box's long axis is local Z, so the result is `R * S * T(0, 0, 0.5)`. Returns `None` when
/// the child sits on top of the joint.
pub fn bone_box_transform(offset: Vec3, thickness: f32) -> Option<Affine3A> {
    let length = offset.length();
    if length <= f32::EPSILON {
        return None;
    }

    let z = offset / length;
    // Any up vector works as long as it isn't parallel to the bone
    let up = if z.cross(Vec3::Z).length_squared() > 1e-6 {
        Vec3::Z
    } else {
        Vec3::X
    };
    let y = z.cross(up).normalize();
    let x = y.cross(z).normalize();

    let rotation = Affine3A::from_mat3(glam::Mat3::from_cols(x, y, z));
    let scale = Affine3A::from_scale(Vec3::new(thickness, thickness, length));
    let translation = Affine3A::from_translation(Vec3::new(0.0, 0.0, 0.5));

    Some(rotation * scale * translation)
}
