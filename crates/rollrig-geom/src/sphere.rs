use rollrig_core::types::{Isometry, Vec3};

/// Grab reach, in ball radii. The hand "reaches into" the ball this far
/// along its forward axis before snapping to the interior wall.
pub const GRAB_REACH_RADII: f32 = 2.0;

/// Closest point on the sphere surface to `p`. A degenerate `p` at the
/// center (or non-finite direction) snaps to the +Y pole so callers never
/// see NaN.
#[inline]
pub fn closest_point_on_sphere(center: Vec3, radius: f32, p: Vec3) -> Vec3 {
    let d = p - center;
    let len = d.length();
    if len > 1.0e-6 && len.is_finite() {
        center + d * (radius / len)
    } else {
        center + Vec3::new(0.0, radius, 0.0)
    }
}

/// Contact point for a grab: project `GRAB_REACH_RADII × radius` along the
/// hand's forward axis, then snap onto the sphere surface. Used both when a
/// grab begins and every step afterwards to re-aim the spring target.
#[inline]
pub fn grab_point(hand: &Isometry, center: Vec3, radius: f32) -> Vec3 {
    let reach = hand.pos + hand.forward() * (GRAB_REACH_RADII * radius);
    closest_point_on_sphere(center, radius, reach)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollrig_core::{vec3, iso};
    use glam::Quat;

    #[test] fn snapped_point_lies_on_surface() {
        let c = vec3(0.0, 1.0, 0.0);
        let r = 0.75;
        let p = closest_point_on_sphere(c, r, vec3(3.0, 4.0, -2.0));
        assert!(((p - c).length() - r).abs() < 1e-5);
    }

    #[test] fn center_degenerate_takes_top_pole() {
        let c = vec3(2.0, 2.0, 2.0);
        let p = closest_point_on_sphere(c, 1.0, c);
        assert!((p - vec3(2.0, 3.0, 2.0)).length() < 1e-6);
    }

    #[test] fn aim_at_center_hits_surface_at_radius() {
        // Hand half a radius outside the wall, forward (-Z) pointing
        // straight at the center: reach 2r overshoots the center and the
        // snap must land exactly one radius out.
        let r = 1.2_f32;
        let c = vec3(0.0, 1.0, 0.0);
        let hand = iso(c + vec3(0.0, 0.0, 1.5 * r), Quat::IDENTITY);
        let p = grab_point(&hand, c, r);
        assert!(((p - c).length() - r).abs() < 1e-5);
        // Overshoot passes through the center to the far (−Z) side.
        assert!(p.z < c.z);
    }

    #[test] fn reach_follows_hand_forward() {
        let r = 1.0_f32;
        let c = vec3(0.0, 0.0, 0.0);
        // Hand at center looking +X (yaw 90° turns −Z into −X... so use
        // -90° for +X).
        let hand = iso(c, Quat::from_rotation_y(-core::f32::consts::FRAC_PI_2));
        let p = grab_point(&hand, c, r);
        assert!((p - vec3(r, 0.0, 0.0)).length() < 1e-4);
    }
}
