use nalgebra::{Point3, Vector3};
use std::f64::consts::{PI, TAU};
use thiserror::Error;

const DEGENERACY_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Degenerate reference frame: {0}")]
    DegenerateFrame(&'static str),
}

/// Internal coordinates of one atom relative to three reference atoms:
/// bond length `r`, bond angle `theta` in [0, pi], torsion angle `phi`
/// in [-pi, pi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalCoordinates {
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
}

pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Signed dihedral of the chain p1-p2-p3-p4, in [-pi, pi). Zero when p1 and
/// p4 are eclipsed (cis).
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;
    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    if n1.norm() < DEGENERACY_TOLERANCE || n2.norm() < DEGENERACY_TOLERANCE {
        return Err(GeometryError::DegenerateFrame(
            "collinear atoms leave the dihedral undefined",
        ));
    }
    let m1 = n1.cross(&b2.normalize());
    let mut phi = m1.dot(&n2).atan2(n1.dot(&n2));
    if phi >= PI {
        phi -= TAU;
    }
    Ok(phi)
}

/// Extracts (r, theta, phi) of `atom_pos` relative to the bond/angle/torsion
/// reference positions, together with |det J| = r^2 * sin(theta).
pub fn cartesian_to_internal(
    atom_pos: &Point3<f64>,
    bond_pos: &Point3<f64>,
    angle_pos: &Point3<f64>,
    torsion_pos: &Point3<f64>,
) -> Result<(InternalCoordinates, f64), GeometryError> {
    let u = atom_pos - bond_pos;
    let r = u.norm();
    if r < DEGENERACY_TOLERANCE {
        return Err(GeometryError::DegenerateFrame(
            "atom coincides with its bond reference",
        ));
    }
    let v = angle_pos - bond_pos;
    if v.norm() < DEGENERACY_TOLERANCE {
        return Err(GeometryError::DegenerateFrame(
            "bond and angle references coincide",
        ));
    }
    let theta = angle_between(&u, &v);
    let phi = dihedral_angle(atom_pos, bond_pos, angle_pos, torsion_pos)?;
    let internal = InternalCoordinates { r, theta, phi };
    Ok((internal, jacobian(r, theta)))
}

/// Places an atom at (r, theta, phi) in the orthonormal local frame defined
/// by the three reference positions. Exact algebraic inverse of
/// [`cartesian_to_internal`]. Also returns |det J| = r^2 * sin(theta).
pub fn internal_to_cartesian(
    bond_pos: &Point3<f64>,
    angle_pos: &Point3<f64>,
    torsion_pos: &Point3<f64>,
    r: f64,
    theta: f64,
    phi: f64,
) -> Result<(Point3<f64>, f64), GeometryError> {
    let e1v = bond_pos - angle_pos;
    if e1v.norm() < DEGENERACY_TOLERANCE {
        return Err(GeometryError::DegenerateFrame(
            "bond and angle references coincide",
        ));
    }
    let e1 = e1v.normalize();
    let w = angle_pos - torsion_pos;
    let nv: Vector3<f64> = w.cross(&e1);
    if nv.norm() < DEGENERACY_TOLERANCE {
        return Err(GeometryError::DegenerateFrame(
            "collinear reference atoms leave the torsion frame undefined",
        ));
    }
    let n = nv.normalize();
    let m = n.cross(&e1);

    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let direction = -cos_theta * e1 + sin_theta * cos_phi * m - sin_theta * sin_phi * n;
    let position = bond_pos + r * direction;
    Ok((position, jacobian(r, theta)))
}

#[inline]
pub fn jacobian(r: f64, theta: f64) -> f64 {
    (r * r * theta.sin()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn reference_triple() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-0.4, 1.1, 0.2),
        )
    }

    #[test]
    fn zero_torsion_places_atom_cis_to_torsion_reference() {
        let bond = Point3::new(1.0, 0.0, 0.0);
        let angle = Point3::new(0.0, 0.0, 0.0);
        let torsion = Point3::new(0.0, 1.0, 0.0);
        let (pos, _) =
            internal_to_cartesian(&bond, &angle, &torsion, 1.0, PI / 2.0, 0.0).unwrap();
        assert!(f64_approx_equal(pos.x, 1.0));
        assert!(f64_approx_equal(pos.y, 1.0));
        assert!(f64_approx_equal(pos.z, 0.0));
    }

    #[test]
    fn round_trip_recovers_internal_coordinates() {
        let (bond, angle, torsion) = reference_triple();
        let mut rng = StdRng::seed_from_u64(161803);
        for _ in 0..200 {
            let r = rng.gen_range(0.5..2.5);
            let theta = rng.gen_range(0.05..PI - 0.05);
            let phi = rng.gen_range(-PI..PI);

            let (pos, det_forward) =
                internal_to_cartesian(&bond, &angle, &torsion, r, theta, phi).unwrap();
            let (internal, det_reverse) =
                cartesian_to_internal(&pos, &bond, &angle, &torsion).unwrap();

            assert!(f64_approx_equal(internal.r, r));
            assert!(f64_approx_equal(internal.theta, theta));
            assert!(f64_approx_equal(internal.phi, phi));
            assert!(f64_approx_equal(det_forward, det_reverse));
        }
    }

    #[test]
    fn jacobian_matches_r_squared_sin_theta_in_both_directions() {
        let (bond, angle, torsion) = reference_triple();
        let (r, theta, phi): (f64, f64, f64) = (1.53, 1.91, -2.3);
        let expected = r * r * theta.sin();

        let (pos, det_forward) =
            internal_to_cartesian(&bond, &angle, &torsion, r, theta, phi).unwrap();
        let (_, det_reverse) = cartesian_to_internal(&pos, &bond, &angle, &torsion).unwrap();

        assert!(f64_approx_equal(det_forward, expected));
        assert!(f64_approx_equal(det_reverse, expected));
    }

    #[test]
    fn dihedral_sign_follows_right_handed_convention() {
        let bond = Point3::new(1.0, 0.0, 0.0);
        let angle = Point3::new(0.0, 0.0, 0.0);
        let torsion = Point3::new(0.0, 1.0, 0.0);
        let (pos, _) =
            internal_to_cartesian(&bond, &angle, &torsion, 1.0, PI / 2.0, PI / 2.0).unwrap();
        let phi = dihedral_angle(&pos, &bond, &angle, &torsion).unwrap();
        assert!(f64_approx_equal(phi, PI / 2.0));
    }

    #[test]
    fn coincident_bond_and_angle_references_are_rejected() {
        let p = Point3::new(0.0, 0.0, 0.0);
        let result = internal_to_cartesian(&p, &p, &Point3::new(1.0, 0.0, 0.0), 1.0, 1.0, 0.0);
        assert!(matches!(result, Err(GeometryError::DegenerateFrame(_))));
    }

    #[test]
    fn collinear_references_are_rejected() {
        let bond = Point3::new(2.0, 0.0, 0.0);
        let angle = Point3::new(1.0, 0.0, 0.0);
        let torsion = Point3::new(0.0, 0.0, 0.0);
        let result = internal_to_cartesian(&bond, &angle, &torsion, 1.0, 1.0, 0.0);
        assert!(matches!(result, Err(GeometryError::DegenerateFrame(_))));
    }

    #[test]
    fn atom_on_top_of_bond_reference_is_rejected() {
        let (bond, angle, torsion) = reference_triple();
        let result = cartesian_to_internal(&bond, &bond, &angle, &torsion);
        assert!(matches!(result, Err(GeometryError::DegenerateFrame(_))));
    }

    #[test]
    fn angle_between_orthogonal_vectors_is_half_pi() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 3.0, 0.0);
        assert!(f64_approx_equal(angle_between(&a, &b), PI / 2.0));
    }
}
