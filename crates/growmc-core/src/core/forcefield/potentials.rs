const COULOMB_CONSTANT: f64 = 332.0637; // In kcal·Å/(mol·e²)

#[inline]
pub fn harmonic_bond(dist: f64, length: f64, force_constant: f64) -> f64 {
    let delta = dist - length;
    0.5 * force_constant * delta * delta
}

#[inline]
pub fn harmonic_angle(theta: f64, angle: f64, force_constant: f64) -> f64 {
    let delta = theta - angle;
    0.5 * force_constant * delta * delta
}

#[inline]
pub fn periodic_torsion(phi: f64, periodicity: u32, phase: f64, force_constant: f64) -> f64 {
    force_constant * (1.0 + (periodicity as f64 * phi - phase).cos())
}

#[inline]
pub fn lennard_jones(dist: f64, sigma: f64, epsilon: f64) -> f64 {
    if dist < 1e-6 {
        return 1e10;
    }
    let x = (sigma / dist).powi(6);
    4.0 * epsilon * x * (x - 1.0)
}

#[inline]
pub fn coulomb(dist: f64, charge_product: f64) -> f64 {
    if dist < 1e-6 {
        return charge_product.signum() * 1e10;
    }
    COULOMB_CONSTANT * charge_product / dist
}
