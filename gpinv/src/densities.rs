//! Elementwise log densities.

use special::Gamma as SpecialGamma;

/// `log(2π)`
pub const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// log N(x | mu, var)
pub fn gaussian(x: f64, mu: f64, var: f64) -> f64 {
    let diff = x - mu;
    -0.5 * (LN_2PI + var.ln() + diff * diff / var)
}

/// log Poisson(y | rate), including the `log(y!)` term
pub fn poisson(rate: f64, y: f64) -> f64 {
    xlogy(y, rate) - rate - ln_factorial(y)
}

/// `log Γ(y + 1)`
pub fn ln_factorial(y: f64) -> f64 {
    SpecialGamma::ln_gamma(y + 1.0).0
}

/// `x * ln(y)` with `0 * ln(0) = 0`
fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * y.ln()
    }
}
