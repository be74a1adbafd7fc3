//! Smooth reward shaping.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigmoid {
    Gaussian,
    Quadratic,
}

/// 1 inside `bounds`, decaying with distance outside them.
///
/// At a distance of `margin` from the nearest bound the result equals
/// `value_at_margin`. A zero margin gives a hard 0/1 indicator.
#[must_use]
pub fn tolerance(x: f64, bounds: (f64, f64), margin: f64, sigmoid: Sigmoid, value_at_margin: f64) -> f64 {
    let (lower, upper) = bounds;
    if x >= lower && x <= upper {
        return 1.0;
    }
    if margin <= 0.0 {
        return 0.0;
    }
    let d = (if x < lower { lower - x } else { x - upper }) / margin;
    match sigmoid {
        Sigmoid::Gaussian => {
            let scale = (-2.0 * value_at_margin.ln()).sqrt();
            (-0.5 * (d * scale).powi(2)).exp()
        }
        Sigmoid::Quadratic => {
            let scaled = d * (1.0 - value_at_margin).sqrt();
            if scaled.abs() < 1.0 {
                1.0 - scaled * scaled
            } else {
                0.0
            }
        }
    }
}
