//! Numeric helpers shared by the TOC geometry code.
//!
//! Browsers and font systems occasionally hand back NaN or inverted bounds;
//! these helpers absorb both instead of panicking or propagating NaN.

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics: NaN values collapse to `min`,
/// and when `min > max` the result is `max`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// `numerator / denominator` clamped into `[0, 1]`; zero for a degenerate denominator.
pub fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator.is_nan() || denominator <= 0.0 {
        return 0.0;
    }
    clamp(numerator / denominator, 0.0, 1.0)
}

/// Replace NaN and infinities with `fallback`.
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
