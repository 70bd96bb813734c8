use crate::Color;

// ====================
// PUBLIC FUNCTIONS
// ====================

/// Squared Euclidean distance between two colors of equal dimensionality,
/// with every per-axis term divided by four.
///
/// The scaling keeps the sum of four 16-bit terms inside a `u32`. It does not
/// change how distances compare against each other, but the result must not be
/// compared with distances computed any other way.
pub fn squared_distance<A: Color + ?Sized, B: Color + ?Sized>(color1: &A, color2: &B) -> u32 {
    debug_assert_eq!(color1.dimensions(), color2.dimensions());

    (0..color1.dimensions())
        .map(|axis| squared_difference(color1.dimension(axis), color2.dimension(axis)))
        .sum()
}

/// Scaled squared distance from `color` to the plane through `plane_value`
/// perpendicular to `axis`.
pub fn squared_plane_distance<C: Color + ?Sized>(color: &C, plane_value: u32, axis: usize) -> u32 {
    squared_difference(plane_value, color.dimension(axis))
}

// ====================
// PRIVATE FUNCTIONS
// ====================

/* The difference wraps when value2 > value1, but the wrapped square is the
   same as the true square modulo 2^32. For 16-bit values the true square fits
   in a u32, so the result is exact before the shift. */
fn squared_difference(value1: u32, value2: u32) -> u32 {
    let difference = value1.wrapping_sub(value2);
    difference.wrapping_mul(difference) >> 2
}
