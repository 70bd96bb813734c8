//! Nearest-color lookup against a fixed palette, backed by a k-d tree.
//!
//! A [`TreePalette`] is built once from a list of [`PaletteColor`]s and then
//! answers "which palette entry is closest to this color?" without scanning
//! the whole palette. With the `image` feature, a palette can also be laid
//! over an image ([`TreePalette::apply_palette`]) or used to rank palette
//! colors by how many pixels they cover ([`TreePalette::rank`]).

mod color;
mod distance;
mod kdtree;
mod tree_palette;

#[cfg(feature = "image")]
mod image;

use thiserror::Error;

pub use color::{ColorRgba, IndexedColorRgba};
pub use distance::{squared_distance, squared_plane_distance};
pub use kdtree::{KdTree, Nearest};
pub use tree_palette::TreePalette;

#[cfg(feature = "image")]
pub use crate::image::Paletted;

// ====================
// PUBLIC TRAITS
// ====================

/// A point in 3- or 4-dimensional color space.
///
/// Axes 0, 1 and 2 are red, green and blue. Axis 3 is alpha and only exists
/// when [`Color::dimensions`] is 4. Every axis holds a value in the 16-bit range.
pub trait Color {

    /// Number of axes: 3 for RGB, 4 for RGBA.
    fn dimensions(&self) -> usize;

    /// Value along `axis`.
    ///
    /// # Panics
    ///
    /// Panics with [`ColorError::InvalidDimension`] if `axis >= self.dimensions()`.
    fn dimension(&self, axis: usize) -> u32;
}

/// A [`Color`] that belongs to a palette.
pub trait PaletteColor: Color {

    /// Palette index of the color. Unique within one palette, but not
    /// necessarily contiguous or zero-based.
    fn index(&self) -> usize;
}

/// Finds the palette entry closest to an arbitrary color.
pub trait Palette<C> {
    fn nearest(&self, color: RawColor) -> Option<C>;
}

impl<C: Color + ?Sized> Color for &C {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn dimension(&self, axis: usize) -> u32 {
        (**self).dimension(axis)
    }
}

impl<C: PaletteColor + ?Sized> PaletteColor for &C {
    fn index(&self) -> usize {
        (**self).index()
    }
}

// ====================
// PUBLIC STRUCTS
// ====================

/// Contract violations when handing colors to a palette.
///
/// These are programming errors: the accessors and searches that detect them
/// panic with the error's message instead of returning it.
#[non_exhaustive]
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ColorError {
    #[error("invalid dimension {axis}: expected [0-{dimensions})")]
    InvalidDimension { axis: usize, dimensions: usize },
    #[error("invalid query with {found} dimensions: palette expects {expected}")]
    InvalidQuery { expected: usize, found: usize }
}

// ====================
// PUBLIC TYPE ALIASES
// ====================

/// Interchange color with 16-bit channels, alpha not premultiplied.
pub type RawColor = palette::Srgba<u16>;
