use std::fmt::{Display, Formatter};
use palette::Srgb;
use crate::{Color, ColorError, PaletteColor, RawColor};

// ====================
// PUBLIC STRUCTS
// ====================

/// An RGB or RGBA color with 16-bit channels.
///
/// When the alpha channel is inactive, the color has three dimensions and its
/// alpha value is never compared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorRgba {
    red: u16,
    green: u16,
    blue: u16,
    alpha: u16,
    alpha_channel: bool
}

impl ColorRgba {

    /// A four-dimensional color from raw 16-bit channels.
    pub fn new_transparent(red: u16, green: u16, blue: u16, alpha: u16) -> Self {
        ColorRgba { red, green, blue, alpha, alpha_channel: true }
    }

    /// A three-dimensional color from raw 16-bit channels.
    pub fn new_opaque(red: u16, green: u16, blue: u16) -> Self {
        ColorRgba { red, green, blue, alpha: u16::MAX, alpha_channel: false }
    }

    /// A four-dimensional color from 8-bit channels and an alpha in \[0, 1\].
    pub fn transparent(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        let wide = widen(red, green, blue);
        ColorRgba::new_transparent(wide.red, wide.green, wide.blue, widen_alpha(alpha))
    }

    /// A three-dimensional color from 8-bit channels.
    pub fn opaque(red: u8, green: u8, blue: u8) -> Self {
        let wide = widen(red, green, blue);
        ColorRgba::new_opaque(wide.red, wide.green, wide.blue)
    }

    /// Reads `color` as a query for a palette with the given alpha policy.
    pub fn from_raw(color: RawColor, alpha_channel: bool) -> Self {
        ColorRgba {
            red: color.red,
            green: color.green,
            blue: color.blue,
            alpha: if alpha_channel { color.alpha } else { u16::MAX },
            alpha_channel
        }
    }

    pub fn red(&self) -> u16 {
        self.red
    }

    pub fn green(&self) -> u16 {
        self.green
    }

    pub fn blue(&self) -> u16 {
        self.blue
    }

    /// Alpha value. Always fully opaque when the alpha channel is inactive.
    pub fn alpha(&self) -> u16 {
        if self.alpha_channel { self.alpha } else { u16::MAX }
    }

    pub fn has_alpha_channel(&self) -> bool {
        self.alpha_channel
    }

    pub fn rgba(&self) -> RawColor {
        RawColor::new(self.red, self.green, self.blue, self.alpha())
    }

    pub fn checked_dimension(&self, axis: usize) -> Result<u32, ColorError> {
        match axis {
            0 => Ok(self.red as u32),
            1 => Ok(self.green as u32),
            2 => Ok(self.blue as u32),
            3 if self.alpha_channel => Ok(self.alpha as u32),
            _ => Err(ColorError::InvalidDimension { axis, dimensions: self.dimensions() })
        }
    }
}

impl Color for ColorRgba {
    fn dimensions(&self) -> usize {
        if self.alpha_channel { 4 } else { 3 }
    }

    fn dimension(&self, axis: usize) -> u32 {
        self.checked_dimension(axis).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl From<ColorRgba> for RawColor {
    fn from(color: ColorRgba) -> Self {
        color.rgba()
    }
}

impl Display for ColorRgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.alpha_channel {
            write!(f, "{{R:{}, G:{}, B:{}, A:{}}}", self.red, self.green, self.blue, self.alpha)
        } else {
            write!(f, "{{R:{}, G:{}, B:{}}}", self.red, self.green, self.blue)
        }
    }
}

/// A [`ColorRgba`] tagged with its palette index and an optional name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedColorRgba {
    color: ColorRgba,
    index: usize,
    label: Option<String>
}

impl IndexedColorRgba {
    pub fn new(color: ColorRgba, index: usize) -> Self {
        IndexedColorRgba { color, index, label: None }
    }

    pub fn new_transparent(red: u16, green: u16, blue: u16, alpha: u16, index: usize) -> Self {
        IndexedColorRgba::new(ColorRgba::new_transparent(red, green, blue, alpha), index)
    }

    pub fn new_opaque(red: u16, green: u16, blue: u16, index: usize) -> Self {
        IndexedColorRgba::new(ColorRgba::new_opaque(red, green, blue), index)
    }

    /// A named four-dimensional palette color from 8-bit channels and an alpha in \[0, 1\].
    pub fn transparent(red: u8, green: u8, blue: u8, alpha: f32, index: usize, label: &str) -> Self {
        IndexedColorRgba::new(ColorRgba::transparent(red, green, blue, alpha), index).with_label(label)
    }

    /// A named three-dimensional palette color from 8-bit channels.
    pub fn opaque(red: u8, green: u8, blue: u8, index: usize, label: &str) -> Self {
        IndexedColorRgba::new(ColorRgba::opaque(red, green, blue), index).with_label(label)
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        IndexedColorRgba { label: Some(label.into()), ..self }
    }

    pub fn color(&self) -> ColorRgba {
        self.color
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Color for IndexedColorRgba {
    fn dimensions(&self) -> usize {
        self.color.dimensions()
    }

    fn dimension(&self, axis: usize) -> u32 {
        self.color.dimension(axis)
    }
}

impl PaletteColor for IndexedColorRgba {
    fn index(&self) -> usize {
        self.index
    }
}

impl From<&IndexedColorRgba> for RawColor {
    fn from(color: &IndexedColorRgba) -> Self {
        color.color.rgba()
    }
}

impl Display for IndexedColorRgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {{Id: {}, ColorRgba: {}}}", label, self.index, self.color),
            None => write!(f, "{{Id: {}, ColorRgba: {}}}", self.index, self.color)
        }
    }
}

// ====================
// PRIVATE FUNCTIONS
// ====================

fn widen(red: u8, green: u8, blue: u8) -> Srgb<u16> {
    Srgb::new(red, green, blue).into_format()
}

fn widen_alpha(alpha: f32) -> u16 {
    (alpha.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}
