use std::collections::HashMap;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive, Rgba};
use log::debug;
use crate::{ColorRgba, PaletteColor, RawColor, TreePalette};

// ====================
// PUBLIC STRUCTS
// ====================

/// A source image seen through a palette: every pixel is replaced by its
/// closest palette color when read.
///
/// Pixels of an image viewed through an empty palette are passed through
/// unchanged.
pub struct Paletted<'a, I, P> {
    image: &'a I,
    palette: &'a TreePalette<P>
}

impl<I, P> Paletted<'_, I, P>
    where I: GenericImageView,
          <I::Pixel as Pixel>::Subpixel: Into<u16>,
          P: PaletteColor {

    /// Palette index of the pixel at (`x`, `y`), or `None` if the palette is empty.
    pub fn color_index_at(&self, x: u32, y: u32) -> Option<usize> {
        let query = ColorRgba::from_raw(convert_pixel(self.image.get_pixel(x, y)), self.palette.alpha());
        self.palette.search(&query).map(|nearest| nearest.color.index())
    }

    /// Converts every pixel and collects the result into a new image.
    pub fn to_image(&self) -> ImageBuffer<Rgba<u16>, Vec<u16>> {
        let (width, height) = self.dimensions();
        ImageBuffer::from_fn(width, height, |x, y| self.get_pixel(x, y))
    }
}

impl<I, P> GenericImageView for Paletted<'_, I, P>
    where I: GenericImageView,
          <I::Pixel as Pixel>::Subpixel: Into<u16>,
          P: PaletteColor {
    type Pixel = Rgba<u16>;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn bounds(&self) -> (u32, u32, u32, u32) {
        self.image.bounds()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        let color = convert_pixel(self.image.get_pixel(x, y));
        let converted = self.palette.convert(color).unwrap_or(color);

        Rgba([converted.red, converted.green, converted.blue, converted.alpha])
    }
}

impl<P: PaletteColor> TreePalette<P> {

    /// Lays the palette over `image` without converting any pixel yet.
    pub fn apply_palette<'a, I>(&'a self, image: &'a I) -> Paletted<'a, I, P>
        where I: GenericImageView,
              <I::Pixel as Pixel>::Subpixel: Into<u16> {
        Paletted { image, palette: self }
    }

    /// Ranks palette indices by how many pixels of `image` they are closest
    /// to, most pixels first. Also returns the pixel count of every index
    /// that occurs.
    pub fn rank_by_index<I>(&self, image: &I) -> (Vec<usize>, HashMap<usize, usize>)
        where I: GenericImageView,
              <I::Pixel as Pixel>::Subpixel: Into<u16> {
        let (colors, counts) = self.tally(image);
        (colors.into_iter().map(|color| color.index()).collect(), counts)
    }

    // First-seen order within equal counts, scanning rows top to bottom
    fn tally<I>(&self, image: &I) -> (Vec<&P>, HashMap<usize, usize>)
        where I: GenericImageView,
              <I::Pixel as Pixel>::Subpixel: Into<u16> {
        let (width, height) = image.dimensions();
        let mut counts = HashMap::new();
        let mut colors = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let query = ColorRgba::from_raw(convert_pixel(image.get_pixel(x, y)), self.alpha());
                if let Some(nearest) = self.search(&query) {
                    let count = counts.entry(nearest.color.index()).or_insert(0);
                    if *count == 0 {
                        colors.push(nearest.color);
                    }
                    *count += 1;
                }
            }
        }

        colors.sort_by(|color1, color2| counts[&color2.index()].cmp(&counts[&color1.index()]));
        debug!("Ranked {} pixels into {} palette colors", width as u64 * height as u64, colors.len());

        (colors, counts)
    }
}

impl<P: PaletteColor + Clone> TreePalette<P> {

    /// Ranks palette colors by how many pixels of `image` they are closest
    /// to, most pixels first. Also returns the pixel count of every palette
    /// index that occurs.
    pub fn rank<I>(&self, image: &I) -> (Vec<P>, HashMap<usize, usize>)
        where I: GenericImageView,
              <I::Pixel as Pixel>::Subpixel: Into<u16> {
        let (colors, counts) = self.tally(image);
        (colors.into_iter().cloned().collect(), counts)
    }
}

// ====================
// PRIVATE FUNCTIONS
// ====================

fn convert_pixel<P: Pixel>(pixel: P) -> RawColor where P::Subpixel: Into<u16> {
    let [red, green, blue, alpha] = pixel.to_rgba().0;

    RawColor::new(widen(red), widen(green), widen(blue), widen(alpha))
}

// Scales a channel so that its maximum maps to u16::MAX
fn widen<S: Primitive + Into<u16>>(value: S) -> u16 {
    let max: u16 = S::DEFAULT_MAX_VALUE.into();
    (value.into() as u32 * u16::MAX as u32 / max as u32) as u16
}
