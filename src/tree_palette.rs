use log::debug;
use crate::{Color, ColorError, ColorRgba, IndexedColorRgba, KdTree, Nearest, Palette, PaletteColor, RawColor};

// ====================
// PUBLIC STRUCTS
// ====================

/// An immutable palette that finds the closest entry to any color in
/// logarithmic time.
///
/// Closeness is straight-line distance in RGB space, or RGBA space when the
/// palette was built with `alpha` set. Lookups never mutate the palette, so a
/// shared palette can serve queries from many threads at once.
#[derive(Clone, Debug)]
pub struct TreePalette<P> {
    alpha: bool,
    tree: KdTree<P>
}

impl<P: PaletteColor> TreePalette<P> {

    /// Builds a palette from `colors`. Each color must have four dimensions
    /// if `alpha` is set and three otherwise.
    pub fn new(colors: Vec<P>, alpha: bool) -> Self {
        let tree = KdTree::build(colors);
        debug!("Built palette of {} colors (alpha: {}), tree height {}", tree.len(), alpha, tree.height());

        TreePalette { alpha, tree }
    }

    /// Returns the palette color closest to `query`, or `None` if there is no
    /// query or the palette is empty.
    pub fn convert_color<Q: Color + ?Sized>(&self, query: Option<&Q>) -> Option<&P> {
        query.and_then(|query| self.search(query)).map(|nearest| nearest.color)
    }

    /// Returns the palette color closest to `query` along with its scaled
    /// squared distance, or `None` if the palette is empty.
    ///
    /// # Panics
    ///
    /// Panics with [`ColorError::InvalidQuery`] if the palette is not empty and
    /// `query` does not have [`TreePalette::dimensions`] dimensions.
    pub fn search<Q: Color + ?Sized>(&self, query: &Q) -> Option<Nearest<'_, P>> {
        if self.tree.is_empty() {
            return None;
        }

        let expected = self.dimensions();
        let found = query.dimensions();
        if found != expected {
            panic!("{}", ColorError::InvalidQuery { expected, found });
        }

        self.tree.nearest(query)
    }

    /// Converts any color into the closest palette color. When the palette
    /// ignores alpha, the result is fully opaque.
    pub fn convert(&self, color: RawColor) -> Option<RawColor> {
        let query = ColorRgba::from_raw(color, self.alpha);
        self.search(&query).map(|nearest| {
            let channel = |axis| nearest.color.dimension(axis) as u16;
            let alpha = if self.alpha { channel(3) } else { u16::MAX };
            RawColor::new(channel(0), channel(1), channel(2), alpha)
        })
    }

    pub fn alpha(&self) -> bool {
        self.alpha
    }

    /// Dimensionality of the palette's colors: 4 with alpha, 3 without.
    pub fn dimensions(&self) -> usize {
        if self.alpha { 4 } else { 3 }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn colors(&self) -> &[P] {
        self.tree.colors()
    }

    pub fn tree(&self) -> &KdTree<P> {
        &self.tree
    }
}

impl TreePalette<IndexedColorRgba> {

    /// Builds a palette whose indices are the positions of `colors`.
    pub fn from_colors(colors: &[RawColor], alpha: bool) -> Self {
        let colors = colors.iter()
            .enumerate()
            .map(|(index, &color)| IndexedColorRgba::new(ColorRgba::from_raw(color, alpha), index))
            .collect();
        TreePalette::new(colors, alpha)
    }
}

impl<P: PaletteColor + Clone> Palette<P> for TreePalette<P> {
    fn nearest(&self, color: RawColor) -> Option<P> {
        let query = ColorRgba::from_raw(color, self.alpha);
        self.search(&query).map(|nearest| nearest.color.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use crate::{ColorRgba, IndexedColorRgba, Palette, PaletteColor, RawColor, TreePalette};
    use crate::tests::{brute_force_distance, named_colors, sweep_palette, sweep_queries, true_squared_distance};

    fn small_palette() -> TreePalette<IndexedColorRgba> {
        TreePalette::new(vec![
            IndexedColorRgba::opaque(255, 211, 92, 1, "DANDELION"),
            IndexedColorRgba::opaque(255, 130, 1, 2, "DARK ORANGE"),
            IndexedColorRgba::opaque(1, 128, 181, 11, "PACIFIC BLUE")
        ], false)
    }

    fn index_of(palette: &TreePalette<IndexedColorRgba>, query: ColorRgba) -> Option<usize> {
        palette.convert_color(Some(&query)).map(|color| color.index())
    }

    #[test]
    fn test_yellowish_query_finds_dandelion() {
        assert_eq!(Some(1), index_of(&small_palette(), ColorRgba::opaque(250, 200, 90)));
    }

    #[test]
    fn test_bluish_query_finds_pacific_blue() {
        assert_eq!(Some(11), index_of(&small_palette(), ColorRgba::opaque(0, 130, 180)));
    }

    #[test]
    fn test_empty_palette_never_matches() {
        let palette = TreePalette::<IndexedColorRgba>::new(Vec::new(), true);

        assert!(palette.is_empty());
        assert_eq!(None, palette.convert_color(Some(&ColorRgba::transparent(1, 2, 3, 0.5))));
        assert_eq!(None, palette.convert_color::<ColorRgba>(None));
        assert_eq!(None, palette.convert(RawColor::new(1, 2, 3, 4)));
        assert_eq!(None, Palette::nearest(&palette, RawColor::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_missing_query_never_matches() {
        assert_eq!(None, small_palette().convert_color::<ColorRgba>(None));
    }

    #[test]
    fn test_empty_palette_accepts_any_dimensions() {
        let palette = TreePalette::<IndexedColorRgba>::new(Vec::new(), false);

        assert!(palette.search(&ColorRgba::new_transparent(1, 2, 3, 4)).is_none());
    }

    #[test]
    fn test_single_color_always_matches() {
        let palette = TreePalette::new(vec![IndexedColorRgba::opaque(199, 44, 58, 7, "BRICK RED")], false);

        for query in sweep_queries(32, false) {
            assert_eq!(Some(7), index_of(&palette, query));
        }
    }

    #[test]
    fn test_matches_brute_force_without_alpha() {
        for size in [1, 4, 10, 31, 90] {
            let colors = sweep_palette(size, false);
            let palette = TreePalette::new(colors.clone(), false);

            for query in sweep_queries(50, false) {
                let color = palette.convert_color(Some(&query)).unwrap();
                assert_eq!(brute_force_distance(&query, &colors), Some(true_squared_distance(&query, color)));
            }
        }
    }

    #[test]
    fn test_matches_brute_force_with_alpha() {
        for size in [1, 6, 12, 45, 128] {
            let colors = sweep_palette(size, true);
            let palette = TreePalette::new(colors.clone(), true);

            for query in sweep_queries(50, true) {
                let color = palette.convert_color(Some(&query)).unwrap();
                assert_eq!(brute_force_distance(&query, &colors), Some(true_squared_distance(&query, color)));
            }
        }
    }

    #[test]
    fn test_named_palette_matches_brute_force() {
        let colors = named_colors();
        let palette = TreePalette::new(colors.clone(), false);

        for red in (0..=255u8).step_by(15) {
            for green in (0..=255u8).step_by(51) {
                for blue in (0..=255u8).step_by(85) {
                    let query = ColorRgba::opaque(red, green, blue);
                    let color = palette.convert_color(Some(&query)).unwrap();
                    assert_eq!(brute_force_distance(&query, &colors), Some(true_squared_distance(&query, color)));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "invalid query with 4 dimensions: palette expects 3")]
    fn test_query_with_wrong_dimensions_panics() {
        small_palette().search(&ColorRgba::new_transparent(1, 2, 3, 4));
    }

    #[test]
    fn test_convert_drops_alpha_without_alpha_channel() {
        let converted = small_palette().convert(RawColor::new(250 * 257, 200 * 257, 90 * 257, 12)).unwrap();

        assert_eq!(RawColor::new(255 * 257, 211 * 257, 92 * 257, u16::MAX), converted);
    }

    #[test]
    fn test_convert_keeps_alpha_with_alpha_channel() {
        let palette = TreePalette::from_colors(&[
            RawColor::new(0, 0, 0, 0),
            RawColor::new(0, 0, 0, u16::MAX)
        ], true);

        assert_eq!(Some(RawColor::new(0, 0, 0, 0)), palette.convert(RawColor::new(10, 10, 10, 100)));
        assert_eq!(Some(RawColor::new(0, 0, 0, u16::MAX)), palette.convert(RawColor::new(10, 10, 10, 60000)));
    }

    #[test]
    fn test_from_colors_indexes_by_position() {
        let palette = TreePalette::from_colors(&[
            RawColor::new(0, 0, 0, u16::MAX),
            RawColor::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX)
        ], false);

        assert_eq!(2, palette.len());
        assert_eq!(Some(1), Palette::nearest(&palette, RawColor::new(60000, 60000, 60000, 0)).map(|color| color.index()));
        assert_eq!(Some(0), Palette::nearest(&palette, RawColor::new(100, 0, 3000, 0)).map(|color| color.index()));
    }

    #[test]
    fn test_concurrent_queries_agree() {
        let palette = Arc::new(TreePalette::new(sweep_palette(60, true), true));
        let queries = sweep_queries(40, true);
        let expected: Vec<_> = queries.iter()
            .map(|query| palette.convert_color(Some(query)).map(|color| color.index()))
            .collect();

        let handles: Vec<_> = (0..4).map(|_| {
            let palette = Arc::clone(&palette);
            let queries = queries.clone();
            thread::spawn(move || queries.iter()
                .map(|query| palette.convert_color(Some(query)).map(|color| color.index()))
                .collect::<Vec<_>>())
        }).collect();

        for handle in handles {
            assert_eq!(expected, handle.join().unwrap());
        }
    }
}
