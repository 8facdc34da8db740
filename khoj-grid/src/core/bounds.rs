//! Integer bounding rectangle for the rendered viewport.
//!
//! [`Rectangle`] is the inclusive cell range a renderer draws. It is always
//! non-degenerate: `min_x <= max_x` and `min_y <= max_y`.
//!
//! ```rust
//! use khoj_grid::core::{Coordinate, Rectangle};
//!
//! let coords = [Coordinate::new(0, 0), Coordinate::new(3, -1)];
//! let rect = Rectangle::enclosing(coords, 1);
//! assert_eq!(rect, Rectangle::new(-1, 4, -2, 1));
//!
//! // Nothing explored yet: the default viewport around the origin
//! assert_eq!(Rectangle::enclosing(std::iter::empty(), 1), Rectangle::DEFAULT);
//! ```

use serde::{Deserialize, Serialize};

use super::coord::Coordinate;

/// Default padding added around explored cells.
pub const DEFAULT_PADDING: u32 = 1;

/// Default half-extent of the empty-input viewport.
pub const DEFAULT_HALF_EXTENT: u32 = 2;

/// Inclusive axis-aligned cell rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RectangleRecord")]
pub struct Rectangle {
    /// Smallest x (inclusive)
    pub min_x: i32,
    /// Largest x (inclusive)
    pub max_x: i32,
    /// Smallest y (inclusive)
    pub min_y: i32,
    /// Largest y (inclusive)
    pub max_y: i32,
}

/// Wire form, normalized through [`Rectangle::new`] on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RectangleRecord {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl From<RectangleRecord> for Rectangle {
    fn from(r: RectangleRecord) -> Self {
        Rectangle::new(r.min_x, r.max_x, r.min_y, r.max_y)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Rectangle {
    /// Viewport used when there is nothing to enclose: `[-2,2] x [-2,2]`.
    pub const DEFAULT: Rectangle = Rectangle::centered(DEFAULT_HALF_EXTENT);

    /// Create a rectangle, swapping components if they are given reversed.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// Square viewport of the given half-extent centered on the origin.
    pub const fn centered(half_extent: u32) -> Self {
        let h = if half_extent > i32::MAX as u32 {
            i32::MAX
        } else {
            half_extent as i32
        };
        Self {
            min_x: -h,
            max_x: h,
            min_y: -h,
            max_y: h,
        }
    }

    /// Rectangle covering a single cell.
    #[inline]
    pub fn from_coordinate(coord: Coordinate) -> Self {
        Self {
            min_x: coord.x,
            max_x: coord.x,
            min_y: coord.y,
            max_y: coord.y,
        }
    }

    /// Minimal rectangle enclosing `coords`, grown by `padding` on every side.
    ///
    /// Empty input yields [`Rectangle::DEFAULT`] (padding is not applied to it).
    /// The result does not depend on input order.
    pub fn enclosing<I>(coords: I, padding: u32) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        Self::enclosing_or(coords, padding, Rectangle::DEFAULT)
    }

    /// Like [`Rectangle::enclosing`] with an explicit empty-input fallback.
    pub fn enclosing_or<I>(coords: I, padding: u32, fallback: Rectangle) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coords.into_iter();
        let Some(first) = iter.next() else {
            return fallback;
        };

        let mut rect = Rectangle::from_coordinate(first);
        for coord in iter {
            rect.expand_to_include(coord);
        }
        rect.expand(padding)
    }

    /// Grow to include a cell.
    #[inline]
    pub fn expand_to_include(&mut self, coord: Coordinate) {
        self.min_x = self.min_x.min(coord.x);
        self.max_x = self.max_x.max(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_y = self.max_y.max(coord.y);
    }

    /// Grow by a margin on all sides, saturating at the `i32` range.
    #[inline]
    pub fn expand(&self, margin: u32) -> Self {
        let m = margin.min(i32::MAX as u32) as i32;
        Self {
            min_x: self.min_x.saturating_sub(m),
            max_x: self.max_x.saturating_add(m),
            min_y: self.min_y.saturating_sub(m),
            max_y: self.max_y.saturating_add(m),
        }
    }

    /// Is the cell inside (edges inclusive)?
    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x >= self.min_x
            && coord.x <= self.max_x
            && coord.y >= self.min_y
            && coord.y <= self.max_y
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> u64 {
        (self.max_x as i64 - self.min_x as i64 + 1) as u64
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u64 {
        (self.max_y as i64 - self.min_y as i64 + 1) as u64
    }

    /// Rows from top (`max_y`) to bottom (`min_y`), the order they are drawn.
    pub fn rows_top_down(&self) -> impl Iterator<Item = i32> {
        (self.min_y..=self.max_y).rev()
    }

    /// Columns from left (`min_x`) to right (`max_x`).
    pub fn columns(&self) -> impl Iterator<Item = i32> {
        self.min_x..=self.max_x
    }
}

/// Bounds calculator: enclosing rectangle of `coords` with `padding`.
pub fn bounds<I>(coords: I, padding: u32) -> Rectangle
where
    I: IntoIterator<Item = Coordinate>,
{
    Rectangle::enclosing(coords, padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_centered() {
        assert_eq!(Rectangle::DEFAULT, Rectangle::new(-2, 2, -2, 2));
        assert_eq!(Rectangle::default(), Rectangle::DEFAULT);
        assert_eq!(Rectangle::DEFAULT.width(), 5);
    }

    #[test]
    fn test_empty_input_uses_default() {
        assert_eq!(bounds(Vec::<Coordinate>::new(), 0), Rectangle::DEFAULT);
        assert_eq!(bounds(std::iter::empty(), 7), Rectangle::DEFAULT);
    }

    #[test]
    fn test_single_cell_with_padding() {
        let rect = bounds([Coordinate::new(4, -3)], 1);
        assert_eq!(rect, Rectangle::new(3, 5, -4, -2));

        let tight = bounds([Coordinate::new(4, -3)], 0);
        assert_eq!(tight.width(), 1);
        assert_eq!(tight.height(), 1);
    }

    #[test]
    fn test_order_independent() {
        let coords = vec![
            Coordinate::new(2, 0),
            Coordinate::new(-5, 3),
            Coordinate::new(1, -7),
        ];
        let mut reversed = coords.clone();
        reversed.reverse();

        assert_eq!(bounds(coords, 2), bounds(reversed, 2));
    }

    #[test]
    fn test_contains_edges() {
        let rect = Rectangle::new(0, 10, 0, 10);
        assert!(rect.contains(Coordinate::new(0, 0)));
        assert!(rect.contains(Coordinate::new(10, 10)));
        assert!(!rect.contains(Coordinate::new(-1, 5)));
        assert!(!rect.contains(Coordinate::new(5, 11)));
    }

    #[test]
    fn test_expand_saturates() {
        let rect = bounds([Coordinate::new(i32::MAX, i32::MIN)], 3);
        assert_eq!(rect.max_x, i32::MAX);
        assert_eq!(rect.min_y, i32::MIN);
        assert!(rect.contains(Coordinate::new(i32::MAX, i32::MIN)));
    }

    #[test]
    fn test_new_swaps_reversed() {
        assert_eq!(Rectangle::new(3, 1, 4, -4), Rectangle::new(1, 3, -4, 4));
    }

    #[test]
    fn test_deserialize_normalizes_reversed() {
        let rect: Rectangle =
            serde_json::from_str(r#"{"minX": 5, "maxX": 1, "minY": 0, "maxY": -2}"#).unwrap();
        assert_eq!(rect, Rectangle::new(1, 5, -2, 0));
        assert!(rect.min_x <= rect.max_x && rect.min_y <= rect.max_y);

        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, r#"{"minX":1,"maxX":5,"minY":-2,"maxY":0}"#);
    }

    #[test]
    fn test_row_order() {
        let rect = Rectangle::new(0, 1, -1, 1);
        let rows: Vec<i32> = rect.rows_top_down().collect();
        assert_eq!(rows, vec![1, 0, -1]);
        assert_eq!(rect.columns().count(), 2);
    }
}
