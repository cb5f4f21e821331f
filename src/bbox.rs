use std::fmt;
use std::str::FromStr;

/// A point on the canvas, in image pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
}

impl CanvasPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Box corners in the order they were dragged.
///
/// Nothing is normalized: `right_x < left_x` or `bottom_y < top_y` is valid
/// and is written to disk as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left_x: i32,
    pub top_y: i32,
    pub right_x: i32,
    pub bottom_y: i32,
}

impl BoundingBox {
    pub fn new(left_x: i32, top_y: i32, right_x: i32, bottom_y: i32) -> Self {
        Self {
            left_x,
            top_y,
            right_x,
            bottom_y,
        }
    }

    pub fn from_corners(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> CanvasPoint {
        CanvasPoint::new(self.left_x, self.top_y)
    }

    pub fn end(&self) -> CanvasPoint {
        CanvasPoint::new(self.right_x, self.bottom_y)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.left_x, self.top_y, self.right_x, self.bottom_y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBoxError;

impl fmt::Display for ParseBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected four whitespace-separated integers")
    }
}

impl std::error::Error for ParseBoxError {}

impl FromStr for BoundingBox {
    type Err = ParseBoxError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut values = [0i32; 4];
        let mut tokens = line.split_whitespace();
        for slot in values.iter_mut() {
            *slot = tokens
                .next()
                .ok_or(ParseBoxError)?
                .parse::<i32>()
                .map_err(|_| ParseBoxError)?;
        }
        if tokens.next().is_some() {
            return Err(ParseBoxError);
        }
        let [l, t, r, b] = values;
        Ok(Self::new(l, t, r, b))
    }
}
