use serde::{Deserialize, Serialize};

/// A wall drawn in the maze image, in pixel coordinates.
///
/// Segments are always kept normalized so that `x1 <= x2` and `y1 <= y2`, which makes the
/// bounding box containment test independent of the direction the wall was drawn in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSegment")]
pub struct Segment {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

#[derive(Deserialize)]
struct RawSegment {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl From<RawSegment> for Segment {
    fn from(s: RawSegment) -> Self {
        Segment::new(s.x1, s.y1, s.x2, s.y2)
    }
}

impl Segment {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn horizontal(x1: u32, x2: u32, y: u32) -> Self {
        Self::new(x1, y, x2, y)
    }

    pub fn vertical(x: u32, y1: u32, y2: u32) -> Self {
        Self::new(x, y1, x, y2)
    }

    /// True if the bounding box of `self` encloses the bounding box of `other`
    pub fn contains(&self, other: &Segment) -> bool {
        other.x1 >= self.x1 && other.x2 <= self.x2 && other.y1 >= self.y1 && other.y2 <= self.y2
    }

    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }
}

/// All walls of one maze drawing together with the extent used to size the grid
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub segments: Vec<Segment>,
    pub max_x: u32,
    pub max_y: u32,
}

impl Drawing {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let max_x = segments.iter().map(|s| s.x2).max().unwrap_or(0);
        let max_y = segments.iter().map(|s| s.y2).max().unwrap_or(0);
        Self {
            segments,
            max_x,
            max_y,
        }
    }

    /// Returns true if any wall fully contains the probe
    pub fn blocks(&self, probe: &Segment) -> bool {
        self.segments.iter().any(|wall| wall.contains(probe))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
