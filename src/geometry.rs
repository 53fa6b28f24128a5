// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Points, key shapes, and the hit-test predicate that regions are built from.

use std::fmt;

use serde::Deserialize;

/// A location in the shared coordinate space of the input surface.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A predicate over points. Returns true if the point lies inside the region.
///
/// Implementations are expected to be pure and cheap. A panicking implementation
/// is tolerated by the resolver, which treats the panic as a non-match. The
/// process panic hook still runs for each of those panics, so hosts that don't
/// want the default message on stderr install their own with
/// [`std::panic::set_hook`].
pub trait HitTest: Send + Sync {
    /// Returns true if the point is contained.
    fn contains(&self, point: Point) -> bool;
}

impl<F> HitTest for F
where
    F: Fn(Point) -> bool + Send + Sync,
{
    fn contains(&self, point: Point) -> bool {
        self(point)
    }
}

/// An axis-aligned rectangle. Edges are inclusive.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// The rightmost x coordinate.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// The bottommost y coordinate.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

impl HitTest for Rect {
    fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }
}

/// A key shape. Deserialized from layout files with a `type` tag.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// A rectangle with circular corners, the default key shape.
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    /// A simple polygon, tested with the even-odd rule.
    Polygon { points: Vec<Point> },
}

impl Shape {
    /// Checks that the shape encloses a non-empty area.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Shape::Rect { width, height, .. } | Shape::RoundedRect { width, height, .. }
                if !(*width > 0.0 && *height > 0.0) =>
            {
                Err(format!("size must be positive, got {}x{}", width, height))
            }
            Shape::RoundedRect { radius, .. } if !(*radius >= 0.0) => {
                Err(format!("corner radius must not be negative, got {}", radius))
            }
            Shape::Ellipse { rx, ry, .. } if !(*rx > 0.0 && *ry > 0.0) => {
                Err(format!("radii must be positive, got {}x{}", rx, ry))
            }
            Shape::Polygon { points } if points.len() < 3 => Err(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )),
            _ => Ok(()),
        }
    }

    /// The bounding rectangle of the shape.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
            }
            | Shape::RoundedRect {
                x,
                y,
                width,
                height,
                ..
            } => Rect::new(*x, *y, *width, *height),
            Shape::Ellipse { cx, cy, rx, ry } => Rect::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry),
            Shape::Polygon { points } => {
                let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
                let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
                for point in points {
                    min_x = min_x.min(point.x);
                    min_y = min_y.min(point.y);
                    max_x = max_x.max(point.x);
                    max_y = max_y.max(point.y);
                }
                if points.is_empty() {
                    return Rect::new(0.0, 0.0, 0.0, 0.0);
                }
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }
}

impl HitTest for Shape {
    fn contains(&self, point: Point) -> bool {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => Rect::new(*x, *y, *width, *height).contains(point),
            Shape::RoundedRect {
                x,
                y,
                width,
                height,
                radius,
            } => rounded_rect_contains(Rect::new(*x, *y, *width, *height), *radius, point),
            Shape::Ellipse { cx, cy, rx, ry } => {
                let dx = (point.x - cx) / rx;
                let dy = (point.y - cy) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Shape::Polygon { points } => polygon_contains(points, point),
        }
    }
}

fn rounded_rect_contains(rect: Rect, radius: f64, point: Point) -> bool {
    if !rect.contains(point) {
        return false;
    }

    // The radius can't exceed half of either side.
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    if radius <= 0.0 {
        return true;
    }

    let corner_x = if point.x < rect.x + radius {
        rect.x + radius
    } else if point.x > rect.max_x() - radius {
        rect.max_x() - radius
    } else {
        return true;
    };
    let corner_y = if point.y < rect.y + radius {
        rect.y + radius
    } else if point.y > rect.max_y() - radius {
        rect.max_y() - radius
    } else {
        return true;
    };

    let dx = point.x - corner_x;
    let dy = point.y - corner_y;
    dx * dx + dy * dy <= radius * radius
}

fn polygon_contains(points: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
