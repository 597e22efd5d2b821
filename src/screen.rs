//! Monitor geometry and pointer position.
//!
//! Monitors are placed on one shared coordinate plane (the *screen*), in pixels, with the origin at
//! the top-left. A tablet is usually mapped either onto the whole screen or onto a single monitor.

#[cfg(any(test, feature = "serde"))]
mod serde;

use std::{fmt, io};

/// A point on the screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}

/// An axis-aligned rectangle on the screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rectangle {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Returns whether the rectangle covers no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns whether `pos` lies inside the rectangle.
    ///
    /// The left and top edges are inside, the right and bottom edges are not.
    pub fn contains(&self, pos: Position) -> bool {
        let [x, y] = [i64::from(pos.x), i64::from(pos.y)];
        x >= i64::from(self.x)
            && y >= i64::from(self.y)
            && x < i64::from(self.x) + i64::from(self.width)
            && y < i64::from(self.y) + i64::from(self.height)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A display server's view of the monitors and the pointer.
///
/// Implemented by the display-server binding.
pub trait Screen {
    /// Returns the geometry of every monitor, in the server's order.
    fn monitors(&self) -> io::Result<Vec<Rectangle>>;

    /// Returns the current position of the default seat's pointer.
    fn pointer_position(&self) -> io::Result<Position>;
}

/// Returns the smallest rectangle enclosing all non-empty `monitors`.
///
/// Returns [`None`] if there are no non-empty monitors.
pub fn bounding_box(monitors: &[Rectangle]) -> Option<Rectangle> {
    let mut iter = monitors.iter().filter(|m| !m.is_empty());
    let first = iter.next()?;
    let init = [
        i64::from(first.x),
        i64::from(first.y),
        i64::from(first.x) + i64::from(first.width),
        i64::from(first.y) + i64::from(first.height),
    ];
    let [left, top, right, bottom] = iter.fold(init, |[l, t, r, b], m| {
        [
            l.min(i64::from(m.x)),
            t.min(i64::from(m.y)),
            r.max(i64::from(m.x) + i64::from(m.width)),
            b.max(i64::from(m.y) + i64::from(m.height)),
        ]
    });

    Some(Rectangle::new(
        left as i32,
        top as i32,
        i32::try_from(right - left).unwrap_or(i32::MAX),
        i32::try_from(bottom - top).unwrap_or(i32::MAX),
    ))
}

/// Returns the first monitor that contains `pos`.
pub fn monitor_containing(monitors: &[Rectangle], pos: Position) -> Option<Rectangle> {
    monitors.iter().copied().find(|m| m.contains(pos))
}

/// Returns the monitor the pointer is currently on, if any.
pub fn monitor_under_pointer<S: Screen + ?Sized>(screen: &S) -> io::Result<Option<Rectangle>> {
    let monitors = screen.monitors()?;
    let pos = screen.pointer_position()?;
    let monitor = monitor_containing(&monitors, pos);
    log::trace!("pointer at {pos} is on monitor {monitor:?}");
    Ok(monitor)
}
