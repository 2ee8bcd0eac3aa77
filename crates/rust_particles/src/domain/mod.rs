//! Spatial domains
//!
//! A domain is a geometric region or surface that can:
//! - generate random points uniformly over its volume, area or length
//! - test whether a point lies inside it
//! - report the closest point on itself to a query point, with an outward normal
//! - intersect a line segment, reporting the first crossing and a normal that
//!   faces the side the segment started on
//!
//! The set of shapes is closed, so [`Domain`] is an enum that dispatches to
//! the per-shape types through the [`Shape`] trait.

mod aabox;
mod cone;
mod cylinder;
mod disc;
mod line;
mod plane;
mod point;
mod sphere;
pub(crate) mod surface;

pub use aabox::AABox;
pub use cone::Cone;
pub use cylinder::Cylinder;
pub use disc::Disc;
pub use line::Line;
pub use plane::Plane;
pub use point::Point;
pub use sphere::Sphere;

use std::cell::RefCell;
use std::rc::Rc;

use rand::RngCore;

use crate::foundation::math::Vec3;

/// Tolerance used for shell membership, tangential hits and cap crossings
pub const EPSILON: f32 = 1e-4;

/// Domain shared between controllers and the application
///
/// Controllers copy the domain at the start of each pass, so mutations made
/// through this handle take effect on the next frame.
pub type SharedDomain = Rc<RefCell<Domain>>;

/// Errors raised when constructing or mutating a domain
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A plane or disc normal had zero length
    #[error("normal vector must have non-zero length")]
    ZeroNormal,

    /// The end points of an axis coincide
    #[error("axis end points must not coincide")]
    DegenerateAxis,

    /// A radius was negative
    #[error("{name} must not be negative (got {value})")]
    NegativeRadius {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was rejected
        value: f32,
    },

    /// Outer radius smaller than inner radius
    #[error("outer radius {outer} must not be smaller than inner radius {inner}")]
    InvertedRadii {
        /// Inner radius
        inner: f32,
        /// Outer radius
        outer: f32,
    },

    /// A parameter was NaN or infinite
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Operations every domain shape supports
pub trait Shape {
    /// Random point drawn uniformly from the shape using `rng`
    fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3;

    /// Whether `point` lies inside the shape (boundary included)
    fn contains(&self, point: Vec3) -> bool;

    /// Closest point on the shape and the outward unit normal there
    ///
    /// The normal is zero when `point` is already inside the shape.
    fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3);

    /// First crossing of the segment `start → end` with the shape's surface
    ///
    /// The returned normal points toward the side `start` lies on.
    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)>;
}

/// A spatial domain
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Single point
    Point(Point),
    /// Line segment
    Line(Line),
    /// Infinite plane
    Plane(Plane),
    /// Axis-aligned box
    AABox(AABox),
    /// Solid, hollow or shell sphere
    Sphere(Sphere),
    /// Solid, annular or shell disc
    Disc(Disc),
    /// Solid, annular or shell cylinder
    Cylinder(Cylinder),
    /// Solid, annular or shell cone
    Cone(Cone),
}

impl Domain {
    fn shape(&self) -> &dyn Shape {
        match self {
            Self::Point(shape) => shape,
            Self::Line(shape) => shape,
            Self::Plane(shape) => shape,
            Self::AABox(shape) => shape,
            Self::Sphere(shape) => shape,
            Self::Disc(shape) => shape,
            Self::Cylinder(shape) => shape,
            Self::Cone(shape) => shape,
        }
    }

    /// Short name of the shape, used in log output
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Plane(_) => "plane",
            Self::AABox(_) => "aabox",
            Self::Sphere(_) => "sphere",
            Self::Disc(_) => "disc",
            Self::Cylinder(_) => "cylinder",
            Self::Cone(_) => "cone",
        }
    }

    /// Random point from the domain using the thread-local generator
    pub fn generate(&self) -> Vec3 {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Random point from the domain using the given generator
    pub fn generate_with(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.shape().generate_with(rng)
    }

    /// Whether the domain contains `point`
    pub fn contains(&self, point: Vec3) -> bool {
        self.shape().contains(point)
    }

    /// Closest point on the domain and the outward normal there
    pub fn closest_point_to(&self, point: Vec3) -> (Vec3, Vec3) {
        self.shape().closest_point_to(point)
    }

    /// First surface crossing along `start → end`
    pub fn intersect(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        self.shape().intersect(start, end)
    }

    /// Wrap the domain in a shared handle
    pub fn into_shared(self) -> SharedDomain {
        Rc::new(RefCell::new(self))
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Domain {
                fn from(shape: $variant) -> Self {
                    Self::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Point, Line, Plane, AABox, Sphere, Disc, Cylinder, Cone);
