use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub trait Abs {
    fn abs(self) -> Self;
}

macro_rules! impl_trait {
    ($trait_name:ident, $method:ident, $($T:ty),+) => {
        $(impl $trait_name for $T {
            fn $method(self) -> Self {
                self.$method()
            }
        })+
    };
}
impl Abs for u32 {
    fn abs(self) -> Self {
        self
    }
}
impl_trait!(Abs, abs, f32, f64, i32, i64);

pub trait Calc:
    Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Sized
    + PartialOrd
    + Abs
    + Clone
    + Copy
{
}
impl<T> Calc for T where
    T: Add<Output = Self>
        + Sub<Output = Self>
        + Mul<Output = Self>
        + Div<Output = Self>
        + Sized
        + PartialOrd
        + Abs
        + Clone
        + Copy
{
}

pub fn floats_close(x: TPtF, y: TPtF) -> bool {
    (x - y).abs() < 1e-10
}

pub type ShapeI = Shape<u32>;
pub type ShapeF = Shape<f64>;

impl From<ShapeI> for ShapeF {
    fn from(value: ShapeI) -> Self {
        Self {
            w: f64::from(value.w),
            h: f64::from(value.h),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Shape<T>
where
    T: Calc,
{
    pub w: T,
    pub h: T,
}
impl<T> Shape<T>
where
    T: Calc,
{
    pub fn new(w: T, h: T) -> Self {
        Self { w, h }
    }
}

impl ShapeI {
    pub fn from_im<I>(im: &I) -> Self
    where
        I: GenericImageView,
    {
        Self {
            w: im.width(),
            h: im.height(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T>
where
    T: Calc,
{
    /// z-component of the 3d cross product, twice the signed area of the triangle (0, self, rhs)
    pub fn cross(&self, rhs: &Self) -> T {
        self.x * rhs.y - rhs.x * self.y
    }
}

impl<T> From<(T, T)> for Point<T>
where
    T: Calc,
{
    fn from(value: (T, T)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

pub type TPtF = f64;
pub type TPtI = i32;
pub type PtF = Point<TPtF>;
pub type PtI = Point<TPtI>;

impl PtF {
    /// Maps normalized coordinates to pixel coordinates of an image with the given shape.
    /// Fractions of pixels are truncated towards zero.
    #[must_use]
    pub fn to_pixel(&self, shape: ShapeI) -> PtI {
        let shape = ShapeF::from(shape);
        Point {
            x: (self.x * shape.w) as TPtI,
            y: (self.y * shape.h) as TPtI,
        }
    }
}

#[test]
fn test_to_pixel() {
    let shape = ShapeI::new(640, 480);
    assert_eq!(PtF { x: 0.0, y: 0.0 }.to_pixel(shape), PtI { x: 0, y: 0 });
    assert_eq!(PtF { x: 0.5, y: 0.5 }.to_pixel(shape), PtI { x: 320, y: 240 });
    assert_eq!(PtF { x: 1.0, y: 1.0 }.to_pixel(shape), PtI { x: 640, y: 480 });
    // truncation instead of rounding
    assert_eq!(
        PtF {
            x: 0.9999,
            y: 0.0021
        }
        .to_pixel(shape),
        PtI { x: 639, y: 1 }
    );
}

#[test]
fn test_cross() {
    let p1 = PtF { x: 1.0, y: 0.0 };
    let p2 = PtF { x: 0.0, y: 1.0 };
    assert!(floats_close(p1.cross(&p2), 1.0));
    assert!(floats_close(p2.cross(&p1), -1.0));
    assert!(floats_close(p1.cross(&p1), 0.0));
}
