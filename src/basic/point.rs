use std::ops::{Div, Mul};

/// A point (or displacement) in continuous board space
#[derive(Copy, Clone, Debug, PartialEq, Add, AddAssign, Sub, SubAssign)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Mul<Point> for f32 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        rhs * self
    }
}

impl Div<f32> for Point {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}

impl Point {
    #[must_use]
    pub fn magnitude(self) -> f32 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).magnitude()
    }
}
