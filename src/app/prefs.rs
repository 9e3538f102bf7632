use crate::basic::{Dir, Point};
use crate::error::{Error, Result};

/// Session tunables. Everything the board, the serpent and the scoring need
/// to start from; the simulation core itself only ever sees the values
/// relevant to it.
#[derive(Copy, Clone, Debug)]
pub struct Prefs {
    pub bounds: Point,
    pub start_pos: Point,
    pub start_dir: Dir,
    pub initial_len: usize,
    pub segment_size: f32,
    pub speed: f32,
    /// Added to the serpent's speed for every collectible eaten
    pub speed_increment: f32,

    pub collectible_size: f32,
    pub collectible_count: usize,
    pub collectible_score: u32,
    /// The score multiplier steps up every this many collectibles
    pub multiplier_step: u32,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            bounds: Point { x: 400., y: 300. },
            start_pos: Point { x: 100., y: 100. },
            start_dir: Dir::U,
            initial_len: 11,
            segment_size: 9.,
            speed: 50.,
            speed_increment: 2.,

            collectible_size: 9.,
            collectible_count: 1,
            collectible_score: 10,
            multiplier_step: 5,
        }
    }
}

// builder
impl Prefs {
    pub fn bounds(mut self, bounds: Point) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn initial_len(mut self, len: usize) -> Self {
        self.initial_len = len;
        self
    }

    pub fn collectible_count(mut self, count: usize) -> Self {
        self.collectible_count = count;
        self
    }

    pub(super) fn validate(&self) -> Result {
        if !(0. ..self.bounds.x).contains(&self.start_pos.x)
            || !(0. ..self.bounds.y).contains(&self.start_pos.y)
        {
            return Err(Error::prefs("start position out of bounds"));
        }
        if self.collectible_size <= 0. || self.collectible_size >= self.bounds.x.min(self.bounds.y)
        {
            return Err(Error::prefs("collectible does not fit the board"));
        }
        if self.multiplier_step == 0 {
            return Err(Error::prefs("`multiplier_step` must be at least 1"));
        }
        Ok(())
    }
}

#[test]
fn test_validate_rejects_out_of_bounds_start() {
    let prefs = Prefs::default().bounds(Point { x: 50., y: 50. });
    assert!(prefs.validate().is_err());
}
