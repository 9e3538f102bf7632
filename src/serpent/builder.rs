use super::*;
use std::fmt::{Display, Formatter};

#[derive(Debug, Error)]
#[must_use]
pub struct BuilderError(pub Box<Builder>, pub &'static str);

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "serpent builder error: {}", self.1)?;
        write!(f, "builder: {:?}", self.0)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Builder {
    pub pos: Option<Point>,
    pub dir: Option<Dir>,
    pub len: Option<usize>,
    pub speed: Option<f32>,
    pub segment_size: Option<f32>,
}

impl Builder {
    #[inline(always)]
    #[must_use]
    pub fn pos(mut self, value: Point) -> Self {
        self.pos = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn dir(mut self, value: Dir) -> Self {
        self.dir = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn len(mut self, value: usize) -> Self {
        self.len = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn speed(mut self, value: f32) -> Self {
        self.speed = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn segment_size(mut self, value: f32) -> Self {
        self.segment_size = Some(value);
        self
    }

    pub fn build(&self) -> Result<Serpent, BuilderError> {
        let pos = self
            .pos
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `pos`"))?;
        let dir = self
            .dir
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `dir`"))?;
        let len = self
            .len
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `len`"))?;
        let speed = self
            .speed
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `speed`"))?;
        let segment_size = self.segment_size.ok_or_else(|| {
            BuilderError(Box::new(self.clone()), "missing field `segment_size`")
        })?;

        if len == 0 {
            return Err(BuilderError(
                Box::new(self.clone()),
                "`len` must be at least 1",
            ));
        }
        if speed <= 0. {
            return Err(BuilderError(Box::new(self.clone()), "`speed` must be positive"));
        }
        if segment_size <= 0. {
            return Err(BuilderError(
                Box::new(self.clone()),
                "`segment_size` must be positive",
            ));
        }

        let head = Segment {
            pos,
            heading: dir.heading(),
            turn_cursor: 0,
            last_turn: None,
        };

        let mut serpent = Serpent {
            segments: vec![head],
            turn_log: TurnLog::default(),
            speed,
            segment_size,
        };
        for _ in 1..len {
            serpent.grow();
        }

        Ok(serpent)
    }
}

#[test]
fn test_build_places_segments_behind_the_head() {
    let serpent = Builder::default()
        .pos(Point { x: 50., y: 50. })
        .dir(Dir::R)
        .len(3)
        .speed(10.)
        .segment_size(9.)
        .build()
        .unwrap();

    assert_eq!(serpent.len(), 3);
    assert_eq!(serpent.head_pos(), Point { x: 50., y: 50. });
    assert_eq!(serpent.segments()[1].pos, Point { x: 40., y: 50. });
    assert_eq!(serpent.segments()[2].pos, Point { x: 30., y: 50. });
}

#[test]
fn test_build_missing_field() {
    let result = Builder::default()
        .pos(Point { x: 0., y: 0. })
        .len(3)
        .speed(10.)
        .segment_size(9.)
        .build();
    assert!(matches!(result, Err(BuilderError(_, "missing field `dir`"))));
}

#[test]
fn test_build_rejects_bad_values() {
    let builder = Builder::default()
        .pos(Point { x: 0., y: 0. })
        .dir(Dir::U)
        .speed(10.)
        .segment_size(9.);

    assert!(builder.clone().len(0).build().is_err());
    assert!(builder.clone().len(3).speed(0.).build().is_err());
    assert!(builder.len(3).segment_size(-1.).build().is_err());
}
