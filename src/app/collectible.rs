use rand::Rng;

use super::Prefs;
use crate::basic::Point;
use crate::serpent::Serpent;

/// A pickup sitting on the board, waiting for the head to pass over it.
/// `pos` is the top-left corner of its bounding box.
#[derive(Copy, Clone, Debug)]
pub struct Collectible {
    pub pos: Point,
    pub size: f32,
}

impl Collectible {
    /// Axis-aligned overlap between this box and the head's box
    pub fn overlaps(&self, other_pos: Point, other_size: f32) -> bool {
        self.pos.x < other_pos.x + other_size
            && other_pos.x < self.pos.x + self.size
            && self.pos.y < other_pos.y + other_size
            && other_pos.y < self.pos.y + self.size
    }
}

/// Pick a random spot whose box touches neither the serpent nor another
/// collectible. Rejection sampling over the continuous board; gives up
/// after a bounded number of attempts when the board is crowded.
pub fn random_free_spot(
    serpent: &Serpent,
    collectibles: &[Collectible],
    prefs: &Prefs,
    rng: &mut impl Rng,
) -> Option<Point> {
    const ATTEMPTS: usize = 100;

    let size = prefs.collectible_size;
    for _ in 0..ATTEMPTS {
        let candidate = Collectible {
            pos: Point {
                x: rng.gen_range(0.0..prefs.bounds.x - size),
                y: rng.gen_range(0.0..prefs.bounds.y - size),
            },
            size,
        };

        let touches_serpent = serpent
            .segments()
            .iter()
            .any(|segment| candidate.overlaps(segment.pos, serpent.segment_size()));
        let touches_other = collectibles
            .iter()
            .any(|other| candidate.overlaps(other.pos, other.size));

        if !touches_serpent && !touches_other {
            return Some(candidate.pos);
        }
    }

    None
}

#[test]
fn test_overlaps() {
    let collectible = Collectible {
        pos: Point { x: 100., y: 100. },
        size: 9.,
    };

    let test_cases = [
        ((100., 100.), true),  // exactly on top
        ((95., 104.), true),   // partial overlap
        ((108., 108.), true),  // corners touching
        ((109., 100.), false), // flush against the right edge
        ((100., 91.), false),  // flush above
        ((130., 100.), false), // far away
    ];

    for ((x, y), expected) in test_cases {
        assert_eq!(
            collectible.overlaps(Point { x, y }, 9.),
            expected,
            "head at ({}, {})",
            x,
            y
        );
    }
}
