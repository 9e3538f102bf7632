use itertools::Itertools;
use static_assertions::assert_impl_all;

use crate::basic::{Dir, Heading, Point};

pub use builder::{Builder, BuilderError};
pub use turn_log::{TurnEvent, TurnLog};

pub mod builder;
mod turn_log;

/// A single body element. Plain value state exclusively owned by the chain;
/// a follower only ever reads its leader's already-committed values.
#[derive(Copy, Clone, Debug)]
pub struct Segment {
    pub pos: Point,
    /// Derived from observed displacement, not copied from the leader
    pub heading: Heading,
    /// Number of turn events this segment has already turned on.
    /// Non-decreasing, never exceeds the length of the owning chain's log.
    turn_cursor: usize,
    last_turn: Option<usize>,
}

impl Segment {
    pub fn turn_cursor(&self) -> usize {
        self.turn_cursor
    }

    /// Index of the most recent turn event this segment turned on
    pub fn last_turn(&self) -> Option<usize> {
        self.last_turn
    }

    /// Commit a move to `target`. A heading change means the segment has
    /// just rounded a corner of its own: it consumes the next pending turn
    /// event, if one exists.
    fn step_to(&mut self, target: Point, turns_recorded: usize) {
        let heading = Heading::between(self.pos, target);
        if heading != self.heading && self.turn_cursor < turns_recorded {
            self.last_turn = Some(self.turn_cursor);
            self.turn_cursor += 1;
        }
        self.heading = heading;
        self.pos = target;
    }
}

/// The whole chain: segments in head-to-tail order plus the turn log they
/// replay. The leader/follower relation is implicit in segment order.
pub struct Serpent {
    segments: Vec<Segment>,
    turn_log: TurnLog,
    speed: f32,
    segment_size: f32,
}

assert_impl_all!(Serpent: Send, Sync);

impl Serpent {
    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn head_pos(&self) -> Point {
        self.head().pos
    }

    pub fn heading(&self) -> Heading {
        self.head().heading
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn segment_size(&self) -> f32 {
        self.segment_size
    }

    /// Distance at which one segment trails the next along the direction of
    /// travel
    pub fn spacing(&self) -> f32 {
        self.segment_size + 1.
    }

    pub fn turns_recorded(&self) -> usize {
        self.turn_log.len()
    }

    /// Total polyline length of the body, sampled at segment positions
    pub fn path_length(&self) -> f32 {
        self.segments
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.pos.distance_to(b.pos))
            .sum()
    }

    /// Speed only ever ramps up over a session
    pub fn accelerate(&mut self, delta: f32) {
        self.speed += delta.max(0.);
    }

    /// Change the head's heading. A request matching the current heading is
    /// dropped without touching the log. The head authors every turn event,
    /// so its cursor stays caught up and head motion is always
    /// straight-line.
    pub fn request_turn(&mut self, dir: Dir) {
        let head = &mut self.segments[0];
        let to = dir.heading();
        if let Some(index) = self.turn_log.record(head.pos, head.heading, to) {
            head.heading = to;
            head.last_turn = Some(index);
            head.turn_cursor = index + 1;
        }
    }

    /// Advance the whole chain by `elapsed` seconds. The head dead-reckons
    /// along its current heading; every follower is then repositioned in
    /// strict leader-to-follower order, each reading its leader's
    /// already-updated state.
    pub fn advance(&mut self, elapsed: f32) {
        let displacement = self.speed * elapsed;
        let head = &mut self.segments[0];
        head.pos += head.heading.vector() * displacement;

        let turns_recorded = self.turn_log.len();
        for i in 1..self.segments.len() {
            let leader = self.segments[i - 1];
            let target = self.follow_target(&leader, &self.segments[i]);
            self.segments[i].step_to(target, turns_recorded);
        }
    }

    /// Where a follower should move this step, derived from its leader's new
    /// state. Following the leader's recorded path rather than its
    /// instantaneous position is what bends the body around corners.
    fn follow_target(&self, leader: &Segment, segment: &Segment) -> Point {
        let spacing = self.spacing();

        // the most recent turn point this segment has turned on
        let last_turn = segment
            .turn_cursor
            .checked_sub(1)
            .and_then(|index| self.turn_log.get(index));

        match last_turn {
            // The corner is interpolated while the leader is within one
            // spacing unit of the pivot: the target sits `spacing`
            // path-units behind the leader, walked back along the post-turn
            // leg to the pivot and then along the pre-turn heading. At
            // exactly one spacing unit both branches coincide, so the
            // hand-off preserves path length.
            Some(turn) if leader.pos.distance_to(turn.pos) < spacing => {
                let diff = leader.pos - turn.pos;
                let pull = (-turn.from).vector();
                leader.pos
                    + Point {
                        x: -diff.x + (spacing - diff.y.abs()) * pull.x,
                        y: -diff.y + (spacing - diff.x.abs()) * pull.y,
                    }
            }
            // straight-following: trail one spacing unit behind the leader
            // along its current heading
            _ => leader.pos - leader.heading.vector() * spacing,
        }
    }

    /// Append a segment behind the current tail. The new tail starts one
    /// spacing unit behind its leader and picks up turn consumption from the
    /// same point in history.
    pub fn grow(&mut self) {
        let spacing = self.spacing();
        let tail = *self.segments.last().expect("grow on a chain with no head");
        self.segments.push(Segment {
            pos: tail.pos - tail.heading.vector() * spacing,
            heading: tail.heading,
            turn_cursor: tail.turn_cursor,
            last_turn: tail.last_turn,
        });
    }

    /// Index of the first trailing segment the head is touching, walking
    /// from the neck towards the tail
    pub fn self_collision_index(&self) -> Option<usize> {
        let head = self.head().pos;
        let threshold = self.segment_size / 2.;
        self.segments
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, segment)| head.distance_to(segment.pos) < threshold)
            .map(|(index, _)| index)
    }

    /// Whether the head has come within half a segment width of any trailing
    /// segment
    pub fn is_self_colliding(&self) -> bool {
        self.self_collision_index().is_some()
    }
}

#[cfg(test)]
const TOLERANCE: f32 = 1e-3;

#[cfg(test)]
fn test_serpent(len: usize) -> Serpent {
    Builder::default()
        .pos(Point { x: 100., y: 100. })
        .dir(Dir::D)
        .len(len)
        .speed(50.)
        .segment_size(9.)
        .build()
        .unwrap()
}

#[cfg(test)]
fn assert_near(a: Point, b: Point) {
    assert!(
        a.distance_to(b) < TOLERANCE,
        "expected {:?} to be at {:?}",
        a,
        b
    );
}

#[test]
fn test_straight_line_motion() {
    let mut serpent = test_serpent(4);
    serpent.advance(1.);

    let expected = [(100., 150.), (100., 140.), (100., 130.), (100., 120.)];
    for (segment, (x, y)) in serpent.segments().iter().zip(expected) {
        assert_near(segment.pos, Point { x, y });
        assert_eq!(segment.heading, Dir::D.heading());
    }

    // spacing survives any number of small steps
    for _ in 0..100 {
        serpent.advance(0.016);
    }
    for (a, b) in serpent.segments().iter().tuple_windows() {
        assert!((a.pos.distance_to(b.pos) - serpent.spacing()).abs() < TOLERANCE);
    }
}

#[test]
fn test_follower_rounds_the_corner() {
    let mut serpent = test_serpent(2);
    serpent.advance(1.);
    let corner = serpent.head_pos(); // (100, 150)
    serpent.request_turn(Dir::R);

    // while the head is within one spacing unit past the pivot, the
    // follower is pulled down the pre-turn leg towards the pivot, keeping
    // the path distance between them at one spacing unit
    for _ in 0..10 {
        serpent.advance(0.01); // 0.5 units per step
    }
    let head = serpent.head_pos();
    let follower = serpent.segments()[1].pos;
    let past_pivot = head.x - corner.x;
    assert!((past_pivot - 5.).abs() < TOLERANCE);
    assert_near(follower, Point { x: corner.x, y: corner.y - (10. - past_pivot) });

    // once the head is a full spacing unit past the pivot the follower has
    // reached it and resumes straight-line trailing
    for _ in 0..12 {
        serpent.advance(0.01);
    }
    let head = serpent.head_pos();
    assert_near(serpent.segments()[1].pos, head - Point { x: 10., y: 0. });
    assert_eq!(serpent.segments()[1].heading, Dir::R.heading());
    assert_eq!(serpent.segments()[1].last_turn(), Some(0));
}

#[test]
fn test_turn_propagates_head_to_tail() {
    let mut serpent = test_serpent(4);
    serpent.advance(1.);
    serpent.request_turn(Dir::R);

    let right = Dir::R.heading();
    // step at which each trailing segment settled on the post-turn heading
    let mut adopted = [0usize; 4];
    adopted[0] = 1; // the head turns the moment the command lands
    for step in 1..=200 {
        serpent.advance(0.01);
        for (i, segment) in serpent.segments().iter().enumerate() {
            if adopted[i] == 0 && segment.heading == right {
                adopted[i] = step;
            }
        }
    }

    assert!(
        adopted.iter().all(|&step| step > 0),
        "some segment never adopted the new heading: {:?}",
        adopted
    );
    for pair in adopted.windows(2) {
        assert!(
            pair[0] < pair[1],
            "segment turned before its leader: {:?}",
            adopted
        );
    }

    // with the corner fully rounded the chain is straight again and no
    // length was gained or lost on the way around
    let expected = serpent.spacing() * (serpent.len() - 1) as f32;
    assert!((serpent.path_length() - expected).abs() < 0.1);
    for (a, b) in serpent.segments().iter().tuple_windows() {
        assert!((a.pos.distance_to(b.pos) - serpent.spacing()).abs() < 0.1);
    }
}

#[test]
fn test_growth() {
    let mut serpent = test_serpent(3);
    serpent.advance(0.5);
    let tail_cursor = serpent.segments().last().unwrap().turn_cursor();

    for _ in 0..4 {
        serpent.grow();
    }

    assert_eq!(serpent.len(), 7);
    assert_eq!(serpent.segments().last().unwrap().turn_cursor(), tail_cursor);
    for (a, b) in serpent.segments().iter().tuple_windows() {
        assert!((a.pos.distance_to(b.pos) - serpent.spacing()).abs() < TOLERANCE);
        assert_eq!(b.heading, a.heading);
    }
}

#[test]
fn test_self_collision() {
    let mut serpent = test_serpent(5);
    serpent.advance(1.);
    assert!(!serpent.is_self_colliding());

    // force the head onto the third trailing segment
    let target = serpent.segments[3].pos;
    serpent.segments[0].pos = target + Point { x: 2., y: 0. };
    assert!(serpent.is_self_colliding());
    assert_eq!(serpent.self_collision_index(), Some(3));

    serpent.segments[0].pos = target + Point { x: 20., y: 0. };
    assert!(!serpent.is_self_colliding());
}

#[test]
fn test_lone_head_never_collides() {
    let mut serpent = test_serpent(1);
    serpent.advance(1.);
    assert!(!serpent.is_self_colliding());
}

#[test]
fn test_degenerate_turn_is_a_no_op() {
    let mut serpent = test_serpent(3);
    serpent.advance(0.1);
    let cursors: Vec<_> = serpent.segments().iter().map(Segment::turn_cursor).collect();

    for _ in 0..5 {
        serpent.request_turn(Dir::D); // current heading
    }

    assert_eq!(serpent.turns_recorded(), 0);
    assert_eq!(serpent.heading(), Dir::D.heading());
    let after: Vec<_> = serpent.segments().iter().map(Segment::turn_cursor).collect();
    assert_eq!(cursors, after);
}

#[test]
fn test_cursor_never_outruns_the_log() {
    let mut serpent = test_serpent(4);
    serpent.advance(1.);
    serpent.request_turn(Dir::R);
    for _ in 0..100 {
        serpent.advance(0.02);
    }
    serpent.request_turn(Dir::U);
    for _ in 0..100 {
        serpent.advance(0.02);
    }

    for segment in serpent.segments() {
        assert!(segment.turn_cursor() <= serpent.turns_recorded());
    }
}
