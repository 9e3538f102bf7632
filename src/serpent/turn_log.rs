use crate::basic::{Heading, Point};

/// A point where the head changed heading. Segments refer to turn events by
/// index, never by copy, so every segment rounding the same corner sees
/// identical coordinates.
#[derive(Copy, Clone, Debug)]
pub struct TurnEvent {
    pub pos: Point,
    /// Heading the head arrived at the turn point with
    pub from: Heading,
    /// Heading the head left it with
    pub to: Heading,
}

/// Append-only record of the head's direction changes, ordered by insertion.
/// The log never shrinks or reorders.
#[derive(Debug, Default)]
pub struct TurnLog {
    events: Vec<TurnEvent>,
}

impl TurnLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TurnEvent> {
        self.events.get(index)
    }

    /// Append a turn at `pos` and return its index. A turn to the heading
    /// the head already has is dropped (`None`) so the log never contains
    /// zero-length corners.
    pub fn record(&mut self, pos: Point, from: Heading, to: Heading) -> Option<usize> {
        if to == from {
            return None;
        }
        self.events.push(TurnEvent { pos, from, to });
        Some(self.events.len() - 1)
    }
}

#[test]
fn test_record_and_get() {
    let mut log = TurnLog::default();
    assert!(log.is_empty());

    let down = Heading { x: 0, y: 1 };
    let right = Heading { x: 1, y: 0 };
    let up = Heading { x: 0, y: -1 };

    let first = log.record(Point { x: 1., y: 2. }, down, right);
    let second = log.record(Point { x: 3., y: 2. }, right, up);
    assert_eq!(first, Some(0));
    assert_eq!(second, Some(1));
    assert_eq!(log.len(), 2);

    assert_eq!(log.get(0).unwrap().to, right);
    assert_eq!(log.get(1).unwrap().from, right);
    assert!(log.get(2).is_none());
}

#[test]
fn test_degenerate_turn_dropped() {
    let mut log = TurnLog::default();
    let down = Heading { x: 0, y: 1 };

    assert_eq!(log.record(Point { x: 0., y: 0. }, down, down), None);
    assert!(log.is_empty());
}
