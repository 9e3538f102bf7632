use super::Collectible;
use crate::basic::Point;
use crate::serpent::Serpent;

#[derive(Copy, Clone, Debug)]
pub enum Collision {
    /// head passed over a collectible
    Collectible { index: usize },
    /// head came too close to one of its own trailing segments
    Itself { segment_index: usize },
    /// head left the board
    Wall,
}

/// Sweep the board for everything the head ran into this step. Called once
/// per step, after every segment has been repositioned.
pub fn find_collisions(
    serpent: &Serpent,
    collectibles: &[Collectible],
    bounds: Point,
) -> Vec<Collision> {
    let mut collisions = vec![];

    let head = serpent.head_pos();
    let head_size = serpent.segment_size();

    for (index, collectible) in collectibles.iter().enumerate() {
        if collectible.overlaps(head, head_size) {
            collisions.push(Collision::Collectible { index });
        }
    }

    if head.x < 0. || head.y < 0. || head.x + head_size > bounds.x || head.y + head_size > bounds.y
    {
        collisions.push(Collision::Wall);
    }

    if let Some(segment_index) = serpent.self_collision_index() {
        collisions.push(Collision::Itself { segment_index });
    }

    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Dir;
    use crate::serpent::Builder;

    fn serpent_at(x: f32, y: f32) -> Serpent {
        Builder::default()
            .pos(Point { x, y })
            .dir(Dir::R)
            .len(3)
            .speed(10.)
            .segment_size(9.)
            .build()
            .unwrap()
    }

    #[test]
    fn test_wall_collision() {
        let bounds = Point { x: 400., y: 300. };
        let inside = find_collisions(&serpent_at(100., 100.), &[], bounds);
        assert!(inside.is_empty());

        for (x, y) in [(-1., 100.), (100., -0.5), (392., 100.), (100., 295.)] {
            let found = find_collisions(&serpent_at(x, y), &[], bounds);
            assert!(
                matches!(found.as_slice(), [Collision::Wall]),
                "head at ({}, {}): {:?}",
                x,
                y,
                found
            );
        }
    }

    #[test]
    fn test_collectible_collision() {
        let serpent = serpent_at(100., 100.);
        let collectibles = [
            Collectible { pos: Point { x: 104., y: 104. }, size: 9. },
            Collectible { pos: Point { x: 300., y: 200. }, size: 9. },
        ];

        let found = find_collisions(&serpent, &collectibles, Point { x: 400., y: 300. });
        assert!(matches!(
            found.as_slice(),
            [Collision::Collectible { index: 0 }]
        ));
    }
}
