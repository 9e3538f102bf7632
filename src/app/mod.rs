//! The session layer around the simulation core: game state switching,
//! score and multiplier bookkeeping, collectible spawning. The windowing,
//! rendering and input collaborators live outside this crate and drive a
//! [`Session`] through [`Session::tick`] and the query methods.

use rand::rngs::ThreadRng;

pub use collectible::Collectible;
pub use collisions::{find_collisions, Collision};
pub use prefs::Prefs;

mod collectible;
mod collisions;
mod prefs;

use crate::basic::Dir;
use crate::error::{Error, ErrorConversion, Result};
use crate::serpent::{Builder, BuilderError, Serpent};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum State {
    Playing,
    GameOver,
}

pub struct Session {
    pub serpent: Serpent,
    pub collectibles: Vec<Collectible>,
    pub prefs: Prefs,
    pub score: u32,
    pub eaten: u32,
    pub state: State,
    rng: ThreadRng,
}

impl Session {
    pub fn new(prefs: Prefs) -> Result<Self> {
        prefs.validate().with_trace_step("Session::new")?;
        let serpent = build_serpent(&prefs)
            .map_err(Error::from)
            .with_trace_step("Session::new")?;

        let mut session = Self {
            serpent,
            collectibles: vec![],
            prefs,
            score: 0,
            eaten: 0,
            state: State::Playing,
            rng: rand::thread_rng(),
        };
        session.replenish_collectibles();
        Ok(session)
    }

    pub fn multiplier(&self) -> u32 {
        1 + self.eaten / self.prefs.multiplier_step
    }

    /// One simulation step. Steering lands before the head advances, and
    /// collisions are swept only after every follower has been
    /// repositioned.
    pub fn tick(&mut self, elapsed: f32, steer: Option<Dir>) {
        if self.state != State::Playing {
            return;
        }

        if let Some(dir) = steer {
            self.serpent.request_turn(dir);
        }
        self.serpent.advance(elapsed);

        let collisions = find_collisions(&self.serpent, &self.collectibles, self.prefs.bounds);
        self.handle_collisions(&collisions);
    }

    fn handle_collisions(&mut self, collisions: &[Collision]) {
        let mut remove = vec![];
        for collision in collisions.iter().copied() {
            match collision {
                Collision::Collectible { index } => {
                    remove.push(index);
                    self.score += self.prefs.collectible_score * self.multiplier();
                    self.eaten += 1;
                    self.serpent.grow();
                    self.serpent.accelerate(self.prefs.speed_increment);
                }
                Collision::Itself { .. } | Collision::Wall => {
                    self.state = State::GameOver;
                }
            }
        }

        remove.sort_unstable();
        for index in remove.into_iter().rev() {
            self.collectibles.remove(index);
        }

        if self.state == State::Playing {
            self.replenish_collectibles();
        }
    }

    fn replenish_collectibles(&mut self) {
        while self.collectibles.len() < self.prefs.collectible_count {
            match collectible::random_free_spot(
                &self.serpent,
                &self.collectibles,
                &self.prefs,
                &mut self.rng,
            ) {
                Some(pos) => self.collectibles.push(Collectible {
                    pos,
                    size: self.prefs.collectible_size,
                }),
                None => {
                    eprintln!("warning: failed to spawn collectible, no free space left");
                    break;
                }
            }
        }
    }

    /// Discard the chain and its turn log wholesale and start over. There is
    /// no incremental teardown; nothing outside the session refers to the
    /// old chain.
    pub fn restart(&mut self) -> Result {
        self.serpent = build_serpent(&self.prefs)
            .map_err(Error::from)
            .with_trace_step("Session::restart")?;
        self.collectibles.clear();
        self.score = 0;
        self.eaten = 0;
        self.state = State::Playing;
        self.replenish_collectibles();
        Ok(())
    }
}

fn build_serpent(prefs: &Prefs) -> std::result::Result<Serpent, BuilderError> {
    Builder::default()
        .pos(prefs.start_pos)
        .dir(prefs.start_dir)
        .len(prefs.initial_len)
        .speed(prefs.speed)
        .segment_size(prefs.segment_size)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Point;

    fn test_session() -> Session {
        // a long empty corridor so nothing is hit by accident
        let prefs = Prefs::default()
            .bounds(Point { x: 400., y: 2000. })
            .initial_len(4)
            .collectible_count(1);
        let mut session = Session::new(Prefs {
            start_pos: Point { x: 100., y: 1000. },
            start_dir: Dir::D,
            ..prefs
        })
        .unwrap();
        // park the collectible out of the serpent's way
        session.collectibles[0].pos = Point { x: 300., y: 100. };
        session
    }

    #[test]
    fn test_eating_grows_scores_and_accelerates() {
        let mut session = test_session();
        let len = session.serpent.len();
        let speed = session.serpent.speed();

        // drop the collectible right under the head's path
        session.collectibles[0].pos = Point { x: 100., y: 1010. };
        session.tick(0.3, None); // head moves 15 down onto it

        assert_eq!(session.eaten, 1);
        assert_eq!(session.score, session.prefs.collectible_score);
        assert_eq!(session.serpent.len(), len + 1);
        assert!((session.serpent.speed() - (speed + session.prefs.speed_increment)).abs() < 1e-6);
        assert_eq!(session.state, State::Playing);
        // a replacement was spawned
        assert_eq!(session.collectibles.len(), 1);
    }

    #[test]
    fn test_wall_ends_the_game() {
        let prefs = Prefs::default().initial_len(4);
        let mut session = Session::new(prefs).unwrap();
        session.collectibles[0].pos = Point { x: 300., y: 250. };

        // head starts at (100, 100) going up; the top edge is 2 seconds away
        for _ in 0..25 {
            session.tick(0.1, None);
        }
        assert_eq!(session.state, State::GameOver);

        // dead sessions don't move
        let head = session.serpent.head_pos();
        session.tick(0.1, None);
        assert_eq!(session.serpent.head_pos(), head);
    }

    #[test]
    fn test_steering_is_applied_before_the_step() {
        let mut session = test_session();
        session.tick(0.1, Some(Dir::R));
        // the whole step happens on the new heading
        assert_eq!(session.serpent.head_pos(), Point { x: 105., y: 1000. });
        assert_eq!(session.serpent.turns_recorded(), 1);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = test_session();
        session.collectibles[0].pos = Point { x: 100., y: 1010. };
        session.tick(0.3, None);
        assert_eq!(session.eaten, 1);
        session.state = State::GameOver;

        session.restart().unwrap();

        assert_eq!(session.state, State::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.eaten, 0);
        assert_eq!(session.serpent.len(), session.prefs.initial_len);
        assert_eq!(session.serpent.head_pos(), session.prefs.start_pos);
        assert_eq!(session.collectibles.len(), 1);
    }

    #[test]
    fn test_multiplier_steps_up() {
        let mut session = test_session();
        assert_eq!(session.multiplier(), 1);
        session.eaten = session.prefs.multiplier_step;
        assert_eq!(session.multiplier(), 2);
    }
}
