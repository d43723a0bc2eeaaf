//! Session state and the per-tick simulation: gravity integration, collision
//! detection, scoring and the START / PLAYING / GAME_OVER / WIN machine.
//!
//! Everything here is pure Rust with no browser types; the frame loop in the
//! parent module owns a [`Session`] and calls [`Session::tick`] once per
//! display refresh, while the input listeners call [`Session::interact`] /
//! [`Session::pointer`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::config::*;
use super::pipes::{Pipe, Pipes};

/// Exactly one state is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
    Win,
}

/// The player avatar. x is fixed for the whole session; y and velocity are
/// mutated every PLAYING tick by gravity and by jump impulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
}

impl Bird {
    fn at_start() -> Self {
        Self {
            x: BIRD_START_X,
            y: BIRD_START_Y,
            velocity: 0.0,
        }
    }
}

/// One play-through worth of mutable state, owned by the frame loop and
/// handed by reference to the input layer.
pub struct Session {
    pub state: GameState,
    pub bird: Bird,
    /// Created on the first restart; `None` only while in the initial START.
    pub pipes: Option<Pipes>,
    /// Horizontal ground scroll offset, kept in `(-width, 0]`.
    pub ground_x: f64,
    /// Drives sprite animation cycling (period 3).
    pub frame_count: u64,
    pub score: u32,
    /// Best score of the process lifetime; no durable storage.
    pub high_score: u32,
    rng: Pcg32,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::Start,
            bird: Bird::at_start(),
            pipes: None,
            ground_x: 0.0,
            frame_count: 0,
            score: 0,
            high_score: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advances the session by one tick. The frame counter and ground scroll
    /// always move; bird physics, obstacles, collision and scoring only run
    /// while PLAYING.
    pub fn tick(&mut self) {
        self.frame_count += 1;
        // Sign-preserving remainder keeps the offset in (-width, 0] so two
        // ground tiles drawn at ground_x and ground_x + width cover the canvas.
        self.ground_x = (self.ground_x - GROUND_SCROLL_STEP) % CANVAS_WIDTH;

        if self.state != GameState::Playing {
            return;
        }

        self.bird.velocity += GRAVITY;
        self.bird.y += self.bird.velocity;

        let mut hit_pipe = false;
        let mut passed_pair = false;
        if let Some(pipes) = self.pipes.as_mut() {
            pipes.tick();
            hit_pipe = collides(&self.bird, pipes);
            if !hit_pipe {
                // Upper and lower pipes move in lockstep, so checking the
                // upper list alone scores each pair exactly once.
                let bird_x = self.bird.x;
                if let Some(pipe) = pipes
                    .upper
                    .iter_mut()
                    .find(|p| !p.passed && p.x + PIPE_WIDTH < bird_x)
                {
                    pipe.passed = true;
                    passed_pair = true;
                }
            }
        }

        if hit_pipe {
            self.finish(GameState::GameOver);
            return;
        }
        if passed_pair {
            self.score += 1;
            if self.score >= WIN_SCORE {
                self.finish(GameState::Win);
                return;
            }
        }
        if self.bird.y + BIRD_HEIGHT / 2.0 > CANVAS_HEIGHT - GROUND_HEIGHT {
            self.finish(GameState::GameOver);
        }
    }

    /// A qualifying interaction: key press or tap. Jumps while PLAYING,
    /// (re)starts the session from any terminal or initial state.
    pub fn interact(&mut self) {
        match self.state {
            GameState::Start | GameState::GameOver | GameState::Win => self.restart(),
            GameState::Playing => self.bird.velocity = -JUMP_STRENGTH,
        }
    }

    /// A pointer event at canvas coordinates. While a game-over / win panel
    /// is shown only the restart button region qualifies; otherwise any tap
    /// is an interaction.
    pub fn pointer(&mut self, x: f64, y: f64) {
        match self.state {
            GameState::GameOver | GameState::Win => {
                let inside = x >= RESTART_BUTTON_X
                    && x <= RESTART_BUTTON_X + RESTART_BUTTON_WIDTH
                    && y >= RESTART_BUTTON_Y
                    && y <= RESTART_BUTTON_Y + RESTART_BUTTON_HEIGHT;
                if inside {
                    self.interact();
                }
            }
            GameState::Start | GameState::Playing => self.interact(),
        }
    }

    fn restart(&mut self) {
        self.bird = Bird::at_start();
        self.pipes = Some(Pipes::new(self.rng.random()));
        self.ground_x = 0.0;
        self.frame_count = 0;
        self.score = 0;
        self.state = GameState::Playing;
        log::info!("session started");
    }

    /// Ends the session: obstacles freeze in place, the high score is folded
    /// in, and the state machine moves to the terminal state.
    fn finish(&mut self, state: GameState) {
        debug_assert!(matches!(state, GameState::GameOver | GameState::Win));
        if let Some(pipes) = self.pipes.as_mut() {
            pipes.stop();
        }
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.state = state;
        log::info!("session finished: {:?}, score {}", state, self.score);
    }
}

/// Buffered AABB test of the bird against every pipe. Upper pipes hang from
/// the top, so they collide when the bird's top edge rises above their bottom
/// edge; lower pipes rise from the bottom and collide against the bird's
/// bottom edge.
fn collides(bird: &Bird, pipes: &Pipes) -> bool {
    let bird_left = bird.x - BIRD_WIDTH / 2.0 + COLLISION_BUFFER;
    let bird_right = bird.x + BIRD_WIDTH / 2.0 - COLLISION_BUFFER;
    let bird_top = bird.y - BIRD_HEIGHT / 2.0 + COLLISION_BUFFER;
    let bird_bottom = bird.y + BIRD_HEIGHT / 2.0 - COLLISION_BUFFER;

    let overlaps_x = |pipe: &Pipe| bird_right > pipe.x && bird_left < pipe.x + PIPE_WIDTH;

    pipes
        .upper
        .iter()
        .any(|pipe| overlaps_x(pipe) && bird_top < pipe.y + PIPE_HEIGHT)
        || pipes
            .lower
            .iter()
            .any(|pipe| overlaps_x(pipe) && bird_bottom > pipe.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_session() -> Session {
        let mut session = Session::new(42);
        session.interact();
        assert_eq!(session.state, GameState::Playing);
        session
    }

    #[test]
    fn gravity_accumulates_every_tick() {
        let mut session = playing_session();
        let mut prev = session.bird.velocity;
        for _ in 0..20 {
            session.tick();
            assert!((session.bird.velocity - prev - GRAVITY).abs() < 1e-12);
            prev = session.bird.velocity;
        }
    }

    #[test]
    fn jump_overrides_prior_velocity() {
        let mut session = playing_session();
        for _ in 0..10 {
            session.tick();
        }
        session.interact();
        assert_eq!(session.bird.velocity, -JUMP_STRENGTH);
    }

    #[test]
    fn ground_scroll_wraps_within_canvas_width() {
        let mut session = Session::new(1);
        for _ in 0..1000 {
            session.tick();
            assert!(session.ground_x > -CANVAS_WIDTH && session.ground_x <= 0.0);
        }
    }

    #[test]
    fn interactions_before_start_reset_cleanly() {
        let session = Session::new(9);
        assert_eq!(session.state, GameState::Start);
        assert!(session.pipes.is_none());
        let session = playing_session();
        assert_eq!(session.score, 0);
        assert_eq!(session.bird, Bird::at_start());
        assert_eq!(session.pipes.as_ref().map(Pipes::len), Some(2));
    }

    #[test]
    fn upper_pipe_collision_ends_the_session() {
        let mut session = playing_session();
        let pipes = session.pipes.as_mut().unwrap();
        // Park an obstacle pair right on top of the bird with no reachable gap.
        pipes.upper[0].x = BIRD_START_X - PIPE_WIDTH / 2.0;
        pipes.upper[0].y = BIRD_START_Y - PIPE_HEIGHT + BIRD_HEIGHT;
        pipes.lower[0].x = pipes.upper[0].x;
        session.tick();
        assert_eq!(session.state, GameState::GameOver);
        // Frozen thereafter: no velocity, no movement.
        let snapshot = session.pipes.as_ref().unwrap().upper[0];
        session.tick();
        assert_eq!(session.pipes.as_ref().unwrap().upper[0], snapshot);
    }

    #[test]
    fn near_miss_within_buffer_is_forgiven() {
        let mut session = playing_session();
        session.bird.velocity = -GRAVITY; // cancel this tick's gravity
        let pipes = session.pipes.as_mut().unwrap();
        let upper = &mut pipes.upper[0];
        upper.x = BIRD_START_X - PIPE_WIDTH / 2.0 + PIPE_SPEED;
        // Pipe bottom edge grazes the raw bird top but stays inside the buffer.
        upper.y = (BIRD_START_Y - BIRD_HEIGHT / 2.0 + COLLISION_BUFFER / 2.0) - PIPE_HEIGHT;
        let x = upper.x;
        pipes.lower[0].x = x;
        pipes.lower[0].y = CANVAS_HEIGHT + 100.0; // far out of reach
        pipes.upper[1].x = CANVAS_WIDTH * 2.0;
        pipes.lower[1].x = CANVAS_WIDTH * 2.0;
        session.tick();
        assert_eq!(session.state, GameState::Playing);
    }

    #[test]
    fn ground_contact_ends_the_session_on_that_tick() {
        let mut session = playing_session();
        let threshold = CANVAS_HEIGHT - GROUND_HEIGHT - BIRD_HEIGHT / 2.0;
        session.bird.y = threshold - 0.5; // crosses on the second tick
        session.bird.velocity = 0.0;
        // Clear obstacles out of the flight path.
        let pipes = session.pipes.as_mut().unwrap();
        for pipe in pipes.upper.iter_mut().chain(pipes.lower.iter_mut()) {
            pipe.x = CANVAS_WIDTH * 2.0;
        }
        session.tick();
        assert_eq!(session.state, GameState::Playing);
        session.tick();
        assert_eq!(session.state, GameState::GameOver);
    }

    #[test]
    fn each_pair_scores_exactly_once() {
        let mut session = playing_session();
        session.bird.y = CANVAS_HEIGHT * 0.4;
        let pipes = session.pipes.as_mut().unwrap();
        // Put the first pair just behind the bird, vertically out of reach.
        pipes.upper[0].x = BIRD_START_X - PIPE_WIDTH - 1.0;
        pipes.upper[0].y = -PIPE_HEIGHT;
        pipes.lower[0].x = pipes.upper[0].x;
        pipes.lower[0].y = CANVAS_HEIGHT + 100.0;
        pipes.stop(); // hold positions so only the passed flag can change
        session.bird.velocity = -GRAVITY;
        session.tick();
        assert_eq!(session.score, 1);
        session.bird.velocity = -GRAVITY;
        session.bird.y = CANVAS_HEIGHT * 0.4;
        session.tick();
        assert_eq!(session.score, 1, "passed pair must not score twice");
    }

    #[test]
    fn win_threshold_freezes_the_session() {
        let mut session = playing_session();
        session.score = WIN_SCORE - 1;
        session.bird.y = CANVAS_HEIGHT * 0.4;
        session.bird.velocity = -GRAVITY;
        let pipes = session.pipes.as_mut().unwrap();
        pipes.upper[0].x = BIRD_START_X - PIPE_WIDTH - 1.0;
        pipes.upper[0].y = -PIPE_HEIGHT;
        pipes.lower[0].x = pipes.upper[0].x;
        pipes.lower[0].y = CANVAS_HEIGHT + 100.0;
        pipes.stop();
        session.tick();
        assert_eq!(session.state, GameState::Win);
        assert_eq!(session.score, WIN_SCORE);
        assert_eq!(session.high_score, WIN_SCORE);
        let y = session.bird.y;
        session.tick();
        assert_eq!(session.bird.y, y, "bird frozen after WIN");
        assert_eq!(session.score, WIN_SCORE);
    }

    #[test]
    fn restart_requires_the_button_while_a_panel_shows() {
        let mut session = playing_session();
        session.bird.y = CANVAS_HEIGHT; // drive into the ground
        session.tick();
        assert_eq!(session.state, GameState::GameOver);

        session.pointer(1.0, 1.0); // outside the button: no-op
        assert_eq!(session.state, GameState::GameOver);

        session.pointer(
            RESTART_BUTTON_X + RESTART_BUTTON_WIDTH / 2.0,
            RESTART_BUTTON_Y + RESTART_BUTTON_HEIGHT / 2.0,
        );
        assert_eq!(session.state, GameState::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.bird, Bird::at_start());
    }

    #[test]
    fn high_score_persists_across_restarts_only() {
        let mut session = playing_session();
        session.score = 7;
        session.bird.y = CANVAS_HEIGHT;
        session.tick();
        assert_eq!(session.high_score, 7);

        session.interact(); // key restart from the panel
        assert_eq!(session.state, GameState::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.high_score, 7);

        session.score = 3;
        session.bird.y = CANVAS_HEIGHT;
        session.tick();
        assert_eq!(session.high_score, 7, "lower score keeps the old best");
    }
}
