//! Scrolling obstacle field: pairs of pipes with a vertical gap, spawned
//! ahead of the right edge and recycled once fully off-screen to the left.
//!
//! The manager keeps two parallel vectors (upper / lower) in lock-step index
//! correspondence: `upper[i]` and `lower[i]` always share the same x position
//! and together define one gap. Randomness flows through an owned [`Pcg32`]
//! so tests can inject fixed seeds.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::config::*;

/// A single scrolling rectangle sprite with horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    /// Set once the bird has cleared this pipe, to score it exactly once.
    pub passed: bool,
}

impl Pipe {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vel_x: -PIPE_SPEED,
            passed: false,
        }
    }

    pub fn tick(&mut self) {
        self.x += self.vel_x;
    }
}

/// Obstacle pair manager.
pub struct Pipes {
    pub upper: Vec<Pipe>,
    pub lower: Vec<Pipe>,
    pub gap: f64,
    rng: Pcg32,
}

impl Pipes {
    /// Creates the manager with two pre-spawned pairs off the right edge:
    /// the first at `width + 3*pipe_width`, the second offset a further
    /// `3.5*pipe_width`, establishing the initial spacing.
    pub fn new(seed: u64) -> Self {
        let mut pipes = Self {
            upper: Vec::new(),
            lower: Vec::new(),
            gap: PIPE_GAP,
            rng: Pcg32::seed_from_u64(seed),
        };
        pipes.spawn_initial();
        pipes
    }

    fn spawn_initial(&mut self) {
        let (mut upper1, mut lower1) = self.make_random_pair();
        let first_x = CANVAS_WIDTH + PIPE_WIDTH * 3.0;
        upper1.x = first_x;
        lower1.x = first_x;
        self.upper.push(upper1);
        self.lower.push(lower1);

        let (mut upper2, mut lower2) = self.make_random_pair();
        upper2.x = first_x + PIPE_WIDTH * 3.5;
        lower2.x = first_x + PIPE_WIDTH * 3.5;
        self.upper.push(upper2);
        self.lower.push(lower2);
    }

    /// One simulation step: spawn at most one new pair if the rightmost has
    /// scrolled far enough in, drop pairs fully off-screen to the left, then
    /// advance every pipe by its velocity.
    pub fn tick(&mut self) {
        if self.can_spawn() {
            self.spawn_new();
        }
        self.remove_old();

        for pipe in &mut self.upper {
            pipe.tick();
        }
        for pipe in &mut self.lower {
            pipe.tick();
        }
    }

    /// Freezes every pipe in place (used when the session ends). Pipes stay
    /// visible but static.
    pub fn stop(&mut self) {
        for pipe in &mut self.upper {
            pipe.vel_x = 0.0;
        }
        for pipe in &mut self.lower {
            pipe.vel_x = 0.0;
        }
    }

    fn can_spawn(&self) -> bool {
        match self.upper.last() {
            Some(last) => CANVAS_WIDTH - (last.x + PIPE_WIDTH) > PIPE_WIDTH * 2.5,
            None => true,
        }
    }

    fn spawn_new(&mut self) {
        let (upper, lower) = self.make_random_pair();
        self.upper.push(upper);
        self.lower.push(lower);
    }

    fn remove_old(&mut self) {
        self.upper.retain(|pipe| pipe.x > -PIPE_WIDTH);
        self.lower.retain(|pipe| pipe.x > -PIPE_WIDTH);
    }

    /// Builds one pair just past the right edge. The gap top is sampled
    /// uniformly from `[0.2*height, 0.8*height - gap)`; the upper pipe is
    /// bottom-aligned to the gap top, the lower top-aligned to gap + gap size.
    fn make_random_pair(&mut self) -> (Pipe, Pipe) {
        let span = CANVAS_HEIGHT * 0.6 - self.gap;
        let gap_y = self.rng.random_range(0.0..span).floor() + (CANVAS_HEIGHT * 0.2).floor();
        let pipe_x = CANVAS_WIDTH + 10.0;

        let upper = Pipe::new(pipe_x, gap_y - PIPE_HEIGHT);
        let lower = Pipe::new(pipe_x, gap_y + self.gap);
        (upper, lower)
    }

    /// Number of live pairs.
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}
