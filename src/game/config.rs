//! Tuning constants for the whole game. Everything is expressed in logical
//! canvas units; the canvas itself is a fixed 288x512 surface.

pub const CANVAS_WIDTH: f64 = 288.0;
pub const CANVAS_HEIGHT: f64 = 512.0;

pub const BIRD_WIDTH: f64 = 34.0;
pub const BIRD_HEIGHT: f64 = 24.0;
pub const BIRD_START_X: f64 = CANVAS_WIDTH * 0.2;
pub const BIRD_START_Y: f64 = CANVAS_HEIGHT * 0.5;

pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_HEIGHT: f64 = 320.0;
pub const PIPE_GAP: f64 = 120.0;
/// Leftward scroll speed of every pipe, units per tick.
pub const PIPE_SPEED: f64 = 2.0;

/// Velocity increment applied to the bird every PLAYING tick.
pub const GRAVITY: f64 = 0.2;
/// A jump sets the bird velocity to exactly `-JUMP_STRENGTH`.
pub const JUMP_STRENGTH: f64 = 4.2;

/// Passing this many obstacle pairs wins the session.
pub const WIN_SCORE: u32 = 100;

/// The bird box is shrunk inward by this much on all sides before pipe
/// overlap tests, forgiving near-misses at sprite edges.
pub const COLLISION_BUFFER: f64 = 4.0;

/// Height of the scrolling ground band at the bottom of the canvas.
pub const GROUND_HEIGHT: f64 = 112.0;
/// Ground scroll decrement per tick (wraps modulo canvas width).
pub const GROUND_SCROLL_STEP: f64 = 2.0;

// Restart button hit box, shown over the game-over / win panels.
pub const RESTART_BUTTON_X: f64 = CANVAS_WIDTH / 2.0 - 60.0;
pub const RESTART_BUTTON_Y: f64 = CANVAS_HEIGHT / 2.0 + 50.0;
pub const RESTART_BUTTON_WIDTH: f64 = 120.0;
pub const RESTART_BUTTON_HEIGHT: f64 = 40.0;

// Score rendering: digit glyph sprites composed side by side, centered.
pub const DIGIT_WIDTH: f64 = 24.0;
pub const DIGIT_HEIGHT: f64 = 36.0;
pub const SCORE_Y: f64 = 20.0;
