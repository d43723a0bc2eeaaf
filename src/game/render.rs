//! Canvas drawing for one frame. Draw calls tolerate failure (`.ok()`) and
//! simply skip a sprite for the frame rather than abort the loop.

use web_sys::CanvasRenderingContext2d;

use super::assets::Assets;
use super::config::*;
use super::pipes::Pipes;
use super::session::{GameState, Session};

/// Clears the canvas and redraws the whole scene for the current state.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, assets: &Assets, session: &Session) {
    ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);

    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        &assets.background,
        0.0,
        0.0,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
    )
    .ok();

    if let Some(pipes) = session.pipes.as_ref() {
        draw_pipes(ctx, assets, pipes);
    }
    draw_ground(ctx, assets, session.ground_x);
    draw_bird(ctx, assets, session);

    match session.state {
        GameState::Playing => draw_score(ctx, assets, session.score),
        GameState::Start => {
            ctx.draw_image_with_html_image_element(
                &assets.get_ready,
                CANVAS_WIDTH / 2.0 - 92.0,
                CANVAS_HEIGHT / 2.0 - 150.0,
            )
            .ok();
        }
        GameState::GameOver => {
            ctx.draw_image_with_html_image_element(
                &assets.game_over,
                CANVAS_WIDTH / 2.0 - 96.0,
                CANVAS_HEIGHT / 2.0 - 42.0,
            )
            .ok();
            draw_restart_button(ctx, assets);
            draw_score(ctx, assets, session.score);
        }
        GameState::Win => draw_win_panel(ctx, assets, session.score),
    }
}

fn draw_pipes(ctx: &CanvasRenderingContext2d, assets: &Assets, pipes: &Pipes) {
    for pipe in &pipes.upper {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &assets.pipe_top,
            pipe.x,
            pipe.y,
            PIPE_WIDTH,
            PIPE_HEIGHT,
        )
        .ok();
    }
    for pipe in &pipes.lower {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &assets.pipe_bottom,
            pipe.x,
            pipe.y,
            PIPE_WIDTH,
            PIPE_HEIGHT,
        )
        .ok();
    }
}

// Two tiles side by side; ground_x stays in (-width, 0] so they always cover
// the canvas seamlessly.
fn draw_ground(ctx: &CanvasRenderingContext2d, assets: &Assets, ground_x: f64) {
    let y = CANVAS_HEIGHT - GROUND_HEIGHT;
    for offset in [0.0, CANVAS_WIDTH] {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &assets.base,
            ground_x + offset,
            y,
            CANVAS_WIDTH,
            GROUND_HEIGHT,
        )
        .ok();
    }
}

fn draw_bird(ctx: &CanvasRenderingContext2d, assets: &Assets, session: &Session) {
    let frame = &assets.bird[(session.frame_count % 3) as usize];
    ctx.save();
    ctx.translate(session.bird.x, session.bird.y).ok();
    // Nose dips proportionally to fall speed.
    ctx.rotate(session.bird.velocity * 0.1).ok();
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        frame,
        -BIRD_WIDTH / 2.0,
        -BIRD_HEIGHT / 2.0,
        BIRD_WIDTH,
        BIRD_HEIGHT,
    )
    .ok();
    ctx.restore();
}

fn draw_score(ctx: &CanvasRenderingContext2d, assets: &Assets, score: u32) {
    let digits: Vec<usize> = score
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let total_width = digits.len() as f64 * DIGIT_WIDTH;
    let start_x = (CANVAS_WIDTH - total_width) / 2.0;
    for (i, digit) in digits.iter().enumerate() {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &assets.digits[*digit],
            start_x + i as f64 * DIGIT_WIDTH,
            SCORE_Y,
            DIGIT_WIDTH,
            DIGIT_HEIGHT,
        )
        .ok();
    }
}

fn draw_restart_button(ctx: &CanvasRenderingContext2d, assets: &Assets) {
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        &assets.restart_button,
        RESTART_BUTTON_X,
        RESTART_BUTTON_Y,
        RESTART_BUTTON_WIDTH,
        RESTART_BUTTON_HEIGHT,
    )
    .ok();
}

fn draw_win_panel(ctx: &CanvasRenderingContext2d, assets: &Assets, score: u32) {
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_align("center");
    ctx.set_font("30px Arial");
    ctx.fill_text(
        "You Won!",
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0 - 20.0,
    )
    .ok();
    ctx.set_font("20px Arial");
    ctx.fill_text(
        &format!("Score: {score}"),
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0 + 20.0,
    )
    .ok();
    draw_restart_button(ctx, assets);
}
