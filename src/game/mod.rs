//! Browser glue: canvas setup, sprite loading, input listeners and the
//! requestAnimationFrame loop. All gameplay rules live in the pure
//! [`session`] / [`pipes`] modules; this module owns one [`Session`] in a
//! thread-local cell and drives it once per display refresh.
//!
//! Everything runs on one logical thread of control: input callbacks mutate
//! the session synchronously and the next tick observes the change. The only
//! asynchronous step is the bulk sprite load, which must fully resolve before
//! the first frame is scheduled; the lifecycle phase below spans that window
//! so a teardown (or a second start) during the load leaves the loop stopped.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

mod assets;
pub mod config;
pub mod pipes;
mod render;
pub mod session;

use assets::Assets;
use session::Session;

/// Everything the frame loop needs, owned behind the thread-local cell.
struct ArcadeState {
    ctx: CanvasRenderingContext2d,
    assets: Assets,
    session: Session,
}

/// Start/teardown lifecycle. Set synchronously by `start_arcade_mode` so the
/// async sprite-load continuation can tell whether the game it was loading
/// for is still wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecyclePhase {
    Idle,
    Loading,
    Running,
}

impl LifecyclePhase {
    /// Idle -> Loading; any other phase means a start is already in flight.
    fn start(self) -> Option<Self> {
        matches!(self, Self::Idle).then_some(Self::Loading)
    }

    /// Loading -> Running. A teardown during the load window has already
    /// reset the phase to Idle, so the loop must not start.
    fn finish_loading(self) -> Option<Self> {
        matches!(self, Self::Loading).then_some(Self::Running)
    }
}

thread_local! {
    static ARCADE_STATE: std::cell::RefCell<Option<ArcadeState>> =
        std::cell::RefCell::new(None);
    static RAF_HANDLE: std::cell::Cell<Option<i32>> = std::cell::Cell::new(None);
    static PHASE: std::cell::Cell<LifecyclePhase> = std::cell::Cell::new(LifecyclePhase::Idle);
    static LISTENERS_BOUND: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Applies a phase transition; returns false (state untouched) if the
/// transition is not valid from the current phase.
fn advance_phase(step: fn(LifecyclePhase) -> Option<LifecyclePhase>) -> bool {
    PHASE.with(|phase| match step(phase.get()) {
        Some(next) => {
            phase.set(next);
            true
        }
        None => false,
    })
}

fn reset_phase() {
    PHASE.with(|phase| phase.set(LifecyclePhase::Idle));
}

pub fn start_arcade_mode() -> Result<(), JsValue> {
    // Already loading or running: keep the existing game.
    if !advance_phase(LifecyclePhase::start) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the fixed-size playfield canvas.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("fb-arcade-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("fb-arcade-canvas");
        c.set_width(config::CANVAS_WIDTH as u32);
        c.set_height(config::CANVAS_HEIGHT as u32);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border:4px solid #d4a017; border-radius:10px; box-shadow:0 0 24px 0 rgba(0,0,0,0.25); background:#70c5ce; z-index:20;").ok();
        doc.body().unwrap().append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;

    // High-score overlay (session-lifetime only, no durable storage).
    if doc.get_element_by_id("fb-highscore").is_none() {
        if let Some(body) = doc.body() {
            let div = doc.create_element("div")?;
            div.set_id("fb-highscore");
            div.set_text_content(Some("High Score: 0"));
            div.set_attribute("style", "position:fixed; left:50%; top:calc(50% + 276px); transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:16px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:30;").ok();
            body.append_child(&div)?;
        }
    }

    // The forgotten listeners live for the page lifetime and no-op while no
    // session exists, so they are bound at most once even across restarts.
    if !LISTENERS_BOUND.with(|bound| bound.replace(true)) {
        // Space is the jump / confirm key.
        {
            let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
                if evt.code() == "Space" {
                    evt.prevent_default();
                    ARCADE_STATE.with(|cell| {
                        if let Some(state) = cell.borrow_mut().as_mut() {
                            state.session.interact();
                        }
                    });
                }
            }) as Box<dyn FnMut(_)>);
            doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Clicks use canvas-local offset coordinates, so the restart-button
        // hit box can be tested directly against them.
        {
            let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
                let x = evt.offset_x() as f64;
                let y = evt.offset_y() as f64;
                ARCADE_STATE.with(|cell| {
                    if let Some(state) = cell.borrow_mut().as_mut() {
                        state.session.pointer(x, y);
                    }
                });
            }) as Box<dyn FnMut(_)>);
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    // Load every sprite, then start the loop. A single failed image aborts
    // startup and the loop never runs; a teardown while the load is in
    // flight wins over it.
    spawn_local(async move {
        match Assets::load().await {
            Ok(assets) => {
                if !advance_phase(LifecyclePhase::finish_loading) {
                    log::info!("torn down during sprite load, frame loop not started");
                    return;
                }
                ARCADE_STATE.with(|cell| {
                    cell.replace(Some(ArcadeState {
                        ctx,
                        assets,
                        session: Session::new(entropy_seed()),
                    }))
                });
                log::info!("sprites loaded, starting frame loop");
                start_frame_loop();
            }
            Err(err) => {
                reset_phase();
                log::error!("sprite load failed, game not started: {err:?}");
            }
        }
    });
    Ok(())
}

/// Tears the game down: resets the lifecycle phase (which also disarms a
/// sprite load still in flight), cancels the scheduled frame callback at
/// most once, and drops the session.
pub fn stop_arcade_mode() {
    reset_phase();
    if let Some(id) = RAF_HANDLE.with(|h| h.take()) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(id);
        }
    }
    ARCADE_STATE.with(|cell| cell.borrow_mut().take());
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let alive = ARCADE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                frame_tick(state);
                true
            } else {
                false
            }
        });
        // Re-schedule only while the session exists and teardown has not
        // taken the handle.
        if alive && RAF_HANDLE.with(|h| h.get().is_some()) {
            if let Some(win) = window() {
                if let Ok(id) = win
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
                {
                    RAF_HANDLE.with(|h| h.set(Some(id)));
                }
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(win) = window() {
        if let Ok(id) =
            win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        {
            RAF_HANDLE.with(|h| h.set(Some(id)));
        }
    }
}

fn frame_tick(state: &mut ArcadeState) {
    state.session.tick();
    render::draw_frame(&state.ctx, &state.assets, &state.session);

    // Keep the DOM high-score overlay current.
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("fb-highscore") {
            el.set_text_content(Some(&format!("High Score: {}", state.session.high_score)));
        }
    }
}

// performance.now() bits through an LCG step; prototype randomness for gap
// placement, not crypto secure.
fn entropy_seed() -> u64 {
    let now = window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    now.to_bits()
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test runs on its own thread, so the thread-local phase starts Idle.

    #[test]
    fn teardown_during_sprite_load_disarms_the_pending_loop() {
        assert!(advance_phase(LifecyclePhase::start));
        // View torn down while the sprite load is still in flight.
        reset_phase();
        // The load continuation must refuse to start the frame loop.
        assert!(!advance_phase(LifecyclePhase::finish_loading));
    }

    #[test]
    fn second_start_is_refused_while_loading_or_running() {
        assert!(advance_phase(LifecyclePhase::start));
        assert!(!advance_phase(LifecyclePhase::start), "refused while loading");
        assert!(advance_phase(LifecyclePhase::finish_loading));
        assert!(!advance_phase(LifecyclePhase::start), "refused while running");
    }

    #[test]
    fn failed_load_allows_a_later_start() {
        assert!(advance_phase(LifecyclePhase::start));
        // The error arm resets the phase, so startup can be retried.
        reset_phase();
        assert!(advance_phase(LifecyclePhase::start));
    }
}
