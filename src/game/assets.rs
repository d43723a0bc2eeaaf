//! Sprite loading. Every image must resolve before the frame loop starts;
//! a single failed load rejects the whole startup.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

const BACKGROUND: &str = "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/background-day.png?raw=true";
const BASE: &str =
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/base.png?raw=true";
const BIRD_FRAMES: [&str; 3] = [
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/bluebird-downflap.png?raw=true",
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/bluebird-midflap.png?raw=true",
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/bluebird-upflap.png?raw=true",
];
const PIPE_TOP: &str =
    "https://github.com/tinspham209/react-flappy-bird/blob/master/src/assets/pipe-top.png?raw=true";
const PIPE_BOTTOM: &str = "https://github.com/tinspham209/react-flappy-bird/blob/master/src/assets/pipe-bottom.png?raw=true";
const GET_READY: &str =
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/message.png?raw=true";
const GAME_OVER: &str =
    "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/gameover.png?raw=true";
const RESTART_BUTTON: &str =
    "https://github.com/IgorRozani/flappy-bird/blob/master/assets/restart-button.png?raw=true";

fn digit_url(digit: usize) -> String {
    format!(
        "https://github.com/samuelcust/flappy-bird-assets/blob/master/sprites/{digit}.png?raw=true"
    )
}

/// The full sprite set, resolved and decodable.
pub struct Assets {
    pub background: HtmlImageElement,
    pub base: HtmlImageElement,
    pub bird: [HtmlImageElement; 3],
    pub pipe_top: HtmlImageElement,
    pub pipe_bottom: HtmlImageElement,
    pub get_ready: HtmlImageElement,
    pub game_over: HtmlImageElement,
    pub restart_button: HtmlImageElement,
    pub digits: [HtmlImageElement; 10],
}

/// An image whose fetch/decode is already in flight.
struct PendingImage {
    img: HtmlImageElement,
    decoded: JsFuture,
}

// Setting src starts the fetch immediately; decode() rejects on network /
// decode failure, which aborts startup.
fn begin_load(src: &str) -> Result<PendingImage, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    let decoded = JsFuture::from(img.decode());
    Ok(PendingImage { img, decoded })
}

async fn finish_load(pending: PendingImage) -> Result<HtmlImageElement, JsValue> {
    pending.decoded.await?;
    Ok(pending.img)
}

impl Assets {
    /// Kicks off every fetch up front, then awaits them all; the images load
    /// concurrently and the first rejection fails the whole startup.
    pub async fn load() -> Result<Self, JsValue> {
        let background = begin_load(BACKGROUND)?;
        let base = begin_load(BASE)?;
        let [bird0, bird1, bird2] = [
            begin_load(BIRD_FRAMES[0])?,
            begin_load(BIRD_FRAMES[1])?,
            begin_load(BIRD_FRAMES[2])?,
        ];
        let pipe_top = begin_load(PIPE_TOP)?;
        let pipe_bottom = begin_load(PIPE_BOTTOM)?;
        let get_ready = begin_load(GET_READY)?;
        let game_over = begin_load(GAME_OVER)?;
        let restart_button = begin_load(RESTART_BUTTON)?;
        let mut pending_digits = Vec::with_capacity(10);
        for d in 0..10 {
            pending_digits.push(begin_load(&digit_url(d))?);
        }

        let mut digits = Vec::with_capacity(10);
        for pending in pending_digits {
            digits.push(finish_load(pending).await?);
        }
        let digits: [HtmlImageElement; 10] = digits
            .try_into()
            .map_err(|_| JsValue::from_str("digit sprite set incomplete"))?;

        Ok(Self {
            background: finish_load(background).await?,
            base: finish_load(base).await?,
            bird: [
                finish_load(bird0).await?,
                finish_load(bird1).await?,
                finish_load(bird2).await?,
            ],
            pipe_top: finish_load(pipe_top).await?,
            pipe_bottom: finish_load(pipe_bottom).await?,
            get_ready: finish_load(get_ready).await?,
            game_over: finish_load(game_over).await?,
            restart_button: finish_load(restart_button).await?,
            digits,
        })
    }
}
