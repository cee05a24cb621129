//! Simon Party entry point
//!
//! Handles platform-specific initialization. On the web the page wiring and
//! the requestAnimationFrame driver live here; natively a scripted round is
//! played and logged.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement};

    use simon_party::audio::AudioManager;
    use simon_party::consts::*;
    use simon_party::fx::{AnimationLoop, FixedStep, FrameDriven, FrameScheduler, ParticleKind};
    use simon_party::gesture::HandPose;
    use simon_party::sim::{Color, GameInput};
    use simon_party::{Cue, Party, Settings, Stage, css_color};

    thread_local! {
        static SHELL: RefCell<Option<Handle>> = const { RefCell::new(None) };
    }

    type Handle = Rc<RefCell<Shell>>;

    /// Fixed-step clock around the party
    struct World {
        party: Party,
        clock: FixedStep,
        last_time: Option<f64>,
        now: f64,
    }

    impl FrameDriven for World {
        fn step(&mut self) {
            let dt = match self.last_time {
                Some(last) => ((self.now - last) / 1000.0) as f32,
                None => FRAME_DT,
            };
            self.last_time = Some(self.now);

            for _ in 0..self.clock.advance(dt) {
                self.party.step();
            }
        }

        fn is_idle(&self) -> bool {
            self.party.is_idle()
        }
    }

    /// Everything the DOM callbacks share
    struct Shell {
        world: World,
        anim_loop: AnimationLoop,
        audio: AudioManager,
        canvas: Option<HtmlCanvasElement>,
        ctx: Option<CanvasRenderingContext2d>,
    }

    /// requestAnimationFrame as a [`FrameScheduler`]
    struct Raf(Handle);

    impl FrameScheduler for Raf {
        fn request_frame(&mut self) {
            let handle = self.0.clone();
            let closure = Closure::once(move |time: f64| on_frame(handle, time));
            if let Some(window) = web_sys::window() {
                let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn by_id(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    /// Run `f` after `ms` milliseconds
    fn after(ms: i32, f: impl FnOnce() + 'static) {
        let closure = Closure::once(f);
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms,
            );
        }
        closure.forget();
    }

    /// Add `class` to an element for `ms` milliseconds
    fn pulse_class(el: Element, class: &'static str, ms: i32) {
        let _ = el.class_list().add_1(class);
        after(ms, move || {
            let _ = el.class_list().remove_1(class);
        });
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = by_id(id) {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let display = if visible { "block" } else { "none" };
                let _ = el.style().set_property("display", display);
            }
        }
    }

    fn button_center(color: Color) -> Vec2 {
        by_id(color.as_str())
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                )
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Make sure frames are flowing after new work was queued
    fn kick(handle: &Handle) {
        let mut shell = handle.borrow_mut();
        let Shell {
            world, anim_loop, ..
        } = &mut *shell;
        if anim_loop.start(&mut Raf(handle.clone())) {
            world.last_time = None;
            world.clock.reset();
        }
        flush_cues(&mut shell);
    }

    fn on_frame(handle: Handle, time: f64) {
        {
            let mut shell = handle.borrow_mut();
            let Shell {
                world, anim_loop, ..
            } = &mut *shell;
            world.now = time;
            anim_loop.frame(world, &mut Raf(handle.clone()));
            flush_cues(&mut shell);
            draw(&shell);
        }
    }

    fn flush_cues(shell: &mut Shell) {
        for cue in shell.world.party.take_cues() {
            match cue {
                Cue::Sound(effect) => shell.audio.play(effect),
                Cue::Message(text) => show_message(text),
                Cue::Flash(color) => {
                    if let Some(el) = by_id(color.as_str()) {
                        pulse_class(el, "flash", 300);
                    }
                }
                Cue::Title(text) => {
                    if let Some(el) = by_id("level-title") {
                        el.set_text_content(Some(&text));
                        pulse_class(el, "level-up", 600);
                    }
                }
                Cue::GameOver => {
                    if let Some(body) = document().and_then(|d| d.body()) {
                        pulse_class(body.into(), "game-over", 200);
                    }
                    let container = document()
                        .and_then(|d| d.query_selector(".container").ok())
                        .flatten();
                    if let Some(el) = container {
                        if !shell.world.party.settings().reduced_motion {
                            pulse_class(el, "shake", 500);
                        }
                    }
                    set_visible("start-btn", true);
                }
            }
        }
    }

    fn show_message(text: &str) {
        let Some(el) = by_id("fun-message") else { return };
        el.set_text_content(Some(text));
        set_visible("fun-message", true);
        after(MESSAGE_DURATION_MS, || set_visible("fun-message", false));
    }

    fn draw(shell: &Shell) {
        let (Some(canvas), Some(ctx)) = (&shell.canvas, &shell.ctx) else {
            return;
        };
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);

        for p in shell.world.party.animator.particles() {
            ctx.set_global_alpha(p.opacity.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(&css_color(p.color));
            let (x, y, size) = (p.pos.x as f64, p.pos.y as f64, p.size as f64);
            match p.kind {
                ParticleKind::Spark => {
                    ctx.begin_path();
                    let _ = ctx.arc(x, y, size, 0.0, TAU);
                    ctx.fill();
                }
                ParticleKind::Confetti { rotation, .. } => {
                    ctx.save();
                    let _ = ctx.translate(x, y);
                    let _ = ctx.rotate(rotation as f64);
                    ctx.fill_rect(-size / 2.0, -size / 2.0, size, size);
                    ctx.restore();
                }
            }
        }
        ctx.set_global_alpha(1.0);
    }

    /// Resize the particle canvas to the window and record the stage size
    fn fit_canvas(shell: &mut Shell) {
        let Some(window) = web_sys::window() else { return };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        if let Some(canvas) = &shell.canvas {
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
        }
        shell.world.party.stage = Stage {
            width: width as f32,
            height: height as f32,
        };
    }

    fn input(handle: &Handle, input: GameInput) {
        let started = {
            let mut shell = handle.borrow_mut();
            shell.audio.resume();
            let at = match input {
                GameInput::Press(color) => button_center(color),
                GameInput::Start => Vec2::ZERO,
            };
            shell.world.party.apply(input, at);
            shell.world.party.session.is_started()
        };
        if started {
            set_visible("start-btn", false);
        }
        kick(handle);
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        f: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(f);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Persist edited settings and push them into audio and the party
    fn update_settings(shell: &mut Shell, edit: impl FnOnce(&mut Settings)) {
        let mut settings = shell.world.party.settings().clone();
        edit(&mut settings);
        settings.save();
        shell.audio.set_volume(settings.effective_volume());
        shell.world.party.apply_settings(settings);
    }

    fn setup_input_handlers(handle: &Handle) {
        let Some(window) = web_sys::window() else { return };

        // M toggles mute, Q cycles quality, any other key starts a run
        {
            let handle = handle.clone();
            listen(&window, "keydown", move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if key.eq_ignore_ascii_case("m") {
                    update_settings(&mut handle.borrow_mut(), |s| {
                        s.muted = !s.muted;
                        log::info!("Muted: {}", s.muted);
                    });
                    return;
                }
                if key.eq_ignore_ascii_case("q") {
                    update_settings(&mut handle.borrow_mut(), |s| {
                        s.quality = s.quality.next();
                        log::info!("Quality: {}", s.quality.as_str());
                    });
                    return;
                }
                let started = handle.borrow().world.party.session.is_started();
                if !started {
                    input(&handle, GameInput::Start);
                }
            });
        }

        if let Some(btn) = by_id("start-btn") {
            for event in ["click", "touchstart"] {
                let handle = handle.clone();
                listen(&btn, event, move |event: web_sys::Event| {
                    // Touch would also fire a synthetic click
                    if event.type_() == "touchstart" {
                        event.prevent_default();
                    }
                    input(&handle, GameInput::Start);
                });
            }
        }

        for color in Color::ALL {
            let Some(btn) = by_id(color.as_str()) else {
                log::warn!("Missing button #{}", color);
                continue;
            };
            for event in ["click", "touchstart"] {
                let handle = handle.clone();
                listen(&btn, event, move |event: web_sys::Event| {
                    if event.type_() == "touchstart" {
                        event.prevent_default();
                    }
                    let token = event
                        .current_target()
                        .and_then(|t| t.dyn_into::<Element>().ok())
                        .map(|el| el.id())
                        .unwrap_or_default();
                    match token.parse::<Color>() {
                        Ok(color) => input(&handle, GameInput::Press(color)),
                        Err(e) => log::warn!("{}", e),
                    }
                });
            }
        }

        {
            let handle = handle.clone();
            listen(&window, "resize", move |_event: web_sys::Event| {
                fit_canvas(&mut handle.borrow_mut());
            });
        }
    }

    /// Called by the page's hand-pose detector every poll interval with the
    /// 21 keypoints flattened as `[x0, y0, ...]` in normalized coordinates.
    /// Returns the label of an accepted gesture.
    #[wasm_bindgen]
    pub fn on_hand_pose(keypoints: &[f32], now_ms: f64) -> Option<String> {
        let handle = SHELL.with(|s| s.borrow().clone())?;
        let pose = match HandPose::from_flat(keypoints) {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!("Dropping hand pose: {}", e);
                return None;
            }
        };

        let gesture = {
            let mut shell = handle.borrow_mut();
            let stage = shell.world.party.stage;
            move_cursor(pose.index_tip() * Vec2::new(stage.width, stage.height));
            shell.world.party.gesture(&pose, now_ms)
        };
        let gesture = gesture?;
        set_visible("start-btn", !handle.borrow().world.party.session.is_started());
        kick(&handle);
        Some(gesture.label().to_string())
    }

    /// Called when the detector loses the hand
    #[wasm_bindgen]
    pub fn on_hand_lost() {
        set_visible("gesture-cursor", false);
        if let Some(handle) = SHELL.with(|s| s.borrow().clone()) {
            handle.borrow_mut().world.party.hand_lost();
        }
    }

    /// Detector poll interval the page should use (ms)
    #[wasm_bindgen]
    pub fn gesture_poll_ms() -> f64 {
        GESTURE_POLL_MS
    }

    fn move_cursor(at: Vec2) {
        let Some(el) = by_id("gesture-cursor").and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", at.x - 20.0));
        let _ = style.set_property("top", &format!("{}px", at.y - 20.0));
        let _ = style.set_property("display", "block");
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Simon Party starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let canvas: Option<HtmlCanvasElement> =
            by_id("particle-canvas").and_then(|el| el.dyn_into().ok());
        let ctx = canvas
            .as_ref()
            .and_then(|c| c.get_context("2d").ok().flatten())
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("No particle canvas - effects disabled");
        }

        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let mut shell = Shell {
            world: World {
                party: Party::new(seed, settings),
                clock: FixedStep::new(),
                last_time: None,
                now: 0.0,
            },
            anim_loop: AnimationLoop::new(),
            audio,
            canvas,
            ctx,
        };
        fit_canvas(&mut shell);

        let handle: Handle = Rc::new(RefCell::new(shell));
        SHELL.with(|s| *s.borrow_mut() = Some(handle.clone()));
        setup_input_handlers(&handle);

        log::info!("Simon Party ready (seed {})", seed);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use simon_party::fx::FrameDriven;
    use simon_party::sim::{Color, Submission};
    use simon_party::{Cue, Party, Settings};

    env_logger::init();
    log::info!("Simon Party (native) starting...");
    log::info!("Native mode plays a scripted demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut party = Party::new(seed, Settings::load());
    party.start();

    let settle = |party: &mut Party| {
        while !party.is_idle() {
            party.step();
        }
        for cue in party.take_cues() {
            match cue {
                Cue::Title(text) => log::info!("{}", text),
                Cue::Message(text) => log::info!("  \"{}\"", text),
                Cue::Flash(color) => log::info!("  flash {}", color),
                Cue::Sound(_) | Cue::GameOver => {}
            }
        }
    };

    // Play five perfect rounds, then miss on purpose
    for _ in 0..5 {
        settle(&mut party);
        for color in party.session.pattern().to_vec() {
            party.press(color, Vec2::ZERO);
        }
    }
    settle(&mut party);
    let wrong = Color::ALL
        .into_iter()
        .find(|c| Some(c) != party.session.pattern().first())
        .unwrap_or(Color::Red);
    if party.press(wrong, Vec2::ZERO) != Submission::Mismatch {
        log::warn!("Expected {} to end the run", wrong);
    }
    settle(&mut party);

    println!(
        "Demo finished: best level {} (seed {})",
        party.session.best_level(),
        seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
