use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Math;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::config::{rgba, RippleConfig};
use crate::ripple::{RingPair, Ripple, RippleField};

/// Shared stop flag, checked before every frame is scheduled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Handle to the running ripple background.
///
/// The loop keeps itself alive through its pending frame, so dropping the
/// handle does not stop it; call [`Animator::cancel`].
pub struct Animator {
    inner: Rc<Inner>,
}

struct Inner {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: RefCell<RippleField>,
    cancel: CancelToken,
    frame: RefCell<Option<AnimationFrame>>,
    resize: RefCell<Option<EventListener>>,
}

impl Animator {
    /// Sizes `canvas` to the viewport, seeds the field and starts drawing.
    pub fn start(canvas: HtmlCanvasElement, cfg: RippleConfig) -> Result<Self, JsValue> {
        let window = window().ok_or("no window")?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d canvas not supported")?
            .dyn_into()?;

        let (w, h) = viewport_size(&window)?;
        canvas.set_width(w);
        canvas.set_height(h);
        let mut random = Math::random;
        let field = RippleField::seeded(cfg, w as f64, h as f64, &mut random);

        let inner = Rc::new(Inner {
            canvas,
            ctx,
            field: RefCell::new(field),
            cancel: CancelToken::default(),
            frame: RefCell::new(None),
            resize: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let listener = EventListener::new(&window, "resize", move |_event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(err) = inner.fit_viewport() {
                console::warn!("ripple canvas resize failed", err);
            }
        });
        *inner.resize.borrow_mut() = Some(listener);

        Inner::schedule(&inner);
        Ok(Self { inner })
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.inner.cancel.clone()
    }

    /// Stops the loop after the current frame and detaches the resize listener.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
        self.inner.frame.borrow_mut().take();
        self.inner.resize.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    pub fn ripples(&self) -> Vec<Ripple> {
        self.inner.field.borrow().ripples().to_vec()
    }
}

impl Inner {
    fn schedule(this: &Rc<Self>) {
        if this.cancel.is_cancelled() {
            return;
        }
        let next = Rc::clone(this);
        let handle = request_animation_frame(move |_timestamp| Inner::tick(&next));
        *this.frame.borrow_mut() = Some(handle);
    }

    fn tick(this: &Rc<Self>) {
        this.frame.borrow_mut().take();
        if this.cancel.is_cancelled() {
            return;
        }
        if let Err(err) = this.draw() {
            console::warn!("ripple frame failed", err);
        }
        Inner::schedule(this);
    }

    fn fit_viewport(&self) -> Result<(), JsValue> {
        let window = window().ok_or("no window")?;
        let (w, h) = viewport_size(&window)?;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.field.borrow_mut().resize(w as f64, h as f64);
        Ok(())
    }

    fn draw(&self) -> Result<(), JsValue> {
        let mut field = self.field.borrow_mut();
        let cfg = field.config().clone();
        let (w, h) = field.size();
        let ctx = &self.ctx;

        ctx.clear_rect(0.0, 0.0, w, h);
        let backdrop = ctx.create_linear_gradient(0.0, 0.0, w, h);
        backdrop.add_color_stop(0.0, cfg.backdrop_start)?;
        backdrop.add_color_stop(1.0, cfg.backdrop_end)?;
        ctx.set_fill_style_canvas_gradient(&backdrop);
        ctx.fill_rect(0.0, 0.0, w, h);

        let mut result = Ok(());
        let mut random = Math::random;
        field.step(&mut random, |rings| {
            if result.is_ok() {
                result = stroke_rings(ctx, &cfg, rings);
            }
        });
        result
    }
}

fn stroke_rings(ctx: &CanvasRenderingContext2d, cfg: &RippleConfig, rings: &RingPair) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.set_stroke_style_str(&rgba(cfg.ring_rgb, rings.outer_alpha));
    ctx.set_line_width(cfg.outer_width);
    ctx.arc(rings.x, rings.y, rings.outer_radius, 0.0, TAU)?;
    ctx.stroke();

    // inner sheen
    ctx.begin_path();
    ctx.set_stroke_style_str(&rgba(cfg.sheen_rgb, rings.inner_alpha));
    ctx.set_line_width(cfg.inner_width);
    ctx.arc(rings.x, rings.y, rings.inner_radius, 0.0, TAU)?;
    ctx.stroke();
    Ok(())
}

fn viewport_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let w = window.inner_width()?.as_f64().ok_or("innerWidth is not a number")?;
    let h = window.inner_height()?.as_f64().ok_or("innerHeight is not a number")?;
    Ok((w as u32, h as u32))
}
