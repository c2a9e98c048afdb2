//! Ripple canvas background and gallery lightbox for a static media page.
//!
//! The pure model (`config`, `ripple`, `media`, `session`) builds on every
//! target so it can be unit tested on the host; the DOM side lives under
//! [`wasm`] and only compiles for wasm32.

pub mod config;
pub mod media;
pub mod ripple;
pub mod session;

pub use config::{GalleryConfig, RippleConfig};

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::console;
    use wasm_bindgen::prelude::*;

    use crate::config::{GalleryConfig, RippleConfig};

    pub mod background;
    pub mod lightbox;

    pub use background::Animator;
    pub use lightbox::Lightbox;

    struct Page {
        animator: Option<Animator>,
        lightbox: Option<Rc<Lightbox>>,
    }

    const CANVAS_ID: &str = "rippleCanvas";

    thread_local! {
        static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let cfg = GalleryConfig::default();

        let animator = match document.get_element_by_id(CANVAS_ID) {
            Some(elem) => {
                let canvas = elem.dyn_into::<web_sys::HtmlCanvasElement>()?;
                Some(Animator::start(canvas, RippleConfig::default())?)
            }
            None => {
                console::debug!("ripple canvas not found, background disabled");
                None
            }
        };

        let lightbox = match Lightbox::mount(&document, cfg) {
            Ok(lightbox) => {
                console::log!("gallery mounted", lightbox.card_count() as u32);
                Some(lightbox)
            }
            Err(err) => {
                console::debug!("gallery lightbox disabled", err);
                None
            }
        };

        PAGE.with(|page| {
            *page.borrow_mut() = Some(Page { animator, lightbox });
        });
        Ok(())
    }

    /// Stops the background loop and detaches every lightbox listener.
    #[wasm_bindgen]
    pub fn teardown() {
        let Some(page) = PAGE.with(|page| page.borrow_mut().take()) else {
            return;
        };
        if let Some(animator) = page.animator {
            animator.cancel();
        }
        if let Some(lightbox) = page.lightbox {
            lightbox.close();
            lightbox.detach();
        }
    }
}
