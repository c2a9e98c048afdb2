//! Tunables for the ripple background and the DOM contract of the lightbox.

/// Class toggled on the overlay while a card is expanded.
pub const VISIBLE_CLASS: &str = "visible";
/// Class toggled on every gallery container while a card is expanded.
pub const DIMMED_CLASS: &str = "dimmed";
pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Animator constants. Ages and radii are in frames and CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RippleConfig {
    pub initial_ripples: usize,
    /// Age added to every ripple per frame.
    pub life_step: f64,
    /// A ripple older than this is dropped.
    pub max_life: f64,
    /// Per-frame probability of spawning one ripple.
    pub spawn_chance: f64,
    /// Ring radius growth per unit of age.
    pub growth: f64,
    pub base_radius_min: f64,
    pub base_radius_span: f64,
    pub sheen_offset: f64,
    pub alpha_base: f64,
    pub alpha_falloff: f64,
    pub sheen_alpha_scale: f64,
    pub outer_width: f64,
    pub inner_width: f64,
    pub ring_rgb: (u8, u8, u8),
    pub sheen_rgb: (u8, u8, u8),
    pub backdrop_start: &'static str,
    pub backdrop_end: &'static str,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            initial_ripples: 6,
            life_step: 0.8,
            max_life: 140.0,
            spawn_chance: 0.04,
            growth: 1.6,
            base_radius_min: 30.0,
            base_radius_span: 60.0,
            sheen_offset: 10.0,
            alpha_base: 0.14,
            alpha_falloff: 220.0,
            sheen_alpha_scale: 0.06,
            outer_width: 1.2,
            inner_width: 0.6,
            ring_rgb: (120, 170, 255),
            sheen_rgb: (255, 255, 255),
            backdrop_start: "rgba(18,24,38,0.18)",
            backdrop_end: "rgba(2,4,10,0.36)",
        }
    }
}

/// Element ids and selectors the lightbox expects in the page.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    pub gallery_ids: Vec<String>,
    pub overlay_id: String,
    pub content_id: String,
    pub card_selector: String,
    pub video_selector: String,
    pub image_selector: String,
    /// Inline transform applied to the card while it is expanded.
    pub card_pop: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_ids: vec!["video-gallery".into(), "photo-gallery".into()],
            overlay_id: "lightbox".into(),
            content_id: "lightbox-inner".into(),
            card_selector: ".card".into(),
            video_selector: ".media > video".into(),
            image_selector: ".media > img".into(),
            card_pop: "scale(1.03)".into(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
    format!("rgba({r},{g},{b},{alpha})")
}
