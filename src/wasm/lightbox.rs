use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::console;
use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlImageElement, HtmlMediaElement, HtmlSourceElement,
    HtmlVideoElement, KeyboardEvent, Node, NodeList,
};

use crate::config::{GalleryConfig, ARIA_HIDDEN, DIMMED_CLASS, VISIBLE_CLASS};
use crate::media::{resolved_src, MediaDescriptor, MediaKind, OverlayMedia, SourceEntry, VideoSource};
use crate::session::Session;

/// Controller for the gallery overlay. Owns the expanded-card session and
/// every listener it registers; [`Lightbox::detach`] drops them.
pub struct Lightbox {
    cfg: GalleryConfig,
    document: Document,
    galleries: Vec<Element>,
    cards: Vec<HtmlElement>,
    overlay: Element,
    content: HtmlElement,
    session: RefCell<Session<HtmlElement>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Lightbox {
    /// Looks up the overlay and galleries named in `cfg` and wires cards,
    /// backdrop and Escape. Galleries missing from the page are skipped.
    pub fn mount(document: &Document, cfg: GalleryConfig) -> Result<Rc<Self>, JsValue> {
        let overlay = document
            .get_element_by_id(&cfg.overlay_id)
            .ok_or("lightbox overlay not found")?;
        let content = document
            .get_element_by_id(&cfg.content_id)
            .ok_or("lightbox content slot not found")?
            .dyn_into::<HtmlElement>()?;

        let galleries: Vec<Element> = cfg
            .gallery_ids
            .iter()
            .filter_map(|id| document.get_element_by_id(id))
            .collect();
        let mut cards = Vec::new();
        for gallery in &galleries {
            let found = gallery.query_selector_all(&cfg.card_selector)?;
            cards.extend(
                elements(&found)
                    .into_iter()
                    .filter_map(|el| el.dyn_into::<HtmlElement>().ok()),
            );
        }

        let lightbox = Rc::new(Self {
            cfg,
            document: document.clone(),
            galleries,
            cards,
            overlay,
            content,
            session: RefCell::new(Session::new()),
            listeners: RefCell::new(Vec::new()),
        });
        lightbox.attach();
        Ok(lightbox)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_open(&self) -> bool {
        self.session.borrow().is_open()
    }

    pub fn expanded(&self) -> Option<HtmlElement> {
        self.session.borrow().expanded().cloned()
    }

    /// Expands `card`, closing whatever was open first. A card without a
    /// recognisable media element leaves the page untouched.
    pub fn open(&self, card: &HtmlElement) {
        self.close();

        let Some(media) = self.read_media(card) else {
            console::debug!("card has no media element, ignoring");
            return;
        };
        let node = match build_overlay_node(&self.document, &media.overlay()) {
            Ok(node) => node,
            Err(err) => {
                console::warn!("lightbox node creation failed", err);
                return;
            }
        };

        for gallery in &self.galleries {
            let _ = gallery.class_list().add_1(DIMMED_CLASS);
        }
        let _ = card.style().set_property("transform", &self.cfg.card_pop);

        self.content.set_inner_html("");
        let _ = self.content.append_child(&node);
        let _ = self.overlay.class_list().add_1(VISIBLE_CLASS);
        let _ = self.overlay.set_attribute(ARIA_HIDDEN, "false");
        // close() above emptied the session
        let _ = self.session.borrow_mut().begin(card.clone());

        self.pause_videos(Some(card));
        if let Some(video) = node.dyn_ref::<HtmlMediaElement>() {
            play_ignoring_rejection(video);
        }
        let _ = self.content.focus();
        console::debug!("lightbox opened", media.kind().as_str());
    }

    /// Hides the overlay and restores the galleries. No-op when closed.
    pub fn close(&self) {
        let Some(card) = self.session.borrow_mut().end() else {
            return;
        };
        for gallery in &self.galleries {
            let _ = gallery.class_list().remove_1(DIMMED_CLASS);
        }
        self.content.set_inner_html("");
        let _ = self.overlay.class_list().remove_1(VISIBLE_CLASS);
        let _ = self.overlay.set_attribute(ARIA_HIDDEN, "true");
        let _ = card.style().remove_property("transform");
        self.pause_videos(None);
    }

    /// Drops every listener registered by [`Lightbox::mount`].
    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
    }

    fn attach(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        for card in &self.cards {
            card.set_tab_index(0);

            let weak = Rc::downgrade(self);
            let target = card.clone();
            listeners.push(EventListener::new(card, "click", move |_event| {
                with_lightbox(&weak, |lightbox| lightbox.open(&target));
            }));

            let weak = Rc::downgrade(self);
            let target = card.clone();
            listeners.push(EventListener::new_with_options(
                card,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if matches!(key.key().as_str(), "Enter" | " ") {
                        event.prevent_default();
                        with_lightbox(&weak, |lightbox| lightbox.open(&target));
                    }
                },
            ));
        }

        // Only the backdrop closes; clicks inside the panel bubble up with
        // a different target.
        let weak = Rc::downgrade(self);
        let overlay: JsValue = self.overlay.clone().into();
        listeners.push(EventListener::new(&self.overlay, "click", move |event: &Event| {
            let on_backdrop = event
                .target()
                .is_some_and(|target| JsValue::from(target) == overlay);
            if on_backdrop {
                with_lightbox(&weak, |lightbox| lightbox.close());
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.document, "keydown", move |event: &Event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Escape");
            if escape {
                with_lightbox(&weak, |lightbox| lightbox.close());
            }
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    fn read_media(&self, card: &HtmlElement) -> Option<MediaDescriptor> {
        let kind: MediaKind = card.get_attribute(MediaKind::ATTRIBUTE)?.parse().ok()?;
        match kind {
            MediaKind::Video => {
                let video = card
                    .query_selector(&self.cfg.video_selector)
                    .ok()
                    .flatten()?
                    .dyn_into::<HtmlVideoElement>()
                    .ok()?;
                let sources = video
                    .query_selector_all("source")
                    .map(|list| elements(&list))
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|source| {
                        SourceEntry::from_attrs(source.get_attribute("src"), source.get_attribute("type"))
                    })
                    .collect();
                Some(MediaDescriptor::Video {
                    sources,
                    fallback_src: resolved_src(video.current_src(), video.src()),
                })
            }
            MediaKind::Photo => {
                let image = card
                    .query_selector(&self.cfg.image_selector)
                    .ok()
                    .flatten()?
                    .dyn_into::<HtmlImageElement>()
                    .ok()?;
                Some(MediaDescriptor::Photo {
                    src: image.src(),
                    alt: image.alt(),
                })
            }
        }
    }

    /// Pauses every `<video>` in the document except those inside `keep`.
    fn pause_videos(&self, keep: Option<&HtmlElement>) {
        let Ok(found) = self.document.query_selector_all("video") else {
            return;
        };
        for el in elements(&found) {
            let node: &Node = &el;
            if keep.is_some_and(|card| card.contains(Some(node))) {
                continue;
            }
            if let Ok(video) = el.dyn_into::<HtmlMediaElement>() {
                let _ = video.pause();
            }
        }
    }
}

fn with_lightbox(weak: &Weak<Lightbox>, action: impl FnOnce(&Lightbox)) {
    if let Some(lightbox) = weak.upgrade() {
        action(&lightbox);
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn build_overlay_node(document: &Document, media: &OverlayMedia) -> Result<HtmlElement, JsValue> {
    match media {
        OverlayMedia::Video(plan) => {
            let video = document
                .create_element("video")?
                .dyn_into::<HtmlVideoElement>()?;
            video.set_controls(plan.controls);
            video.set_autoplay(plan.autoplay);
            if plan.plays_inline {
                video.set_attribute("playsinline", "")?;
            }
            video.style().set_property("outline", "none")?;
            match &plan.source {
                VideoSource::List(entries) => {
                    for entry in entries {
                        let source = document
                            .create_element("source")?
                            .dyn_into::<HtmlSourceElement>()?;
                        source.set_src(&entry.src);
                        source.set_type(&entry.mime);
                        video.append_child(&source)?;
                    }
                }
                VideoSource::Src(src) => video.set_src(src),
            }
            video.set_muted(plan.muted);
            video.set_volume(plan.volume);
            Ok(video.into())
        }
        OverlayMedia::Photo { src, alt } => {
            let image = document
                .create_element("img")?
                .dyn_into::<HtmlImageElement>()?;
            image.set_alt(alt);
            image.set_src(src);
            Ok(image.into())
        }
    }
}

/// Autoplay policies commonly reject `play()`; the rejection is dropped.
fn play_ignoring_rejection(media: &HtmlMediaElement) {
    if let Ok(promise) = media.play() {
        spawn_local(async move {
            let _ = JsFuture::from(promise).await;
        });
    }
}
