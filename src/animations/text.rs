use crate::constants::{HERO_CHAR_SELECTOR, HERO_SUBTITLE_SELECTOR, HERO_TITLE_SELECTOR};
use crate::core::constants::HERO_CHAR_START_OFFSET_PX;
use crate::core::text::{split_chars, stagger_delay_ms};
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Staggered per-character reveal of the hero heading, then its subtitle.
pub struct TextAnimations {
    document: web::Document,
}

impl TextAnimations {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }

    /// Fire-once reveal. Each character is scheduled 35 ms after the previous
    /// one; the browser's CSS transitions do the tweening.
    pub fn animate_hero(&self) {
        let mut chars = dom::query_html_elements(&self.document, HERO_CHAR_SELECTOR);
        if chars.is_empty() {
            chars = self.split_title();
        }
        for (i, ch) in chars.into_iter().enumerate() {
            dom::set_timeout(stagger_delay_ms(i), move || {
                dom::set_style(&ch, "opacity", "1");
                dom::set_style(&ch, "transform", "translateY(0)");
            });
        }
        if let Some(subtitle) = dom::query_html_element(&self.document, HERO_SUBTITLE_SELECTOR) {
            dom::set_style(&subtitle, "opacity", "1");
        }
    }

    /// Replace the title's text with one hidden `span.char` per character.
    fn split_title(&self) -> Vec<web::HtmlElement> {
        let Some(title) = dom::query_html_element(&self.document, HERO_TITLE_SELECTOR) else {
            log::warn!("[app] {} not found", HERO_TITLE_SELECTOR);
            return Vec::new();
        };
        let text = title.text_content().unwrap_or_default();
        title.set_text_content(None);
        let hidden = format!("translateY({}px)", HERO_CHAR_START_OFFSET_PX);
        let mut spans = Vec::new();
        for ch in split_chars(&text) {
            let Some(span) = self
                .document
                .create_element("span")
                .ok()
                .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
            else {
                continue;
            };
            span.set_class_name("char");
            span.set_text_content(Some(&ch));
            dom::set_style(&span, "display", "inline-block");
            dom::set_style(&span, "opacity", "0");
            dom::set_style(&span, "transform", &hidden);
            dom::set_style(&span, "transition", "opacity 0.6s ease, transform 0.6s ease");
            _ = title.append_child(&span);
            spans.push(span);
        }
        spans
    }
}
