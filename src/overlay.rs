use web_sys as web;

use crate::constants::{HIDDEN_CLASS, LOADING_SCREEN_ID};

/// Hide the loading screen. Returns false when the page has none.
pub fn hide_loading_screen(document: &web::Document) -> bool {
    let Some(el) = document.get_element_by_id(LOADING_SCREEN_ID) else {
        return false;
    };
    _ = el.class_list().add_1(HIDDEN_CLASS);
    // fallback for pages without a .hidden rule
    _ = el.set_attribute("style", "display:none");
    true
}
