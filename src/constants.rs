/// DOM hooks the page must provide.
///
/// Ids are passed to `get_element_by_id`; selectors to `query_selector(_all)`.
pub const PARTICLE_CANVAS_ID: &str = "webgl-canvas";
pub const BRAIN_CANVAS_ID: &str = "brain-canvas";
pub const LOADING_SCREEN_ID: &str = "loading-screen";

pub const HERO_TITLE_SELECTOR: &str = ".hero-title";
pub const HERO_CHAR_SELECTOR: &str = ".hero-title .char";
pub const HERO_SUBTITLE_SELECTOR: &str = ".hero-subtitle";

// Scroll trigger regions
pub const BRAIN_SECTION_SELECTOR: &str = "#brain-section";
pub const BRAIN_PIN_SELECTOR: &str = "#brain-canvas";
pub const SERVICES_SELECTOR: &str = "#services";
pub const SERVICE_CARD_SELECTOR: &str = ".service-card";

// Trigger edges: "<element line> <viewport line>"
pub const BRAIN_SECTION_START: &str = "top top";
pub const BRAIN_SECTION_END: &str = "bottom bottom";
pub const SERVICES_START: &str = "top bottom";
pub const SERVICES_END: &str = "top top";
pub const CARD_START: &str = "top 80%";
pub const CARD_END: &str = "top 30%";

// Class toggled on the loading screen once the page is ready
pub const HIDDEN_CLASS: &str = "hidden";
