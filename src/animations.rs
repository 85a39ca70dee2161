// ===================== Scroll and text animations =====================

mod scroll;
mod text;

pub use scroll::ScrollAnimations;
pub use text::TextAnimations;
