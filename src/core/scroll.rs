use std::str::FromStr;
use thiserror::Error;

use super::constants::CARD_REVEAL_OFFSET_PX;

#[derive(Debug, Error, PartialEq)]
pub enum EdgeParseError {
    #[error("expected \"<element> <viewport>\", got {0:?}")]
    Shape(String),
    #[error("unknown position {0:?}")]
    Position(String),
}

/// A line on either the trigger element or the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Position {
    Top,
    Center,
    Bottom,
    /// Fraction of the height from the top edge.
    Fraction(f64),
}

impl Position {
    pub fn fraction(self) -> f64 {
        match self {
            Position::Top => 0.0,
            Position::Center => 0.5,
            Position::Bottom => 1.0,
            Position::Fraction(f) => f,
        }
    }
}

impl FromStr for Position {
    type Err = EdgeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Position::Top),
            "center" => Ok(Position::Center),
            "bottom" => Ok(Position::Bottom),
            _ => s
                .strip_suffix('%')
                .and_then(|n| n.parse::<f64>().ok())
                .map(|pct| Position::Fraction(pct / 100.0))
                .ok_or_else(|| EdgeParseError::Position(s.to_string())),
        }
    }
}

/// "When `element` line meets `viewport` line", e.g. `top 80%`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub element: Position,
    pub viewport: Position,
}

impl FromStr for Edge {
    type Err = EdgeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(e), Some(v), None) => Ok(Edge {
                element: e.parse()?,
                viewport: v.parse()?,
            }),
            _ => Err(EdgeParseError::Shape(s.to_string())),
        }
    }
}

impl Edge {
    /// Scroll offset at which this edge is reached.
    pub fn scroll_offset(&self, element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
        element_top + self.element.fraction() * element_height
            - self.viewport.fraction() * viewport_height
    }
}

/// Resolved scroll range of one trigger, in document pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriggerRange {
    pub start: f64,
    pub end: f64,
}

/// Document-space top of an element from its viewport rect, with any
/// `translateY` the element's own binding applied taken back out.
#[inline]
pub fn document_top(rect_top: f64, scroll: f64, own_offset_px: f64) -> f64 {
    rect_top + scroll - own_offset_px
}

impl TriggerRange {
    /// `element_top` is in document coordinates, see [`document_top`].
    pub fn resolve(
        element_top: f64,
        element_height: f64,
        viewport_height: f64,
        start: Edge,
        end: Edge,
    ) -> Self {
        Self {
            start: start.scroll_offset(element_top, element_height, viewport_height),
            end: end.scroll_offset(element_top, element_height, viewport_height),
        }
    }

    pub fn progress(&self, scroll: f64) -> f32 {
        let span = self.end - self.start;
        if span <= f64::EPSILON {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0) as f32
    }

    /// Offset that keeps a pinned element visually fixed while the range is
    /// active and holds it at the end position afterwards.
    pub fn pin_offset(&self, scroll: f64) -> f64 {
        (scroll - self.start).clamp(0.0, (self.end - self.start).max(0.0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out.
    Power1Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scrub {
    /// Follow the scroll fraction exactly.
    Instant,
    /// Catch up with the scroll fraction over roughly this many seconds.
    Lag(f32),
}

/// The only state a binding keeps: its target fraction and what is shown.
#[derive(Clone, Debug)]
pub struct ScrubState {
    mode: Scrub,
    target: f32,
    current: f32,
}

const SETTLE_EPSILON: f32 = 1e-4;

impl ScrubState {
    pub fn new(mode: Scrub) -> Self {
        Self {
            mode,
            target: 0.0,
            current: 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump straight to `p`, regardless of mode (initial layout).
    pub fn snap(&mut self, p: f32) -> f32 {
        self.target = p;
        self.current = p;
        p
    }

    /// New scroll fraction. Instant bindings return the value to apply now.
    pub fn set_target(&mut self, p: f32) -> Option<f32> {
        self.target = p;
        match self.mode {
            Scrub::Instant if (self.current - p).abs() > f32::EPSILON => {
                self.current = p;
                Some(p)
            }
            _ => None,
        }
    }

    /// Advance a lagged binding; returns the value to apply when it moved.
    pub fn step(&mut self, dt_sec: f32) -> Option<f32> {
        let Scrub::Lag(lag) = self.mode else {
            return None;
        };
        let gap = self.target - self.current;
        if gap.abs() <= f32::EPSILON {
            return None;
        }
        if gap.abs() < SETTLE_EPSILON || lag <= 0.0 {
            self.current = self.target;
        } else {
            // Exponential catch-up; a time constant of lag/3 settles within ~lag.
            let alpha = 1.0 - (-dt_sec.max(0.0) * 3.0 / lag).exp();
            self.current += gap * alpha;
        }
        Some(self.current)
    }
}

/// Vertical offset and opacity of a card at a given reveal progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RevealStyle {
    pub translate_y_px: f32,
    pub opacity: f32,
}

impl RevealStyle {
    pub fn at(progress: f32, ease: Ease) -> Self {
        let e = ease.apply(progress);
        Self {
            translate_y_px: CARD_REVEAL_OFFSET_PX * (1.0 - e),
            opacity: e,
        }
    }
}
