/// Full-screen effects, in chain order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    Bloom,
    Chromatic,
    Distortion,
}

impl PassKind {
    pub const ORDER: [PassKind; 3] = [PassKind::Bloom, PassKind::Chromatic, PassKind::Distortion];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::Bloom => "bloom",
            PassKind::Chromatic => "chromatic",
            PassKind::Distortion => "distortion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|p| p.name() == name)
    }

    pub fn fragment_entry(self) -> &'static str {
        match self {
            PassKind::Bloom => "fs_bloom",
            PassKind::Chromatic => "fs_chromatic",
            PassKind::Distortion => "fs_distortion",
        }
    }

    fn index(self) -> usize {
        match self {
            PassKind::Bloom => 0,
            PassKind::Chromatic => 1,
            PassKind::Distortion => 2,
        }
    }
}

/// Where a pass reads from or writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Resolved base render of the scene.
    Scene,
    Ping,
    Pong,
    /// The presented surface.
    Screen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PassStep {
    /// `None` is a plain copy used when every effect is switched off.
    pub pass: Option<PassKind>,
    pub source: Target,
    pub dest: Target,
}

/// Ordered effect toggles. The order never changes; only membership does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassChain {
    enabled: [bool; 3],
}

impl Default for PassChain {
    fn default() -> Self {
        Self {
            enabled: [true; 3],
        }
    }
}

impl PassChain {
    pub fn base_only() -> Self {
        Self {
            enabled: [false; 3],
        }
    }

    pub fn set_enabled(&mut self, pass: PassKind, on: bool) {
        self.enabled[pass.index()] = on;
    }

    pub fn is_enabled(&self, pass: PassKind) -> bool {
        self.enabled[pass.index()]
    }

    pub fn active(&self) -> impl Iterator<Item = PassKind> + '_ {
        PassKind::ORDER.into_iter().filter(|p| self.is_enabled(*p))
    }

    /// Concrete steps: each effect reads the previous output, intermediates
    /// ping-pong, and the last step always lands on the screen.
    pub fn plan(&self) -> Vec<PassStep> {
        let active: Vec<PassKind> = self.active().collect();
        if active.is_empty() {
            return vec![PassStep {
                pass: None,
                source: Target::Scene,
                dest: Target::Screen,
            }];
        }
        let mut steps = Vec::with_capacity(active.len());
        let mut source = Target::Scene;
        for (i, pass) in active.iter().enumerate() {
            let dest = if i + 1 == active.len() {
                Target::Screen
            } else if source == Target::Ping {
                Target::Pong
            } else {
                Target::Ping
            };
            steps.push(PassStep {
                pass: Some(*pass),
                source,
                dest,
            });
            source = dest;
        }
        steps
    }
}
