/// How the page is leaving when `pagehide` fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageExit {
    /// The document is being discarded.
    Unload,
    /// The document is frozen into the back/forward cache and may be shown again.
    Cached,
}

impl PageExit {
    pub fn from_persisted(persisted: bool) -> Self {
        if persisted {
            Self::Cached
        } else {
            Self::Unload
        }
    }

    /// Cached pages keep their renderers and frame tasks so a restore resumes
    /// where it left off.
    pub fn releases_resources(self) -> bool {
        self == Self::Unload
    }
}
