use serde::{Deserialize, Serialize};

/// Personal notes for a tracker title, taken from the anime-notes sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAnnotation {
    pub rewatch: Option<String>,
    pub watch_date: Option<String>,
    pub voice_over: Option<String>,
    /// Watched with the commentator ("с Заком" in the sheet).
    pub commented: bool,
    pub ongoing: bool,
}

impl CustomAnnotation {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rewatch.is_none()
            && self.watch_date.is_none()
            && self.voice_over.is_none()
            && !self.commented
            && !self.ongoing
    }
}
