use serde::{Deserialize, Serialize};

use super::ImageRef;

/// One platform-sized post within a thread.
///
/// Image-bearing units carry up to four images and no text; the final unit of
/// every thread carries the trailing caption and no images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUnit {
    pub images: Vec<ImageRef>,
    pub text: String,
    /// 1-based position within the thread
    pub index: usize,
    /// Number of units in the thread
    pub total: usize,
}

impl PostUnit {
    /// True for the caption-only unit that closes every thread.
    pub fn is_text_only(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.index == self.total
    }

    /// Position label such as `2/3`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index, self.total)
    }
}
