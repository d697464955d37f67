//! Thread composition.
//!
//! Splits a day-entry into platform-sized post units: consecutive chunks of at
//! most [`MAX_IMAGES_PER_POST`] images, followed by exactly one caption unit.

use crate::models::{DayEntry, ImageRef, PostUnit};

/// Platform limit on images attached to a single post.
pub const MAX_IMAGES_PER_POST: usize = 4;

/// Compose the thread for an entry.
///
/// Returns an empty thread for `None`. Otherwise yields `ceil(n / 4)` image
/// units in original order, then one text-only unit carrying the trailing
/// caption, which is appended even when the caption is empty. Every unit's
/// `total` is the length of the returned sequence.
pub fn compose(entry: Option<&DayEntry>) -> Vec<PostUnit> {
    let Some(entry) = entry else {
        return Vec::new();
    };

    let chunks = entry.images.chunks(MAX_IMAGES_PER_POST);
    let total = chunks.len() + 1;

    let mut units: Vec<PostUnit> = chunks
        .enumerate()
        .map(|(i, chunk)| PostUnit {
            images: chunk.to_vec(),
            text: String::new(),
            index: i + 1,
            total,
        })
        .collect();

    units.push(PostUnit {
        images: Vec::new(),
        text: entry.trailing_text.clone(),
        index: total,
        total,
    });

    units
}

/// Every image reference in a thread, in posting order.
pub fn thread_images(units: &[PostUnit]) -> impl Iterator<Item = &ImageRef> {
    units.iter().flat_map(|unit| unit.images.iter())
}
