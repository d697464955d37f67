//! Line-based text rendering of a composed thread.

use crate::models::{EntryMeta, ImageRef, PostUnit, ResolvedImage};

/// Line width for separators.
pub const LINE_WIDTH: usize = 60;

pub const ICON_READY: &str = "✓";
pub const ICON_FAILED: &str = "✗";
pub const ICON_LOADING: &str = "⠋";
pub const ICON_UNRESOLVED: &str = "·";

/// Render a thread preview.
///
/// `states` holds one entry per image in posting order; images without an
/// entry render as unresolved.
///
/// ```text
/// DAY 12 · Harbour walk
/// Scheduled: 2024-03-05 09:30 UTC
/// ════════════════════════════════════════════════════════════
///
/// POST 1/2
/// ────────────────────────────────────────────────────────────
///   ✓ image/png 1200x800 (34.2 KB)  harbour-1.png
///
/// POST 2/2
/// ────────────────────────────────────────────────────────────
///   See you tomorrow.
/// ```
pub fn render_thread(
    heading: &str,
    meta: &EntryMeta,
    units: &[PostUnit],
    states: &[ResolvedImage],
) -> String {
    let mut lines = Vec::new();

    match meta.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => lines.push(format!("{} · {}", heading, title)),
        None => lines.push(heading.to_string()),
    }
    if let Some(at) = meta.scheduled_at {
        lines.push(format!("Scheduled: {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.push("═".repeat(LINE_WIDTH));

    let mut slot = 0;
    for unit in units {
        lines.push(String::new());
        lines.push(format!("POST {}", unit.label()));
        lines.push("─".repeat(LINE_WIDTH));

        for image in &unit.images {
            lines.push(image_line(image, states.get(slot)));
            slot += 1;
        }

        if unit.is_last() {
            if unit.text.trim().is_empty() {
                lines.push("  (no text)".to_string());
            } else {
                lines.extend(unit.text.lines().map(|line| format!("  {}", line)));
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render an entry fetch failure in place of the preview.
pub fn render_error(heading: &str, message: &str) -> String {
    format!("{}\n{}\n  {} {}\n", heading, "═".repeat(LINE_WIDTH), ICON_FAILED, message)
}

fn image_line(image: &ImageRef, state: Option<&ResolvedImage>) -> String {
    match state {
        Some(ResolvedImage::Ready(content)) => {
            let size = format_size(content.byte_len());
            match content.dimensions() {
                Some((w, h)) => format!(
                    "  {} {} {}x{} ({})  {}",
                    ICON_READY,
                    content.mime_type(),
                    w,
                    h,
                    size,
                    image
                ),
                None => format!(
                    "  {} {} ({})  {}",
                    ICON_READY,
                    content.mime_type(),
                    size,
                    image
                ),
            }
        }
        Some(ResolvedImage::Failed(reason)) => {
            format!("  {} failed: {}  {}", ICON_FAILED, reason, image)
        }
        Some(ResolvedImage::Pending) => format!("  {} loading  {}", ICON_LOADING, image),
        None => format!("  {} {}", ICON_UNRESOLVED, image),
    }
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
