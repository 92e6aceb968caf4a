//! Static report rendering.
//!
//! Turns an aggregated [`CaptureResults`] into an HTML fragment that the
//! output sink substitutes into the report template. The report is read
//! offline, so every asset is either a path relative to the report
//! directory or an inlined data URI; nothing references the network.

use base64::Engine;
use std::path::{Path, PathBuf};

use crate::report::types::{CaptureResult, CaptureResults, Outcome};

/// Options controlling report rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Embed image bytes as base64 data URIs instead of relative links.
    /// Produces a single self-contained file at the cost of size.
    pub inline_images: bool,
}

/// Render the report body for `results`.
///
/// Image links are resolved against `base_dir` (the directory the report
/// file is written into). Entries appear in `results` order, so the same
/// input always produces the same document.
pub fn render_report_body(
    results: &CaptureResults,
    base_dir: &Path,
    options: &RenderOptions,
) -> String {
    let mut body = String::new();

    body.push_str("<div class=\"summary\">\n");
    let summary = &results.summary;
    body.push_str(&format!(
        "  <span class=\"badge total\">{} total</span>\n",
        summary.total
    ));
    for (count, outcome) in [
        (summary.added, Outcome::Added),
        (summary.changed, Outcome::Changed),
        (summary.unchanged, Outcome::Unchanged),
        (summary.recorded, Outcome::Recorded),
        (summary.failed, Outcome::Failed),
    ] {
        body.push_str(&format!(
            "  <span class=\"badge {}\">{} {}</span>\n",
            outcome.as_str(),
            count,
            outcome.as_str()
        ));
    }
    body.push_str("</div>\n");

    if results.results.is_empty() {
        body.push_str("<p class=\"empty\">No capture results were produced by this run.</p>\n");
        return body;
    }

    for result in &results.results {
        body.push_str(&render_result(result, base_dir, options));
    }

    body
}

/// Render one capture card
fn render_result(result: &CaptureResult, base_dir: &Path, options: &RenderOptions) -> String {
    let outcome = result.outcome.as_str();
    let mut card = format!(
        "<section class=\"result {}\">\n  <h3>{}</h3>\n  <span class=\"badge {}\">{}</span>\n",
        outcome,
        escape_html(&result.identifier),
        outcome,
        outcome
    );

    if let Some(diff) = result.diff_percentage {
        card.push_str(&format!("  <p class=\"diff\">diff {:.2}%</p>\n", diff));
    }

    for (label, path) in [
        ("golden", &result.golden_image_path),
        ("actual", &result.actual_image_path),
        ("comparison", &result.comparison_image_path),
    ] {
        if let Some(path) = path {
            card.push_str(&render_image(label, path, base_dir, options));
        }
    }

    card.push_str("</section>\n");
    card
}

/// Render one labeled image figure
fn render_image(label: &str, path: &Path, base_dir: &Path, options: &RenderOptions) -> String {
    let src = image_src(path, base_dir, options);
    let dimensions = image::image_dimensions(path)
        .map(|(w, h)| format!(" width=\"{}\" height=\"{}\"", w, h))
        .unwrap_or_default();
    format!(
        "  <figure class=\"{}\">\n    <img src=\"{}\" alt=\"{}\"{} loading=\"lazy\">\n    <figcaption>{}</figcaption>\n  </figure>\n",
        label,
        escape_html(&src),
        label,
        dimensions,
        label
    )
}

/// Resolve the `src` attribute for an image: a data URI when inlining,
/// otherwise a path relative to the report directory
fn image_src(path: &Path, base_dir: &Path, options: &RenderOptions) -> String {
    if options.inline_images {
        if let Ok(bytes) = std::fs::read(path) {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            return format!("data:{};base64,{}", mime_for(path), encoded);
        }
        // Unreadable image: fall back to the relative link
    }
    relative_to(base_dir, path).to_string_lossy().into_owned()
}

/// Media type guessed from the file extension
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Express `target` relative to `base` when both are absolute; otherwise
/// return `target` unchanged
fn relative_to(base: &Path, target: &Path) -> PathBuf {
    if let Ok(stripped) = target.strip_prefix(base) {
        return stripped.to_path_buf();
    }
    if base.is_absolute() && target.is_absolute() {
        let base_parts: Vec<_> = base.components().collect();
        let target_parts: Vec<_> = target.components().collect();
        let common = base_parts
            .iter()
            .zip(&target_parts)
            .take_while(|(a, b)| a == b)
            .count();
        let mut relative = PathBuf::new();
        for _ in common..base_parts.len() {
            relative.push("..");
        }
        for part in &target_parts[common..] {
            relative.push(part);
        }
        return relative;
    }
    target.to_path_buf()
}

/// Escape text for HTML element and attribute contexts
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
