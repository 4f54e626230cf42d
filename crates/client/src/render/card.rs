//! HTML markup for a link preview card.

use rinku_core::{LinkMetadata, PreviewSize};
use url::Url;

/// Build a self-contained HTML document that draws `metadata` as a card
/// filling exactly `size` CSS pixels.
pub fn card_html(metadata: &LinkMetadata, size: PreviewSize) -> String {
    let (width, height) = size.pixels();
    let host = Url::parse(&metadata.url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| metadata.url.clone());
    let title = metadata.title.as_deref().unwrap_or(&host);

    let image = metadata
        .image
        .as_ref()
        .map(|handle| format!(r#"<img class="thumb" src="{}" alt="">"#, escape_html(handle.as_str())))
        .unwrap_or_default();

    // Title size scales with the card's height so small cards stay legible.
    let title_px = (height as f64 * 0.14).clamp(12.0, 32.0).round() as u32;
    let host_px = (title_px as f64 * 0.7).max(10.0).round() as u32;

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body {{ margin: 0; padding: 0; width: {width}px; height: {height}px; overflow: hidden; }}
  body {{ font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; background: #ffffff; }}
  .card {{ box-sizing: border-box; display: flex; width: {width}px; height: {height}px;
           border: 1px solid #d0d7de; border-radius: 12px; overflow: hidden; background: #f6f8fa; }}
  .thumb {{ flex: 0 0 auto; height: 100%; max-width: 50%; object-fit: cover; }}
  .text {{ flex: 1 1 auto; min-width: 0; padding: 12px 16px; display: flex; flex-direction: column; justify-content: center; }}
  .title {{ font-size: {title_px}px; font-weight: 600; color: #1f2328; line-height: 1.25;
            display: -webkit-box; -webkit-line-clamp: 3; -webkit-box-orient: vertical; overflow: hidden; }}
  .host {{ margin-top: 6px; font-size: {host_px}px; color: #656d76; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }}
</style>
</head>
<body>
<div class="card">{image}<div class="text"><div class="title">{title}</div><div class="host">{host}</div></div></div>
</body>
</html>"#,
        title = escape_html(title),
        host = escape_html(&host),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
