//! Turning transcript messages into terminal text

use crate::api::Source;
use crate::chat::{Message, Role};

use super::colors::Palette;
use super::render::MarkdownRenderer;

/// Render one message with its speaker label
pub fn format_message(message: &Message, palette: Palette, show_sources: bool) -> String {
    match message.role {
        Role::User => format!(
            "{}\n{}",
            palette.speaker(palette.user, "You"),
            palette.paint(palette.text, &message.text)
        ),
        Role::Bot => {
            let mut out = palette.speaker(palette.bot, "Assistant");
            out.push('\n');

            if message.is_streaming {
                out.push_str(&palette.status("thinking... (Ctrl+C to stop)"));
            } else if message.is_error {
                out.push_str(&palette.error(&message.text));
            } else if message.is_stopped {
                out.push_str(&palette.warning(&message.text));
            } else {
                out.push_str(&MarkdownRenderer::new(palette).render(&message.text));
            }

            if show_sources {
                if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
                    out.push_str("\n\n");
                    out.push_str(&format_sources(sources, palette));
                }
            }
            if let Some(secs) = message.response_time {
                out.push('\n');
                out.push_str(&palette.status(&format!("[answered in {:.2}s]", secs)));
            }
            out
        }
    }
}

/// List cited documents, one line each, best score per document
pub fn format_sources(sources: &[Source], palette: Palette) -> String {
    let mut unique: Vec<&Source> = Vec::new();
    for source in sources {
        match unique.iter_mut().find(|s| s.source == source.source) {
            Some(existing) if existing.score < source.score => *existing = source,
            Some(_) => {}
            None => unique.push(source),
        }
    }

    let mut out = palette.status("Sources:");
    for source in unique {
        out.push_str(&format!(
            "\n  {} {}",
            palette.paint(palette.link, &source.source),
            palette.status(&format!("({:.3})", source.score))
        ));
    }
    out
}
