//! Pure projection of a [`ViewState`] into HTML.
//!
//! Error messages, viewer documents, extracted text and the table all render
//! when their slot is populated, in that order. The documents slot is handed
//! untouched to a [`DocumentViewer`] together with the fixed plugin set.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::sync::Arc;

use crate::config::PreviewConfig;
use crate::core::locator::LocatorRegistry;
use crate::core::state::{DocumentEntry, ViewState};
use crate::error::{PreviewError, Result};

/// Rendering plugins of the generic viewer, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plugin {
    Image,
    Pdf,
    Html,
    Video,
    Audio,
    Fallback,
}

impl Plugin {
    pub const DEFAULTS: [Plugin; 6] = [
        Plugin::Image,
        Plugin::Pdf,
        Plugin::Html,
        Plugin::Video,
        Plugin::Audio,
        Plugin::Fallback,
    ];

    pub fn accepts(self, media_type: &str) -> bool {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match self {
            Plugin::Image => essence.starts_with("image/"),
            Plugin::Pdf => essence == "application/pdf",
            Plugin::Html => essence == "text/html" || essence == "application/xhtml+xml",
            Plugin::Video => essence.starts_with("video/"),
            Plugin::Audio => essence.starts_with("audio/"),
            Plugin::Fallback => true,
        }
    }

    fn write(
        self,
        writer: &mut Writer<Vec<u8>>,
        doc: &DocumentEntry,
        src: &str,
    ) -> quick_xml::Result<()> {
        match self {
            Plugin::Image => writer.write_event(Event::Empty(element(
                "img",
                &[("src", src), ("alt", doc.name.as_str()), ("style", "max-width: 100%")],
            ))),
            Plugin::Pdf => {
                start(
                    writer,
                    "iframe",
                    &[
                        ("src", src),
                        ("title", doc.name.as_str()),
                        ("width", "100%"),
                        ("height", "600"),
                    ],
                )?;
                end(writer, "iframe")
            }
            Plugin::Html => {
                start(
                    writer,
                    "iframe",
                    &[
                        ("src", src),
                        ("title", doc.name.as_str()),
                        ("sandbox", ""),
                        ("width", "100%"),
                        ("height", "600"),
                    ],
                )?;
                end(writer, "iframe")
            }
            Plugin::Video => {
                start(writer, "video", &[("src", src), ("controls", "controls")])?;
                end(writer, "video")
            }
            Plugin::Audio => {
                start(writer, "audio", &[("src", src), ("controls", "controls")])?;
                end(writer, "audio")
            }
            Plugin::Fallback => {
                start(writer, "p", &[])?;
                text(writer, &format!("No preview available for {} ", doc.name))?;
                start(writer, "a", &[("href", src), ("download", doc.name.as_str())])?;
                text(writer, "Download")?;
                end(writer, "a")?;
                end(writer, "p")
            }
        }
    }
}

/// Generic multi-format viewer for the documents slot.
pub trait DocumentViewer: Send + Sync {
    /// Render the full document sequence as an HTML fragment.
    fn render(&self, documents: &[DocumentEntry], plugins: &[Plugin]) -> anyhow::Result<String>;
}

/// Viewer that embeds each document's bytes as a `data:` URI when allowed,
/// falling back to the raw locator.
pub struct InlineViewer {
    registry: Arc<LocatorRegistry>,
    inline: bool,
    max_inline_bytes: u64,
}

impl InlineViewer {
    pub fn new(registry: Arc<LocatorRegistry>, config: &PreviewConfig) -> Self {
        Self {
            registry,
            inline: config.inline_documents,
            max_inline_bytes: config.max_inline_bytes,
        }
    }

    fn source_for(&self, doc: &DocumentEntry) -> String {
        if self.inline {
            if let Some(resource) = self.registry.resolve(&doc.locator) {
                if resource.bytes.len() as u64 <= self.max_inline_bytes {
                    let media_type = if resource.media_type.is_empty() {
                        "application/octet-stream"
                    } else {
                        resource.media_type.as_str()
                    };
                    let encoded = STANDARD.encode(&resource.bytes);
                    return format!("data:{};base64,{}", media_type, encoded);
                }
                debug!("{} too large to inline, referencing locator", doc.name);
            } else {
                warn!("Locator for {} is no longer registered", doc.name);
            }
        }
        doc.locator.to_string()
    }
}

impl DocumentViewer for InlineViewer {
    fn render(&self, documents: &[DocumentEntry], plugins: &[Plugin]) -> anyhow::Result<String> {
        let mut writer = Writer::new(Vec::new());
        start(&mut writer, "div", &[("class", "doc-viewer")])?;

        for doc in documents {
            let plugin = plugins
                .iter()
                .copied()
                .find(|p| p.accepts(&doc.media_type))
                .unwrap_or(Plugin::Fallback);
            let src = self.source_for(doc);

            start(
                &mut writer,
                "div",
                &[("class", "doc-viewer-item"), ("data-media-type", doc.media_type.as_str())],
            )?;
            plugin.write(&mut writer, doc, &src)?;
            end(&mut writer, "div")?;
        }

        end(&mut writer, "div")?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Render a complete HTML page for `state`.
pub fn render_page(
    state: &ViewState,
    viewer: &dyn DocumentViewer,
    config: &PreviewConfig,
) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    start(&mut writer, "html", &[])?;
    start(&mut writer, "head", &[])?;
    writer.write_event(Event::Empty(element("meta", &[("charset", "utf-8")])))?;
    start(&mut writer, "title", &[])?;
    text(&mut writer, &config.page_title)?;
    end(&mut writer, "title")?;
    end(&mut writer, "head")?;

    start(&mut writer, "body", &[])?;
    start(&mut writer, "div", &[("class", "App")])?;
    start(&mut writer, "h2", &[])?;
    text(&mut writer, &config.page_title)?;
    end(&mut writer, "h2")?;
    write_slots(&mut writer, state, viewer)?;
    end(&mut writer, "div")?;
    end(&mut writer, "body")?;
    end(&mut writer, "html")?;

    into_string(writer)
}

/// Render only the slots, without page chrome.
pub fn render_fragment(state: &ViewState, viewer: &dyn DocumentViewer) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_slots(&mut writer, state, viewer)?;
    into_string(writer)
}

fn write_slots(
    writer: &mut Writer<Vec<u8>>,
    state: &ViewState,
    viewer: &dyn DocumentViewer,
) -> Result<()> {
    for error in &state.errors {
        start(writer, "p", &[("style", "color: red"), ("title", error.file_name.as_str())])?;
        text(writer, &error.message)?;
        end(writer, "p")?;
    }

    if !state.documents.is_empty() {
        let fragment = viewer
            .render(&state.documents, &Plugin::DEFAULTS)
            .map_err(PreviewError::Viewer)?;
        writer.write_event(Event::Text(BytesText::from_escaped(fragment.as_str())))?;
    }

    if !state.text_content.is_empty() {
        start(writer, "pre", &[("style", "white-space: pre-wrap")])?;
        text(writer, &state.text_content)?;
        end(writer, "pre")?;
    }

    if let Some(rows) = &state.table_content {
        start(
            writer,
            "table",
            &[("border", "1"), ("style", "border-collapse: collapse; margin: 10px 0")],
        )?;
        start(writer, "tbody", &[])?;
        for row in rows {
            start(writer, "tr", &[])?;
            for cell in row {
                start(writer, "td", &[("style", "padding: 5px")])?;
                text(writer, &cell.to_string())?;
                end(writer, "td")?;
            }
            end(writer, "tr")?;
        }
        end(writer, "tbody")?;
        end(writer, "table")?;
    }

    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    // Every byte written came from a &str.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(name);
    for attr in attrs {
        el.push_attribute(*attr);
    }
    el
}

fn start(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attrs: &[(&str, &str)],
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(element(name, attrs)))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn text(writer: &mut Writer<Vec<u8>>, content: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Text(BytesText::new(content)))
}
