use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub trait TextExtractor: Send + Sync {
    /// Extract the raw text of a word-processing document held in `bytes`.
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String>;
}

/// DocxExtractor: raw text of `word/document.xml`, one blank-line separated block per paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    fn read_document_xml(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).context("not a zip container")?;

        let mut doc_xml = String::new();
        archive
            .by_name("word/document.xml")
            .context("word/document.xml missing")?
            .read_to_string(&mut doc_xml)?;
        Ok(doc_xml)
    }

    /// Append the runs of one paragraph to `text`. Paragraphs of text boxes anchored
    /// in it are written to `nested` as blocks of their own.
    fn extract_text_from_paragraph(&self, node: Node, text: &mut String, nested: &mut String) {
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "t" => {
                    if let Some(txt) = child.text() {
                        text.push_str(txt);
                    }
                }
                "tab" => text.push('\t'),
                "br" | "cr" => text.push('\n'),
                "txbxContent" => self.write_blocks(child, nested),
                "AlternateContent" => {
                    if let Some(branch) = alternate_branch(child) {
                        self.extract_text_from_paragraph(branch, text, nested);
                    }
                }
                _ => self.extract_text_from_paragraph(child, text, nested),
            }
        }
    }

    /// Write every paragraph under `node` as a `\n\n` terminated block.
    fn write_blocks(&self, node: Node, output: &mut String) {
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "p" => {
                    let mut nested = String::new();
                    self.extract_text_from_paragraph(child, output, &mut nested);
                    output.push_str("\n\n");
                    output.push_str(&nested);
                }
                "AlternateContent" => {
                    if let Some(branch) = alternate_branch(child) {
                        self.write_blocks(branch, output);
                    }
                }
                _ => self.write_blocks(child, output),
            }
        }
    }
}

/// Word stores drawings twice under `mc:AlternateContent`. Only the `mc:Fallback`
/// copy is read, or the `mc:Choice` copy when no fallback exists.
fn alternate_branch<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    let branch =
        |name: &str| node.children().find(|n| n.is_element() && n.tag_name().name() == name);
    branch("Fallback").or_else(|| branch("Choice"))
}

impl TextExtractor for DocxExtractor {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String> {
        let doc_xml = self.read_document_xml(bytes)?;
        let doc = Document::parse(&doc_xml).context("malformed document.xml")?;

        let mut output = String::new();
        self.write_blocks(doc.root_element(), &mut output);
        Ok(output)
    }
}
