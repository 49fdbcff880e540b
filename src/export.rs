//! Transcript export
//!
//! Renders the conversation log, the current step list, and the final answer
//! into a single A4 PDF. Generation is CPU-bound and runs on a blocking
//! thread; any failure maps to a render error and leaves conversation state
//! untouched.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use tracing::info;

use crate::conversation::Conversation;
use crate::error::{ClientError, Result};
use crate::models::MessageKind;

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 20.0;
const LINE_HEIGHT_MM: f64 = 6.0;
const WRAP_COLUMNS: usize = 95;

/// Export the transcript as a PDF at `path`. Returns the written path.
pub async fn export_transcript(conversation: &Conversation, path: &Path) -> Result<PathBuf> {
    let snapshot = conversation.clone();
    let path = path.to_path_buf();

    let written = tokio::task::spawn_blocking(move || render_pdf(&snapshot, &path))
        .await
        .map_err(|e| ClientError::Render(format!("export task panicked: {}", e)))??;

    info!("Transcript exported to {}", written.display());
    Ok(written)
}

fn render_pdf(conversation: &Conversation, path: &Path) -> Result<PathBuf> {
    let (doc, page, layer) = PdfDocument::new(
        "Research Transcript",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ClientError::Render(format!("font load failed: {}", e)))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ClientError::Render(format!("font load failed: {}", e)))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
        page_count: 1,
    };

    writer.heading("Research Transcript", 18.0, &font_bold);
    writer.blank_line();

    for message in conversation.messages() {
        let speaker = match message.kind {
            MessageKind::User => "You".to_string(),
            MessageKind::Agent => "Agent".to_string(),
            MessageKind::Error => "Error".to_string(),
            MessageKind::Step => message
                .label
                .clone()
                .unwrap_or_else(|| "Step".to_string()),
        };

        writer.heading(
            &format!("{} @ {}", speaker, message.timestamp.format("%H:%M:%S")),
            11.0,
            &font_bold,
        );
        for line in wrap(&message.content) {
            writer.body_line(&line, &font);
        }
        writer.blank_line();
    }

    if !conversation.steps().is_empty() {
        writer.heading("Reasoning Steps", 14.0, &font_bold);
        for (index, step) in conversation.steps().iter().enumerate() {
            let detail = match step.content.as_deref() {
                Some(content) => format!("{}. [{}] {}", index + 1, step.step_type, content),
                None => format!("{}. [{}]", index + 1, step.step_type),
            };
            for line in wrap(&detail) {
                writer.body_line(&line, &font);
            }
            if let Some(points) = step.chart_data.as_ref() {
                writer.body_line(
                    &format!(
                        "   chart: {} points ({} vs {})",
                        points.len(),
                        step.x_key.as_deref().unwrap_or("x"),
                        step.y_key.as_deref().unwrap_or("y"),
                    ),
                    &font,
                );
            }
        }
        writer.blank_line();
    }

    if let Some(answer) = conversation.final_answer() {
        writer.heading("Final Answer", 14.0, &font_bold);
        for line in wrap(answer) {
            writer.body_line(&line, &font);
        }
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ClientError::Render(format!("document write failed: {}", e)))?;

    Ok(path.to_path_buf())
}

/// Cursor over the current page; adds pages as text runs past the bottom
/// margin.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
    page_count: usize,
}

impl PageWriter<'_> {
    fn heading(&mut self, text: &str, size: f64, font: &IndirectFontRef) {
        self.advance(LINE_HEIGHT_MM * (size / 11.0));
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn body_line(&mut self, text: &str, font: &IndirectFontRef) {
        self.advance(LINE_HEIGHT_MM);
        self.layer
            .use_text(text, 11.0, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn blank_line(&mut self) {
        self.advance(LINE_HEIGHT_MM / 2.0);
    }

    fn advance(&mut self, by: f64) {
        self.y -= by;
        if self.y < MARGIN_MM {
            self.page_count += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", self.page_count),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }
}

/// Greedy word wrap; long unbroken tokens are split hard at the column limit
fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word;
            while word.len() > WRAP_COLUMNS {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split_at = floor_char_boundary(word, WRAP_COLUMNS);
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
            }

            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= WRAP_COLUMNS {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index.max(1)
}
