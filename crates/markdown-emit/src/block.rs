use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use std::ops::Range;
use tracing::debug;

/// One piece of a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockText {
    /// Byte range into the source document.
    Span(Range<usize>),
    /// Indentation the parser synthesised from a partly consumed tab.
    Padding(String),
}

/// A fenced code block borrowed from its source document.
#[derive(Debug, Clone)]
pub struct FencedCodeBlock<'a> {
    source: &'a str,
    pub info: String,
    /// Byte offset of the opening fence.
    pub start: usize,
    pieces: Vec<BlockText>,
}

impl<'a> FencedCodeBlock<'a> {
    fn new(source: &'a str, info: String, start: usize) -> Self {
        Self {
            source,
            info,
            start,
            pieces: Vec::new(),
        }
    }

    /// The block body in document order.
    pub fn pieces(&self) -> &[BlockText] {
        &self.pieces
    }

    /// Byte ranges of the block body within the source, padding excluded.
    pub fn line_spans(&self) -> impl Iterator<Item = &Range<usize>> + '_ {
        self.pieces.iter().filter_map(|piece| match piece {
            BlockText::Span(span) => Some(span),
            BlockText::Padding(_) => None,
        })
    }

    /// The literal block body, line terminators included.
    pub fn content(&self) -> String {
        let mut content = String::new();
        for piece in &self.pieces {
            match piece {
                BlockText::Span(span) => content.push_str(&self.source[span.clone()]),
                BlockText::Padding(padding) => content.push_str(padding),
            }
        }
        content
    }

    fn push_text(&mut self, text: &str, range: Range<usize>) {
        if text.len() != range.len() {
            self.pieces.push(BlockText::Padding(text.to_string()));
            return;
        }

        // The parser reports `\r\n` as the text before `\r` followed by a
        // lone `\n`; fold the carriage return back in.
        if let Some(BlockText::Span(last)) = self.pieces.last_mut() {
            if last.end + 1 == range.start && self.source.as_bytes()[last.end] == b'\r' {
                last.end = range.end;
                return;
            }
        }
        self.pieces.push(BlockText::Span(range));
    }
}

/// Visits every fenced code block of `source` in document order.
///
/// Indented code blocks and all other markup are skipped. The first error
/// returned by `visit` stops the walk and is handed back unchanged. On
/// success the number of fenced blocks visited is returned.
pub fn walk_fenced_blocks<'a, E, F>(source: &'a str, mut visit: F) -> Result<usize, E>
where
    F: FnMut(&FencedCodeBlock<'a>) -> Result<(), E>,
{
    let mut current: Option<FencedCodeBlock<'a>> = None;
    let mut visited = 0usize;

    for (event, range) in Parser::new_ext(source, Options::all()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some(FencedCodeBlock::new(
                    source,
                    info.into_string(),
                    range.start,
                ));
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.push_text(&text, range);
                }
            }
            Event::End(Tag::CodeBlock(_)) => {
                if let Some(block) = current.take() {
                    visited += 1;
                    debug!(offset = block.start, info = %block.info, "fenced code block found");
                    visit(&block)?;
                }
            }
            _ => {}
        }
    }

    Ok(visited)
}
