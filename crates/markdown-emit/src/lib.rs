//! Materialise annotated fenced code blocks of a markdown document as files.
//!
//! A block whose info string reads `**<path>**:` has its body written to
//! `<path>`, creating parent directories on the way. Other blocks are left
//! alone. The first failure aborts the walk.

mod annotation;
mod block;
mod emit;
mod error;

pub use annotation::Annotation;
pub use block::{walk_fenced_blocks, BlockText, FencedCodeBlock};
pub use emit::{parent_dir, EmittedFile, Emitter};
pub use error::{EmitError, ErrorKind, ExitCode, ExtractError, ExtractResult};

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Decode and validate annotations without touching the file system.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Fenced code blocks visited, annotated or not.
    pub blocks: usize,
    /// Annotated blocks in document order.
    pub files: Vec<EmittedFile>,
}

pub fn extract_from_path(path: &Path, options: &ExtractOptions) -> ExtractResult<ExtractReport> {
    info!(path = %path.display(), "reading markdown file");
    let document = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    extract_from_str(&document, options)
}

/// Reads the whole of `reader` before walking it. Read failures are reported
/// against the path `-`.
pub fn extract_from_reader<R: Read>(
    reader: &mut R,
    options: &ExtractOptions,
) -> ExtractResult<ExtractReport> {
    info!("reading markdown from stream");
    let mut document = String::new();
    reader
        .read_to_string(&mut document)
        .map_err(|source| read_error(Path::new("-"), source))?;
    extract_from_str(&document, options)
}

pub fn extract_from_str(document: &str, options: &ExtractOptions) -> ExtractResult<ExtractReport> {
    let emitter = Emitter::new(options.dry_run);
    let mut files = Vec::new();

    let blocks = walk_fenced_blocks(document, |block| -> Result<(), EmitError> {
        let Some(annotation) = Annotation::decode(&block.info) else {
            return Ok(());
        };

        info!(path = annotation.path(), "extracted filename");
        let content = block.content();
        files.push(emitter.emit(annotation.path(), content.as_bytes())?);
        Ok(())
    })
    .map_err(|err| {
        error!(error = %err, "error walking through AST");
        ExtractError::Walk(err)
    })?;

    info!(blocks, files = files.len(), "markdown parsing completed successfully");
    Ok(ExtractReport { blocks, files })
}

fn read_error(path: &Path, source: std::io::Error) -> ExtractError {
    error!(path = %path.display(), error = %source, "error reading file");
    ExtractError::Read {
        path: PathBuf::from(path),
        source,
    }
}
