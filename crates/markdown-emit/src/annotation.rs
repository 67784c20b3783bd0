use tracing::trace;

const OPEN_MARKER: &str = "**";
const CLOSE_MARKER: &str = "**:";

/// Destination path carried by an info string of the form `**<path>**:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    path: &'a str,
}

impl<'a> Annotation<'a> {
    /// Decodes an info string, returning `None` for anything that is not an
    /// exact `**<path>**:` wrapper. The path is returned untouched.
    ///
    /// Markers may not overlap, so `**:` and `***:` carry no annotation while
    /// `****:` decodes to an empty path.
    ///
    /// The whole info string is matched, so `**a/x.txt**: rust` is not an
    /// annotation even though its first word would be.
    pub fn decode(info: &'a str) -> Option<Self> {
        let Some(path) = info
            .strip_prefix(OPEN_MARKER)
            .and_then(|rest| rest.strip_suffix(CLOSE_MARKER))
        else {
            trace!(info, "no filename found in info string");
            return None;
        };

        Some(Self { path })
    }

    pub fn path(&self) -> &'a str {
        self.path
    }
}
