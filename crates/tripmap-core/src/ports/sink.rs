use std::path::Path;

use crate::error::Result;

/// Port for persisting a finished artifact
pub trait ArtifactSink {
    /// Write `document` to `target`
    ///
    /// Implementations must not leave a partially written file at `target` when they fail.
    fn write(&self, target: &Path, document: &str) -> Result<()>;
}
