use std::{
    fs::{File, OpenOptions},
    io::Write as _,
    path::Path,
};

use anyhow::Context as _;

use crate::error::{SamplerError, SamplerResult};

/// Append-only writer for the tab-separated ground-truth file. One line per
/// sample, `<relative image path>\t<phrase>`, never deduplicated.
pub struct MarkupWriter {
    file: File,
}

impl MarkupWriter {
    /// Open for append when the file exists, create it otherwise. The two
    /// failure modes stay distinct because the CLI maps them to different
    /// exit codes. Returns whether the file pre-existed.
    pub fn open(path: &Path) -> SamplerResult<(Self, bool)> {
        if path.exists() {
            let file = OpenOptions::new().append(true).open(path).map_err(|e| {
                SamplerError::MarkupAppend {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            Ok((Self { file }, true))
        } else {
            let file = File::create(path).map_err(|e| SamplerError::MarkupCreate {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok((Self { file }, false))
        }
    }

    pub fn append(&mut self, image_path: &str, phrase: &str) -> SamplerResult<()> {
        writeln!(self.file, "{image_path}\t{phrase}").context("write markup line")?;
        Ok(())
    }
}
