//! The `merge` command: print the document with every include folded in.
//!
//! Templates are left untouched. A document without includes is printed as
//! it was read.

use anyhow::Result;
use clap::Args;
use super::common::{InputArgs, write_output};

#[derive(Args)]
pub struct MergeCommand {
    #[command(flatten)]
    input: InputArgs,
}

impl MergeCommand {
    pub fn execute(self) -> Result<()> {
        let merged = self.input.merged_text()?;
        write_output(None, merged.trim_end_matches('\n').as_bytes())
    }
}
