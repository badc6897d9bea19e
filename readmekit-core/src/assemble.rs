//! Document assembly: composition snapshot to Markdown
//!
//! Blocks are concatenated in order with nothing inserted between them.
//! Spacing between sections is carried by each block's own content, which is
//! why the builtin templates end with a blank line.

use crate::composition::{BlockInstance, Snapshot};

/// Assemble the Markdown document for a snapshot
pub fn assemble(snapshot: &Snapshot) -> String {
    assemble_blocks(snapshot.blocks())
}

/// Concatenate block contents in order
pub fn assemble_blocks(blocks: &[BlockInstance]) -> String {
    let capacity = blocks.iter().map(|b| b.content.len()).sum();
    let mut markdown = String::with_capacity(capacity);
    for block in blocks {
        markdown.push_str(&block.content);
    }
    markdown
}
