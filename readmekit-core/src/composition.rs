//! Composition store: the ordered blocks that make up the README being built
//!
//! The [`Composition`] is the single source of truth for document state. All
//! mutation goes through its methods so that the invariants hold after every
//! call:
//! - block ids are unique and never reused, even after removal
//! - order only changes as the operation intends
//! - a failed operation leaves the composition exactly as it was
//!
//! Observers call [`Composition::subscribe`] and receive a [`Change`] for every
//! successful mutation.

use crossbeam_channel::{Receiver, Sender};
use std::fmt;

use crate::catalog::BlockTemplate;
use crate::error::{CompositionError, CompositionResult};

/// Identifier of a block instance within one composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A selected template placed into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInstance {
    pub id: BlockId,
    /// Template as it was when selected
    pub template: BlockTemplate,
    pub content: String,
}

impl BlockInstance {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Whether the content differs from the originating template
    pub fn is_modified(&self) -> bool {
        self.content != self.template.markdown
    }
}

/// What a mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionEvent {
    Added { id: BlockId, index: usize },
    Removed { id: BlockId, index: usize },
    Moved { id: BlockId, from: usize, to: usize },
    ContentChanged { id: BlockId },
    Cleared,
}

/// Notification sent to subscribers after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub rev: u64,
    pub event: CompositionEvent,
}

/// Read-only view of a composition at one revision
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    rev: u64,
    blocks: Vec<BlockInstance>,
}

impl Snapshot {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Ordered, observable collection of block instances
#[derive(Debug, Default)]
pub struct Composition {
    blocks: Vec<BlockInstance>,
    next_id: u64,
    rev: u64,
    subscribers: Vec<Sender<Change>>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `template` to the end of the document
    pub fn add_block(&mut self, template: &BlockTemplate) -> BlockId {
        let index = self.blocks.len();
        let instance = self.instantiate(template);
        let id = instance.id;
        self.blocks.push(instance);

        log::debug!("added block {} ({}) at {}", id, template.name, index);
        self.notify(CompositionEvent::Added { id, index });
        id
    }

    /// Insert a copy of `template` at `index` (`0..=len`)
    pub fn insert_block(&mut self, template: &BlockTemplate, index: usize) -> CompositionResult<BlockId> {
        if index > self.blocks.len() {
            return Err(CompositionError::OutOfRange {
                index,
                len: self.blocks.len(),
            });
        }

        let instance = self.instantiate(template);
        let id = instance.id;
        self.blocks.insert(index, instance);

        log::debug!("inserted block {} ({}) at {}", id, template.name, index);
        self.notify(CompositionEvent::Added { id, index });
        Ok(id)
    }

    /// Remove a block, returning it
    pub fn remove_block(&mut self, id: BlockId) -> CompositionResult<BlockInstance> {
        let index = self.index_of(id)?;
        let removed = self.blocks.remove(index);

        log::debug!("removed block {} from {}", id, index);
        self.notify(CompositionEvent::Removed { id, index });
        Ok(removed)
    }

    /// Move a block to `target` (`0..len`), shifting the blocks in between.
    ///
    /// Out-of-range targets are rejected rather than clamped.
    pub fn move_block(&mut self, id: BlockId, target: usize) -> CompositionResult<()> {
        let from = self.index_of(id)?;
        if target >= self.blocks.len() {
            return Err(CompositionError::OutOfRange {
                index: target,
                len: self.blocks.len(),
            });
        }
        if from == target {
            return Ok(());
        }

        let block = self.blocks.remove(from);
        self.blocks.insert(target, block);

        log::debug!("moved block {} from {} to {}", id, from, target);
        self.notify(CompositionEvent::Moved { id, from, to: target });
        Ok(())
    }

    /// Replace the content of a block
    pub fn update_block_content(&mut self, id: BlockId, content: impl Into<String>) -> CompositionResult<()> {
        let index = self.index_of(id)?;
        let content = content.into();
        if self.blocks[index].content == content {
            return Ok(());
        }

        self.blocks[index].content = content;

        log::debug!("updated content of block {}", id);
        self.notify(CompositionEvent::ContentChanged { id });
        Ok(())
    }

    /// Restore a block's content to the template it was created from
    pub fn reset_block_content(&mut self, id: BlockId) -> CompositionResult<()> {
        let index = self.index_of(id)?;
        let original = self.blocks[index].template.markdown.clone();
        self.update_block_content(id, original)
    }

    /// Remove every block. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        if self.blocks.is_empty() {
            return;
        }
        self.blocks.clear();

        log::debug!("cleared composition");
        self.notify(CompositionEvent::Cleared);
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Block at `index` in document order
    pub fn block_at(&self, index: usize) -> Option<&BlockInstance> {
        self.blocks.get(index)
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of successful mutations so far
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rev: self.rev,
            blocks: self.blocks.clone(),
        }
    }

    /// Register for change notifications.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Change> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn instantiate(&mut self, template: &BlockTemplate) -> BlockInstance {
        let id = BlockId(self.next_id);
        self.next_id += 1;

        BlockInstance {
            id,
            template: template.clone(),
            content: template.markdown.clone(),
        }
    }

    fn index_of(&self, id: BlockId) -> CompositionResult<usize> {
        self.position(id).ok_or(CompositionError::NotFound(id))
    }

    fn notify(&mut self, event: CompositionEvent) {
        self.rev += 1;
        let change = Change { rev: self.rev, event };
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
