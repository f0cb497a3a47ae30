use std::any::{type_name, Any};
use std::mem;

use crate::error::ComposeError;
use crate::owned::Owned;
use crate::Key;

enum Slot {
    /// Group header. `len` covers the header and everything nested inside it.
    Group { key: Key, len: usize },
    Value(Box<dyn Any>),
}

impl Slot {
    fn width(&self) -> usize {
        match self {
            Slot::Group { len, .. } => *len,
            Slot::Value(_) => 1,
        }
    }
}

struct GroupFrame {
    start: usize,
    /// Exclusive end of the group's slots as laid out by the previous pass,
    /// shifted by every insert or removal made since.
    end: usize,
    fresh: bool,
}

/// Positional per-call-site storage.
///
/// A pass walks the table with a cursor. Groups are matched by key against the
/// previous pass, value cells by position and type. Whatever a pass does not
/// revisit is dropped, which is how unmounting releases state and queues
/// effect cleanups.
#[derive(Default)]
pub struct SlotTable {
    slots: Vec<Slot>, // FUTURE(no_std): replace Vec with arena-backed slot storage.
    cursor: usize,
    stack: Vec<GroupFrame>, // FUTURE(no_std): switch to small stack buffer.
    faults: Vec<ComposeError>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn scope_end(&self) -> usize {
        self.stack
            .last()
            .map_or(self.slots.len(), |frame| frame.end)
    }

    fn in_fresh_group(&self) -> bool {
        self.stack.last().map_or(true, |frame| frame.fresh)
    }

    pub fn start(&mut self, key: Key) {
        let end = self.scope_end();
        let mut index = self.cursor;
        let mut found = None;
        while index < end {
            match &self.slots[index] {
                Slot::Group { key: existing, .. } if *existing == key => {
                    found = Some(index);
                    break;
                }
                Slot::Group { len, .. } => index += *len,
                Slot::Value(_) => break,
            }
        }
        let fresh = match found {
            Some(index) => {
                self.remove_range(self.cursor, index);
                false
            }
            None => {
                self.insert(Slot::Group { key, len: 1 });
                true
            }
        };
        let start = self.cursor;
        let len = self.slots[start].width();
        self.stack.push(GroupFrame {
            start,
            end: start + len,
            fresh,
        });
        self.cursor += 1;
    }

    pub fn end(&mut self) {
        let Some(frame) = self.stack.last() else {
            return;
        };
        let (start, end, fresh) = (frame.start, frame.end, frame.fresh);
        if self.cursor < end {
            let skipped = self.count_values(self.cursor, end);
            if skipped > 0 && !fresh {
                self.faults.push(ComposeError::HooksSkipped {
                    slot: self.cursor,
                    count: skipped,
                });
            }
            self.remove_range(self.cursor, end);
        }
        self.stack.pop();
        if let Some(Slot::Group { len, .. }) = self.slots.get_mut(start) {
            *len = self.cursor - start;
        }
    }

    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        match self.find_value::<T>() {
            Some(existing) => existing,
            None => self.insert_value(init()),
        }
    }

    /// Reuses the value cell at the cursor when it holds a `T`.
    ///
    /// On a miss the stale cell, if any, is dropped and the fault recorded;
    /// the cursor is left where [`SlotTable::insert_value`] will place the
    /// new cell.
    pub fn find_value<T: 'static>(&mut self) -> Option<Owned<T>> {
        let end = self.scope_end();
        let mut index = self.cursor;
        while index < end {
            match &self.slots[index] {
                Slot::Group { len, .. } => index += *len,
                Slot::Value(_) => break,
            }
        }
        if index < end {
            if let Slot::Value(value) = &self.slots[index] {
                if let Some(existing) = value.downcast_ref::<Owned<T>>() {
                    let existing = existing.clone();
                    // Groups sitting in front of the cell were not revisited.
                    self.remove_range(self.cursor, index);
                    self.cursor += 1;
                    return Some(existing);
                }
            }
            self.report_mismatch::<T>();
            self.remove_range(self.cursor, index + 1);
        } else if !self.in_fresh_group() {
            self.report_mismatch::<T>();
        }
        None
    }

    pub fn insert_value<T: 'static>(&mut self, value: T) -> Owned<T> {
        let owned = Owned::new(value);
        self.insert(Slot::Value(Box::new(owned.clone())));
        self.cursor += 1;
        owned
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.stack.clear();
    }

    /// Drops everything the pass did not reach at the root level.
    pub fn finish(&mut self) {
        while !self.stack.is_empty() {
            self.end();
        }
        let len = self.slots.len();
        self.remove_range(self.cursor, len);
    }

    /// Drops every slot, front to back.
    pub fn clear(&mut self) {
        let slots = mem::take(&mut self.slots);
        self.reset();
        drop(slots);
    }

    pub fn take_faults(&mut self) -> Vec<ComposeError> {
        mem::take(&mut self.faults)
    }

    fn report_mismatch<T: 'static>(&mut self) {
        self.faults.push(ComposeError::HookMismatch {
            slot: self.cursor,
            requested: type_name::<T>(),
        });
    }

    fn count_values(&self, from: usize, to: usize) -> usize {
        let mut index = from;
        let mut count = 0;
        while index < to {
            if let Slot::Value(_) = self.slots[index] {
                count += 1;
            }
            index += self.slots[index].width();
        }
        count
    }

    fn insert(&mut self, slot: Slot) {
        self.slots.insert(self.cursor, slot);
        for frame in &mut self.stack {
            frame.end += 1;
        }
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let removed: Vec<Slot> = self.slots.drain(from..to).collect();
        let count = to - from;
        for frame in &mut self.stack {
            frame.end -= count;
        }
        // Destructors run only after the frames are consistent again.
        drop(removed);
    }
}

#[cfg(test)]
#[path = "tests/slot_table_tests.rs"]
mod tests;
