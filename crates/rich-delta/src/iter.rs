//! Cursor over the operations of a delta.
//!
//! The cursor can consume any length, splitting operations as needed, which
//! lets compose and invert walk two deltas with differently sized chunks in
//! lock-step. Past the end it behaves as an unbounded bare retain, so loops
//! never special-case the end of a sequence.

use crate::delta::Delta;
use crate::op::{InsertContent, Op, OpType};

#[derive(Debug, Clone)]
pub struct OpIterator<'a> {
    ops: &'a [Op],
    index: usize,
    /// Consumed part of the current operation, in items.
    offset: usize,
    /// Same position in bytes; only moves inside text inserts.
    byte_offset: usize,
    /// Length of the current operation, counted once on entry.
    current_len: usize,
}

impl<'a> OpIterator<'a> {
    pub fn new(ops: &'a [Op]) -> Self {
        let mut it = Self {
            ops,
            index: 0,
            offset: 0,
            byte_offset: 0,
            current_len: 0,
        };
        it.enter(0);
        it
    }

    fn enter(&mut self, index: usize) {
        self.index = index;
        self.offset = 0;
        self.byte_offset = 0;
        self.current_len = self.ops.get(index).map_or(0, Op::length);
    }

    pub fn has_next(&self) -> bool {
        self.peek_length() < usize::MAX
    }

    /// The current operation, ignoring how much of it was consumed.
    pub fn peek(&self) -> Option<&'a Op> {
        self.ops.get(self.index)
    }

    pub fn peek_length(&self) -> usize {
        if self.index < self.ops.len() {
            self.current_len - self.offset
        } else {
            usize::MAX
        }
    }

    pub fn peek_type(&self) -> OpType {
        self.peek().map_or(OpType::Retain, Op::op_type)
    }

    /// Unconsumed text of the current operation when it is a text insert.
    pub fn peek_text(&self) -> Option<&'a str> {
        match self.peek() {
            Some(Op::Insert {
                content: InsertContent::Text(text),
                ..
            }) => Some(&text[self.byte_offset..]),
            _ => None,
        }
    }

    /// Consumes up to `length` of the current operation.
    pub fn next_len(&mut self, length: usize) -> Op {
        let ops = self.ops;
        let Some(next_op) = ops.get(self.index) else {
            return Op::retain_until_end();
        };
        let remaining = self.current_len - self.offset;
        let length = length.min(remaining);
        let op = match next_op {
            Op::Delete { .. } => Op::Delete { len: length },
            Op::Retain { attributes, .. } => Op::Retain {
                len: length,
                attributes: attributes.clone(),
            },
            Op::Insert {
                content: InsertContent::Text(text),
                attributes,
            } => {
                let tail = &text[self.byte_offset..];
                let end = if length == remaining {
                    tail.len()
                } else {
                    tail.char_indices().nth(length).map_or(tail.len(), |(i, _)| i)
                };
                self.byte_offset += end;
                Op::Insert {
                    content: InsertContent::Text(tail[..end].to_string()),
                    attributes: attributes.clone(),
                }
            }
            Op::Insert {
                content,
                attributes,
            } => Op::Insert {
                content: content.clone(),
                attributes: attributes.clone(),
            },
        };
        if length == remaining {
            self.enter(self.index + 1);
        } else {
            self.offset += length;
        }
        op
    }

    /// Consumes whatever is left of the current operation.
    pub fn next_op(&mut self) -> Op {
        self.next_len(usize::MAX)
    }

    /// Everything not consumed yet, the partial current operation included.
    pub fn rest(&self) -> Delta {
        if !self.has_next() {
            return Delta::new();
        }
        if self.offset == 0 {
            return Delta::from(self.ops[self.index..].to_vec());
        }
        let mut cursor = self.clone();
        let mut ops = vec![cursor.next_op()];
        ops.extend_from_slice(&self.ops[cursor.index..]);
        Delta::from(ops)
    }
}

impl Iterator for OpIterator<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        if self.has_next() {
            Some(self.next_op())
        } else {
            None
        }
    }
}
