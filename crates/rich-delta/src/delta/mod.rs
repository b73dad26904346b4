//! The operation sequence and its canonicalizing builder.
//!
//! A `Delta` made only of inserts is a document; one mixing inserts,
//! retains and deletes is a change applied left to right against a
//! document. Every builder method routes through [`Delta::push`], which
//! keeps the sequence canonical:
//!
//! - adjacent mergeable operations are merged,
//! - zero-length operations never appear,
//! - an insert pushed right after a delete is placed before it.
//!
//! Raw construction (`From<Vec<Op>>`, decoding) keeps operations as given.

mod compose;
mod invert;

use std::fmt;

use crate::attributes::AttributeMap;
use crate::iter::OpIterator;
use crate::op::{InsertContent, Op, OpType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    ops: Vec<Op>,
}

impl Delta {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn op_iter(&self) -> OpIterator<'_> {
        OpIterator::new(&self.ops)
    }

    // ── Builder ───────────────────────────────────────────────────────────

    pub fn insert(self, content: impl Into<InsertContent>) -> Self {
        self.insert_with(content, None)
    }

    /// Inserts formatted content. Empty text is ignored.
    pub fn insert_with(
        mut self,
        content: impl Into<InsertContent>,
        attributes: Option<AttributeMap>,
    ) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.push(Op::insert(content, attributes));
        }
        self
    }

    pub fn retain(self, len: usize) -> Self {
        self.retain_with(len, None)
    }

    /// Retains `len` items, applying `attributes` to them. Zero is ignored.
    pub fn retain_with(mut self, len: usize, attributes: Option<AttributeMap>) -> Self {
        if len > 0 {
            self.push(Op::Retain {
                len,
                attributes: attributes.and_then(AttributeMap::into_non_empty),
            });
        }
        self
    }

    pub fn delete(mut self, len: usize) -> Self {
        if len > 0 {
            self.push(Op::Delete { len });
        }
        self
    }

    /// Appends `new_op`, merging it into the tail when possible.
    pub fn push(&mut self, new_op: Op) -> &mut Self {
        let mut index = self.ops.len();
        let Some(last_op) = self.ops.last() else {
            self.ops.push(new_op);
            return self;
        };
        if let (Op::Delete { len: last_len }, Op::Delete { len }) = (last_op, &new_op) {
            let len = last_len.saturating_add(*len);
            self.ops[index - 1] = Op::Delete { len };
            return self;
        }
        // Insert-then-delete and delete-then-insert at the same position are
        // equivalent; the insert always goes first.
        if last_op.is_delete() && new_op.is_insert() {
            index -= 1;
            if index == 0 {
                self.ops.insert(0, new_op);
                return self;
            }
        }
        if let Some(new_op) = merge_into(&mut self.ops[index - 1], new_op) {
            self.ops.insert(index, new_op);
        }
        self
    }

    /// Drops a trailing bare retain, which carries no information.
    pub fn chop(mut self) -> Self {
        if matches!(
            self.ops.last(),
            Some(Op::Retain {
                attributes: None,
                ..
            })
        ) {
            self.ops.pop();
        }
        self
    }

    // ── Measures ──────────────────────────────────────────────────────────

    pub fn length(&self) -> usize {
        self.ops.iter().map(Op::length).sum()
    }

    /// How much longer the document gets once this change is applied.
    pub fn change_length(&self) -> i64 {
        self.ops.iter().fold(0i64, |length, op| match op {
            Op::Insert { .. } => length + op.length() as i64,
            Op::Delete { len } => length - *len as i64,
            Op::Retain { .. } => length,
        })
    }

    // ── Windowing ─────────────────────────────────────────────────────────

    /// Operations covering `[start, end)`, split at the bounds.
    pub fn slice(&self, start: usize, end: usize) -> Delta {
        let mut ops = Vec::new();
        let mut it = self.op_iter();
        let mut index = 0;
        while index < end && it.has_next() {
            if index < start {
                index += it.next_len(start - index).length();
            } else {
                let op = it.next_len(end - index);
                index += op.length();
                ops.push(op);
            }
        }
        Delta::from(ops)
    }

    pub fn slice_from(&self, start: usize) -> Delta {
        self.slice(start, usize::MAX)
    }

    /// `self` followed by `other`; the seam is merged when possible.
    pub fn concat(&self, other: &Delta) -> Delta {
        let mut delta = self.clone();
        if let Some((first, rest)) = other.ops.split_first() {
            delta.push(first.clone());
            delta.ops.extend_from_slice(rest);
        }
        delta
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    pub fn filter(&self, mut predicate: impl FnMut(&Op) -> bool) -> Delta {
        self.ops.iter().filter(|op| predicate(*op)).cloned().collect()
    }

    pub fn partition(&self, mut predicate: impl FnMut(&Op) -> bool) -> (Delta, Delta) {
        let (passed, failed): (Vec<Op>, Vec<Op>) =
            self.ops.iter().cloned().partition(|op| predicate(op));
        (Delta::from(passed), Delta::from(failed))
    }

    /// Text of a document; each embed is rendered as a newline.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for op in &self.ops {
            match op {
                Op::Insert {
                    content: InsertContent::Text(s),
                    ..
                } => text.push_str(s),
                Op::Insert { .. } => text.push('\n'),
                Op::Retain { .. } | Op::Delete { .. } => {}
            }
        }
        text
    }

    pub fn each_line<F>(&self, f: F)
    where
        F: FnMut(&Delta, Option<&AttributeMap>) -> bool,
    {
        self.each_line_with("\n", f)
    }

    /// Calls `f` with every line of a document and the attributes of the
    /// separator ending it. The last line, if not empty and not terminated,
    /// is passed with `None`. Stops when `f` returns `false` or at the first
    /// operation that is not an insert.
    pub fn each_line_with<F>(&self, newline: &str, mut f: F)
    where
        F: FnMut(&Delta, Option<&AttributeMap>) -> bool,
    {
        let newline_len = newline.chars().count();
        let mut it = self.op_iter();
        let mut line = Delta::new();
        while it.has_next() {
            if it.peek_type() != OpType::Insert {
                return;
            }
            let index = match it.peek_text() {
                Some(text) if !newline.is_empty() => text
                    .find(newline)
                    .map(|byte| text[..byte].chars().count()),
                _ => None,
            };
            match index {
                None => {
                    line.push(it.next_op());
                }
                Some(0) => {
                    let separator = it.next_len(newline_len);
                    if !f(&line, separator.attributes()) {
                        return;
                    }
                    line = Delta::new();
                }
                Some(index) => {
                    line.push(it.next_len(index));
                }
            }
        }
        if line.length() > 0 {
            f(&line, None);
        }
    }
}

/// Merges `next` into `last` when both are text inserts or both retains with
/// equal attributes. Hands `next` back when they cannot merge.
fn merge_into(last: &mut Op, next: Op) -> Option<Op> {
    if last.attributes() != next.attributes() {
        return Some(next);
    }
    match (last, next) {
        (
            Op::Insert {
                content: InsertContent::Text(text),
                ..
            },
            Op::Insert {
                content: InsertContent::Text(more),
                ..
            },
        ) => {
            text.push_str(&more);
            None
        }
        (Op::Retain { len, .. }, Op::Retain { len: more, .. }) => {
            *len = len.saturating_add(more);
            None
        }
        (_, next) => Some(next),
    }
}

impl From<Vec<Op>> for Delta {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

impl FromIterator<Op> for Delta {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Delta {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = crate::codec::json::to_json(self);
        match serde_json::to_string_pretty(&json) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
