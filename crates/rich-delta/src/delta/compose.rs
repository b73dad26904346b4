//! Sequential composition: `a.compose(b)` has the effect of applying `a`
//! and then `b`.

use tracing::trace;

use super::Delta;
use crate::attributes;
use crate::op::{Op, OpType};

impl Delta {
    pub fn compose(&self, other: &Delta) -> Delta {
        trace!(left = self.ops.len(), right = other.ops.len(), "compose");
        let mut this_iter = self.op_iter();
        let mut other_iter = other.op_iter();
        let mut delta = Delta::new();

        // A leading bare retain in `other` keeps whole inserts of `self`
        // untouched, so they are copied without going through `push`.
        if let Some(Op::Retain {
            len: first_len,
            attributes: None,
        }) = other_iter.peek()
        {
            let mut first_left = *first_len;
            while this_iter.peek_type() == OpType::Insert && this_iter.peek_length() <= first_left {
                first_left -= this_iter.peek_length();
                delta.ops.push(this_iter.next_op());
            }
            if first_len - first_left > 0 {
                other_iter.next_len(first_len - first_left);
            }
        }

        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_type() == OpType::Insert {
                delta.push(other_iter.next_op());
                continue;
            }
            if this_iter.peek_type() == OpType::Delete {
                delta.push(this_iter.next_op());
                continue;
            }
            let length = this_iter.peek_length().min(other_iter.peek_length());
            let this_op = this_iter.next_len(length);
            let other_op = other_iter.next_len(length);
            match (this_op, other_op) {
                (
                    this_op,
                    Op::Retain {
                        attributes: other_attributes,
                        ..
                    },
                ) => {
                    let attributes = attributes::compose(
                        this_op.attributes(),
                        other_attributes.as_ref(),
                        this_op.is_retain(),
                    );
                    let new_op = match this_op {
                        Op::Insert { content, .. } => Op::Insert {
                            content,
                            attributes,
                        },
                        _ => Op::Retain {
                            len: length,
                            attributes,
                        },
                    };
                    if other_iter.has_next() {
                        delta.push(new_op);
                        continue;
                    }
                    delta.push(new_op.clone());
                    // Once `other` is exhausted and the tail was appended
                    // unmerged, the rest of `self` passes through unchanged.
                    if delta.ops.last() == Some(&new_op) {
                        let rest = this_iter.rest();
                        trace!(rest = rest.ops.len(), "compose: copying tail");
                        return delta.concat(&rest).chop();
                    }
                }
                (Op::Retain { .. }, Op::Delete { len }) => {
                    delta.push(Op::Delete { len });
                }
                // Deleting inserted content cancels out.
                _ => {}
            }
        }
        delta.chop()
    }
}
