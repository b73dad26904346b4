//! Undo: the inverse of a change relative to the document it was applied to.

use tracing::trace;

use super::Delta;
use crate::attributes;
use crate::op::Op;

impl Delta {
    /// Returns the change that reverts `self` once applied after it, where
    /// `base` is the document `self` was applied to. Inserts become deletes;
    /// deleted and reformatted ranges are restored from `base`.
    pub fn invert(&self, base: &Delta) -> Delta {
        trace!(ops = self.ops.len(), base = base.ops.len(), "invert");
        let mut inverted = Delta::new();
        let mut base_index = 0;
        for op in &self.ops {
            match op {
                Op::Insert { .. } => {
                    inverted = inverted.delete(op.length());
                }
                Op::Retain {
                    len,
                    attributes: None,
                } => {
                    inverted = inverted.retain(*len);
                    base_index += len;
                }
                Op::Retain { len, .. } | Op::Delete { len } => {
                    for base_op in base.slice(base_index, base_index + len) {
                        if op.is_delete() {
                            inverted.push(base_op);
                        } else {
                            let attributes =
                                attributes::invert(op.attributes(), base_op.attributes());
                            inverted = inverted.retain_with(base_op.length(), attributes);
                        }
                    }
                    base_index += len;
                }
            }
        }
        inverted.chop()
    }
}
