//! Comment attachment.
//!
//! Every finished node passes through [`Parser::process_comment`], which
//! distributes the buffered comments between the node, the finished nodes on
//! the comment stack and the buffers themselves. Attachments are keyed by
//! node id while parsing and moved onto the tree once the parse succeeds.

use esfront_ast::visitor::walk_mut;
use esfront_ast::{Comment, File, NodeId};
use esfront_core::text::TextPos;
use esfront_tokenizer::CommentStackEntry;

use crate::parser::Parser;

/// Comments attached to one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Attached {
    pub leading: Option<Vec<Comment>>,
    pub trailing: Option<Vec<Comment>>,
    pub inner: Option<Vec<Comment>>,
}

impl Parser<'_> {
    pub(crate) fn process_comment(&mut self, id: NodeId, start: TextPos, end: TextPos) {
        let state = &mut self.tok.state;
        let mut trailing: Option<Vec<Comment>> = None;

        if !state.trailing_comments.is_empty() {
            if state.trailing_comments[0].start >= end {
                trailing = Some(std::mem::take(&mut state.trailing_comments));
            } else {
                state.trailing_comments.clear();
            }
        } else if let Some(last) = state.comment_stack.last() {
            if let Some(entry) = self.attached.get_mut(&last.id) {
                if entry.trailing.as_ref().is_some_and(|c| c[0].start >= end) {
                    trailing = entry.trailing.take();
                }
            }
        }

        let mut last_child: Option<CommentStackEntry> = None;
        while let Some(top) = state.comment_stack.last() {
            if top.start < start {
                break;
            }
            last_child = state.comment_stack.pop();
        }

        let mut leading: Option<Vec<Comment>> = None;
        if let Some(child) = last_child {
            if let Some(child_attached) = self.attached.get_mut(&child.id) {
                if let Some(mut child_leading) = child_attached.leading.take() {
                    if child.id != id && child_leading.last().is_some_and(|c| c.end <= start) {
                        leading = Some(child_leading);
                    } else {
                        let split = (0..child_leading.len().saturating_sub(1))
                            .rev()
                            .find(|&i| child_leading[i].end <= start);
                        if let Some(i) = split {
                            leading = Some(child_leading.drain(..=i).collect());
                        }
                        child_attached.leading = Some(child_leading);
                    }
                }
            }
        } else if let Some(last) = state.leading_comments.last() {
            if last.end <= start {
                leading = Some(std::mem::take(&mut state.leading_comments));
            } else {
                let split = state.leading_comments.iter().position(|c| c.end > start).unwrap_or(0);
                if split > 0 {
                    leading = Some(state.leading_comments[..split].to_vec());
                }
                trailing = Some(state.leading_comments[split..].to_vec());
            }
        }

        state.comment_stack.push(CommentStackEntry { id, start, end });

        if leading.is_none() && trailing.is_none() {
            return;
        }
        let entry = self.attached.entry(id).or_default();
        if leading.is_some() {
            entry.leading = leading;
        }
        if let Some(comments) = trailing {
            let enclosed = comments[0].start >= start && comments.last().is_some_and(|c| c.end <= end);
            if enclosed {
                entry.inner = Some(comments);
            } else {
                entry.trailing = Some(comments);
            }
        }
    }

    /// Move the attachments recorded during the parse onto the tree.
    pub(crate) fn transfer_comments(&mut self, file: &mut File) {
        let attached = std::mem::take(&mut self.attached);
        if attached.is_empty() {
            return;
        }
        let mut apply = |node: &mut esfront_ast::Node| {
            if let Some(entry) = attached.get(&node.id) {
                node.leading_comments = entry.leading.clone();
                node.trailing_comments = entry.trailing.clone();
                node.inner_comments = entry.inner.clone();
            }
        };
        walk_mut(&mut file.program, &mut apply);
        if let Some(entry) = attached.get(&file.id) {
            file.leading_comments = entry.leading.clone();
            file.trailing_comments = entry.trailing.clone();
            file.inner_comments = entry.inner.clone();
        }
    }
}
