//! Ternary-search-tree prefix index.

use thiserror::Error;

use crate::catalog::Symbol;

/// Errors raised by [`PrefixIndex`] misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// Insert was attempted after `prepare_for_search` sealed the tree.
    #[error("prefix index is sealed; inserts are not allowed after prepare_for_search")]
    Sealed,

    /// The empty word cannot be indexed.
    #[error("cannot index an empty word")]
    EmptyWord,
}

type NodeIdx = u32;

/// One tree node: a pivot character with less-than / continue / greater-than
/// links. A node that terminates a word carries its payload.
#[derive(Debug, Clone)]
struct Node {
    ch: char,
    lo: Option<NodeIdx>,
    eq: Option<NodeIdx>,
    hi: Option<NodeIdx>,
    payload: Option<Symbol>,
}

impl Node {
    fn new(ch: char) -> Self {
        Self {
            ch,
            lo: None,
            eq: None,
            hi: None,
            payload: None,
        }
    }
}

/// A ternary search tree over symbol names.
///
/// Nodes live in an arena and link by index. Construction is
/// single-threaded: insert every word, then call
/// [`prepare_for_search`](Self::prepare_for_search) to seal the tree.
/// A sealed tree never mutates again, so any number of readers may query it
/// concurrently without locking. Further inserts fail with
/// [`IndexError::Sealed`]; that is a caller bug, not a runtime condition.
///
/// Comparisons are case-sensitive. Callers that want
/// case-insensitive completion normalize case before inserting and before
/// querying; the tree itself never folds case.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    nodes: Vec<Node>,
    root: Option<NodeIdx>,
    sealed: bool,
    len: usize,
}

impl PrefixIndex {
    /// Create an empty, unsealed index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index stores no words.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the index has been sealed by `prepare_for_search`.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn alloc(&mut self, ch: char) -> NodeIdx {
        let idx = self.nodes.len() as NodeIdx;
        self.nodes.push(Node::new(ch));
        idx
    }

    /// Insert `word` with its payload.
    ///
    /// Standard ternary-search-tree order: compare the current character to
    /// the node's pivot, branch lo/hi on inequality, advance to the next
    /// character through the continue link on equality. Inserting a word
    /// that is already present overwrites its payload (last write wins).
    pub fn insert(&mut self, word: &str, payload: Symbol) -> Result<(), IndexError> {
        if self.sealed {
            return Err(IndexError::Sealed);
        }
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return Err(IndexError::EmptyWord);
        }

        let mut pos = 0;
        let mut cur = match self.root {
            Some(root) => root,
            None => {
                let root = self.alloc(chars[0]);
                self.root = Some(root);
                root
            }
        };

        loop {
            let ch = chars[pos];
            let pivot = self.nodes[cur as usize].ch;
            if ch < pivot {
                cur = match self.nodes[cur as usize].lo {
                    Some(next) => next,
                    None => {
                        let next = self.alloc(ch);
                        self.nodes[cur as usize].lo = Some(next);
                        next
                    }
                };
            } else if ch > pivot {
                cur = match self.nodes[cur as usize].hi {
                    Some(next) => next,
                    None => {
                        let next = self.alloc(ch);
                        self.nodes[cur as usize].hi = Some(next);
                        next
                    }
                };
            } else {
                pos += 1;
                if pos == chars.len() {
                    if self.nodes[cur as usize].payload.replace(payload).is_none() {
                        self.len += 1;
                    }
                    return Ok(());
                }
                cur = match self.nodes[cur as usize].eq {
                    Some(next) => next,
                    None => {
                        let next = self.alloc(chars[pos]);
                        self.nodes[cur as usize].eq = Some(next);
                        next
                    }
                };
            }
        }
    }

    /// Seal the tree and normalize its shape for search.
    ///
    /// Insertion order materially affects ternary-search-tree height, so the
    /// stored words are collected (in sorted order) and re-inserted
    /// median-first, which bounds the lo/hi depth logarithmically.
    /// Idempotent: calling on a sealed tree is a no-op.
    pub fn prepare_for_search(&mut self) {
        if self.sealed {
            return;
        }
        let mut pairs = Vec::with_capacity(self.len);
        let mut buf = String::new();
        self.collect_into(self.root, &mut buf, &mut pairs);

        let mut balanced = PrefixIndex::new();
        Self::insert_median_first(&mut balanced, &pairs);
        balanced.sealed = true;
        *self = balanced;
    }

    fn insert_median_first(index: &mut PrefixIndex, pairs: &[(String, Symbol)]) {
        if pairs.is_empty() {
            return;
        }
        let mid = pairs.len() / 2;
        let (word, payload) = &pairs[mid];
        index
            .insert(word, payload.clone())
            .expect("unsealed rebuild index accepts inserts");
        Self::insert_median_first(index, &pairs[..mid]);
        Self::insert_median_first(index, &pairs[mid + 1..]);
    }

    /// In-order collection; yields words in lexicographic order.
    fn collect_into(
        &self,
        idx: Option<NodeIdx>,
        buf: &mut String,
        out: &mut Vec<(String, Symbol)>,
    ) {
        let Some(idx) = idx else { return };
        let node = &self.nodes[idx as usize];
        self.collect_into(node.lo, buf, out);
        buf.push(node.ch);
        if let Some(payload) = &node.payload {
            out.push((buf.clone(), payload.clone()));
        }
        self.collect_into(node.eq, buf, out);
        buf.pop();
        self.collect_into(node.hi, buf, out);
    }

    /// Descend to the node matching the last character of `word`.
    fn locate(&self, word: &str) -> Option<NodeIdx> {
        let mut chars = word.chars();
        let mut ch = chars.next()?;
        let mut cur = self.root?;
        loop {
            let node = &self.nodes[cur as usize];
            if ch < node.ch {
                cur = node.lo?;
            } else if ch > node.ch {
                cur = node.hi?;
            } else {
                match chars.next() {
                    None => return Some(cur),
                    Some(next) => {
                        cur = node.eq?;
                        ch = next;
                    }
                }
            }
        }
    }

    /// Payload for an exact match, if the word is stored.
    pub fn search_exact(&self, word: &str) -> Option<&Symbol> {
        let idx = self.locate(word)?;
        self.nodes[idx as usize].payload.as_ref()
    }

    /// Lazy iterator over every stored word starting with `prefix`, in
    /// lexicographic order of the full word.
    ///
    /// The empty prefix enumerates the entire index. Each call returns a
    /// fresh iterator, so the sequence is restartable.
    pub fn search_by_prefix(&self, prefix: &str) -> PrefixMatches<'_> {
        let mut stack = Vec::new();
        if prefix.is_empty() {
            if let Some(root) = self.root {
                stack.push(Frame::Visit(root));
            }
        } else if let Some(idx) = self.locate(prefix) {
            // The prefix word itself sorts before any of its extensions,
            // which all live in the continue subtree.
            if let Some(eq) = self.nodes[idx as usize].eq {
                stack.push(Frame::Visit(eq));
            }
            stack.push(Frame::Emit(idx));
        }
        PrefixMatches { index: self, stack }
    }
}

enum Frame {
    Visit(NodeIdx),
    Emit(NodeIdx),
}

/// Iterator returned by [`PrefixIndex::search_by_prefix`].
///
/// Traverses the matched subtree in order (lo, terminal, continue, hi) with
/// an explicit stack, yielding terminal payloads lazily.
pub struct PrefixMatches<'a> {
    index: &'a PrefixIndex,
    stack: Vec<Frame>,
}

impl<'a> Iterator for PrefixMatches<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Visit(idx) => {
                    let node = &self.index.nodes[idx as usize];
                    if let Some(hi) = node.hi {
                        self.stack.push(Frame::Visit(hi));
                    }
                    if let Some(eq) = node.eq {
                        self.stack.push(Frame::Visit(eq));
                    }
                    self.stack.push(Frame::Emit(idx));
                    if let Some(lo) = node.lo {
                        self.stack.push(Frame::Visit(lo));
                    }
                }
                Frame::Emit(idx) => {
                    if let Some(payload) = &self.index.nodes[idx as usize].payload {
                        return Some(payload);
                    }
                }
            }
        }
        None
    }
}
