use std::collections::VecDeque;

/// What the history needs to know about an archived search: whether it
/// ever produced results. Empty searches are dropped instead of archived.
pub trait Archivable {
    fn has_results(&self) -> bool;
}

pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Browser-style back/forward history. The current item belongs to
/// neither stack; pushing a new current clears the forward stack.
#[derive(Debug)]
pub struct HistoryList<T: Archivable> {
    back: VecDeque<T>,
    forward: VecDeque<T>,
    current: Option<T>,
    depth: usize,
}

impl<T: Archivable> Default for HistoryList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl<T: Archivable> HistoryList<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            back: VecDeque::new(),
            forward: VecDeque::new(),
            current: None,
            depth,
        }
    }

    /// Install a new current item. The old current is archived onto the
    /// back stack (or dropped if it produced nothing), the forward stack
    /// is cleared, and the back stack is trimmed to the depth cap.
    pub fn push(&mut self, item: T) {
        if let Some(previous) = self.current.take() {
            if previous.has_results() {
                self.back.push_back(previous);
                while self.back.len() > self.depth {
                    self.back.pop_front();
                }
            }
        }
        self.forward.clear();
        self.current = Some(item);
    }

    /// Move the current item onto the forward stack and restore the most
    /// recent back item as current.
    pub fn go_back(&mut self) -> bool {
        match self.back.pop_back() {
            Some(item) => {
                if let Some(current) = self.current.take() {
                    self.forward.push_back(current);
                }
                self.current = Some(item);
                true
            }
            None => false,
        }
    }

    pub fn go_forward(&mut self) -> bool {
        match self.forward.pop_back() {
            Some(item) => {
                if let Some(current) = self.current.take() {
                    self.back.push_back(current);
                }
                self.current = Some(item);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut()
    }

    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    pub fn forward_len(&self) -> usize {
        self.forward.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}
