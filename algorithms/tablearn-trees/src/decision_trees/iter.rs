use std::iter::Iterator;

use super::TreeNode;
use tablearn::Float;

/// Depth-first iterator of nodes in a decision tree, visiting left subtrees first
pub struct NodeIter<'a, F, L> {
    queue: Vec<&'a TreeNode<F, L>>,
}

impl<'a, F, L> NodeIter<'a, F, L> {
    pub fn new(queue: Vec<&'a TreeNode<F, L>>) -> Self {
        NodeIter { queue }
    }
}

impl<'a, F: Float, L: Clone> Iterator for NodeIter<'a, F, L> {
    type Item = &'a TreeNode<F, L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop().map(|node| {
            node.children()
                .into_iter()
                .rev()
                .for_each(|child| self.queue.push(child));

            node
        })
    }
}
