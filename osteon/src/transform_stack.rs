use glam::Affine3A;

/// A stack of accumulated transforms, used to walk a joint hierarchy from the root down.
///
/// The bottom of the stack is always the identity, so [`TransformStack::top`] can never fail.
/// Popping that bottom entry means a traversal pushed and popped unevenly, which is a bug.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Affine3A>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            stack: vec![Affine3A::IDENTITY],
        }
    }
}

impl TransformStack {
    /// Create a stack holding only the identity
    pub fn new() -> Self {
        Default::default()
    }

    /// Compose `transform` with the current top (`top * transform`) and push the result
    pub fn push(&mut self, transform: Affine3A) {
        let top = self.top() * transform;
        self.stack.push(top);
    }

    /// Remove the top transform, restoring the one below it
    pub fn pop(&mut self) {
        assert!(
            self.stack.len() > 1,
            "TransformStack popped more times than it was pushed"
        );
        self.stack.pop();
    }

    /// The current accumulated transform
    pub fn top(&self) -> Affine3A {
        // The identity at the bottom is never popped
        self.stack[self.stack.len() - 1]
    }

    /// Drop everything but the identity
    pub fn clear(&mut self) {
        self.stack.truncate(1);
    }

    /// Number of transforms pushed on top of the identity
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}
