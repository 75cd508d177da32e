use crate::{interpreter::value::node::Node, options::FractionPolicy};

/// Whether evaluation ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    /// The time budget ran out; parts of the tree are unevaluated.
    Interrupted,
}

/// The outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTree {
    /// The simplified result.
    pub root:          Node,
    /// A numeric approximation shown next to an exact irrational result.
    pub approximation: Option<Node>,
    pub completion:    Completion,
    /// The input was a comparison; the formatter renders truth values.
    pub is_comparison: bool,
    /// The concrete display the evaluator chose; never
    /// [`FractionPolicy::Automatic`].
    pub fraction:      FractionPolicy,
}

impl ResultTree {
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self.completion, Completion::Interrupted)
    }
}
