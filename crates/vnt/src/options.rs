//! Options for compiling templates.

use vnt_lexer::{DuplicateAttributes, LexerOptions};

/// Options for [`compile_template_with`](crate::compile_template_with).
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Options passed to the lexer.
    pub lexer: LexerOptions,
}

impl CompileOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for a tag followed by more than one attribute group.
    pub fn duplicate_attributes(mut self, policy: DuplicateAttributes) -> Self {
        self.lexer = self.lexer.duplicate_attributes(policy);
        self
    }

    /// Set how deeply `[` groups may nest.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.lexer = self.lexer.max_depth(depth);
        self
    }
}
