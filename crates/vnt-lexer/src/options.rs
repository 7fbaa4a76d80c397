//! Lexer configuration.

/// What to do when a tag is followed by a second attribute group,
/// as in `div(a="1")(b="2")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateAttributes {
    /// Fail with [`LexErrorKind::DuplicateAttributes`](crate::LexErrorKind::DuplicateAttributes).
    #[default]
    Reject,
    /// Keep only the last group.
    Replace,
}

/// Default for [`LexerOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for [`Lexer`](crate::Lexer).
#[derive(Debug, Clone)]
pub struct LexerOptions {
    /// Policy for repeated attribute groups (default: reject)
    pub duplicate_attributes: DuplicateAttributes,
    /// Maximum number of `[` groups open at once (default: 256)
    pub max_depth: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            duplicate_attributes: DuplicateAttributes::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LexerOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for repeated attribute groups.
    pub fn duplicate_attributes(mut self, policy: DuplicateAttributes) -> Self {
        self.duplicate_attributes = policy;
        self
    }

    /// Set the maximum children nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
