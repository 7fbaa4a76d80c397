//! Compile vnt templates into node trees.
//!
//! A template describes a node hierarchy in a compact notation:
//!
//! ```text
//! ul(class="menu")[
//!     li[a(href="/")["Home"]],
//!     li["About"]
//! ]
//! ```
//!
//! Compilation runs three stages: the lexer ([`vnt_lexer`]) turns the text
//! into a flat token sequence, the tree builder ([`vnt_tree`]) nests the
//! tokens, and the [`Compiler`] creates output nodes through a
//! [`RenderTarget`] supplied by the host. [`Document`] is a ready-made
//! in-memory target.
//!
//! ```
//! use vnt::{Document, compile_template};
//!
//! let mut doc = Document::new();
//! let roots = compile_template("div, span", &mut doc).unwrap();
//! assert_eq!(roots.len(), 2);
//! ```

mod compiler;
pub mod diagnostic;
mod document;
mod options;
mod render;

pub use compiler::Compiler;
pub use document::{Document, NodeId};
pub use options::CompileOptions;
pub use render::RenderTarget;

pub use vnt_lexer::{
    DEFAULT_MAX_DEPTH, DiagnosticSink, DuplicateAttributes, LexError, LexErrorKind, LexerOptions,
    Span,
};
pub use vnt_tree::{BuildError, Roots};

use tracing::debug;
use vnt_lexer::Lexer;

/// Error returned by [`compile_template`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl CompileError {
    /// Render this error for display, with source context where available.
    pub fn render(&self, filename: &str, source: &str) -> String {
        match self {
            CompileError::Lex(e) => diagnostic::render(e, filename, source),
            CompileError::Build(e) => format!("Error: {e} ({filename})"),
        }
    }
}

/// Compile `template` into nodes created by `target`.
///
/// Returns the root node directly when the template has a single top-level
/// node, and every root in source order otherwise.
pub fn compile_template<R: RenderTarget + ?Sized>(
    template: &str,
    target: &mut R,
) -> Result<Roots<R::Node>, CompileError> {
    compile_template_with(template, target, &CompileOptions::default(), None)
}

/// Like [`compile_template`], with options and an optional diagnostic sink
/// that is shown every lexer error before it is returned.
pub fn compile_template_with<R: RenderTarget + ?Sized>(
    template: &str,
    target: &mut R,
    options: &CompileOptions,
    sink: Option<&mut dyn DiagnosticSink>,
) -> Result<Roots<R::Node>, CompileError> {
    debug!("compiling template ({} bytes)", template.len());
    let mut lexer = Lexer::new(template).with_options(options.lexer.clone());
    if let Some(sink) = sink {
        lexer = lexer.with_sink(sink);
    }
    let tokens = lexer.lex()?;
    let tree = vnt_tree::build(tokens)?;
    Ok(Compiler::new(target).compile(tree))
}

/// Compile `template` into a fresh [`Document`] and serialize it as HTML.
///
/// Multiple roots are serialized one after another.
pub fn to_html(template: &str) -> Result<String, CompileError> {
    let mut doc = Document::new();
    let roots = compile_template(template, &mut doc)?;
    let mut out = String::new();
    for root in roots {
        doc.write_html(root, &mut out);
    }
    Ok(out)
}
