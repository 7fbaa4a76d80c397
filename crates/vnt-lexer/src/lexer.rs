//! Lexer for the vnt template notation.

use tracing::{debug, trace};

use crate::{
    Attributes, AttributesToken, ContextKind, DiagnosticSink, DuplicateAttributes, LexError,
    LexErrorKind, LexerOptions, Span, TagToken, TextToken, Token, TokenId, TokenMeta,
};

/// Lex a template with default options and no diagnostic sink.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

/// A single-use lexer over one template.
///
/// [`lex`](Lexer::lex) consumes the lexer, so a scan position is never
/// shared between two runs.
pub struct Lexer<'src> {
    /// The template being lexed.
    source: &'src str,
    /// The remaining template text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Current 1-based line.
    line: u32,

    tokens: Vec<Token>,
    /// Open children brackets: the parent tag, the span of its `[` and
    /// the line it is on.
    relations: Vec<(TokenId, Span, u32)>,

    options: LexerOptions,
    sink: Option<Box<dyn DiagnosticSink + 'src>>,
}

/// Where we are inside an attribute group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrState {
    /// Expecting a key, or in the middle of one.
    Key,
    /// A key was followed by whitespace.
    AfterKey,
    /// After `=`, expecting a quoted value.
    Value,
    /// After a closing quote. `separated` is set once whitespace was seen.
    AfterValue { separated: bool },
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given template.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            relations: Vec::new(),
            options: LexerOptions::default(),
            sink: None,
        }
    }

    /// Use `options` instead of the defaults.
    pub fn with_options(mut self, options: LexerOptions) -> Self {
        self.options = options;
        self
    }

    /// Report every error to `sink` before returning it.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'src) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn context(&self) -> ContextKind {
        if self.relations.is_empty() {
            ContextKind::None
        } else {
            ContextKind::InChildren
        }
    }

    fn meta(&self, span: Span) -> TokenMeta {
        TokenMeta {
            span,
            line: self.line,
            context: self.context(),
            parent: self.relations.last().map(|(id, _, _)| *id),
        }
    }

    fn push(&mut self, token: Token) {
        trace!(
            "Token {} at {:?} (line {}, parent {:?})",
            token.kind(),
            token.span(),
            token.line(),
            token.parent()
        );
        self.tokens.push(token);
    }

    /// Build an error, hand it to the sink, and return it for raising.
    fn fail(&mut self, kind: LexErrorKind, span: Span) -> LexError {
        self.fail_at(kind, span, self.line)
    }

    /// Like [`fail`](Self::fail), for a span on an earlier line.
    fn fail_at(&mut self, kind: LexErrorKind, span: Span, line: u32) -> LexError {
        let error = LexError::new(kind, span, line);
        debug!("lex error: {error}");
        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.report_span(self.source, &error)
        {
            debug!("diagnostic sink failed: {e}");
        }
        error
    }

    /// Lex the whole template.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                _ if is_tag_start(c) => {
                    let token = self.lex_tag();
                    self.push(token);
                }
                '\'' | '"' => {
                    let token = self.lex_text(c)?;
                    self.push(token);
                }
                '(' => self.lex_attributes()?,
                '[' => self.open_children()?,
                ']' => self.close_children()?,
                ',' => {
                    self.advance();
                }
                _ if c.is_whitespace() => {
                    self.advance();
                }
                _ => {
                    return Err(
                        self.fail(LexErrorKind::UnknownCharacter(c), Span::char_at(start, c))
                    );
                }
            }
        }

        if let Some(&(_, bracket, line)) = self.relations.last() {
            return Err(self.fail_at(LexErrorKind::UnclosedChildren, bracket, line));
        }

        Ok(self.tokens)
    }

    /// Lex a tag name: a letter followed by letters, digits and `-`.
    fn lex_tag(&mut self) -> Token {
        let start = self.pos;
        self.advance();
        while let Some(c) = self.peek() {
            if is_tag_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let span = Span::new(start, self.pos);
        Token::Tag(TagToken {
            name: span.slice(self.source).to_string(),
            attrs: None,
            children: Vec::new(),
            meta: self.meta(span),
        })
    }

    fn lex_text(&mut self, quote: char) -> Result<Token, LexError> {
        let (text, span) = self.lex_quoted(quote)?;
        Ok(Token::Text(TextToken {
            text,
            meta: self.meta(span),
        }))
    }

    /// Lex a quoted string starting at the opening `quote`.
    ///
    /// Returns the decoded content and the span between the quotes.
    fn lex_quoted(&mut self, quote: char) -> Result<(String, Span), LexError> {
        let open = self.pos;
        self.advance();
        let content_start = self.pos;

        let mut text = String::new();
        loop {
            let content_end = self.pos;
            match self.advance() {
                None => {
                    return Err(
                        self.fail(LexErrorKind::UnterminatedQuote, Span::new(open, self.pos))
                    );
                }
                Some('\\') => match self.advance() {
                    Some(escaped) => text.push(unescape(escaped)),
                    None => {
                        return Err(
                            self.fail(LexErrorKind::UnterminatedQuote, Span::new(open, self.pos))
                        );
                    }
                },
                Some(c) if c == quote => {
                    return Ok((text, Span::new(content_start, content_end)));
                }
                Some(c) => text.push(c),
            }
        }
    }

    /// `[`: the most recent token becomes the parent of what follows.
    fn open_children(&mut self) -> Result<(), LexError> {
        let span = Span::char_at(self.pos, '[');
        match self.tokens.last() {
            None => return Err(self.fail(LexErrorKind::ChildrenWithoutParent, span)),
            Some(Token::Text(_)) => return Err(self.fail(LexErrorKind::ChildrenOnText, span)),
            Some(Token::Tag(_)) => {
                let limit = self.options.max_depth;
                if self.relations.len() >= limit {
                    return Err(self.fail(LexErrorKind::NestingTooDeep { limit }, span));
                }
                let parent = TokenId::new(self.tokens.len() - 1);
                self.relations.push((parent, span, self.line));
            }
        }
        self.advance();
        Ok(())
    }

    /// `]`: return to the enclosing context.
    fn close_children(&mut self) -> Result<(), LexError> {
        if self.relations.pop().is_none() {
            let span = Span::char_at(self.pos, ']');
            return Err(self.fail(LexErrorKind::UnmatchedCloseBracket, span));
        }
        self.advance();
        Ok(())
    }

    /// `(`: lex an attribute group and attach it to the most recent tag.
    fn lex_attributes(&mut self) -> Result<(), LexError> {
        let open = self.pos;
        let paren = Span::char_at(open, '(');
        match self.tokens.last() {
            None => return Err(self.fail(LexErrorKind::AttributesOnNull, paren)),
            Some(Token::Text(_)) => return Err(self.fail(LexErrorKind::AttributesOnText, paren)),
            Some(Token::Tag(tag)) => {
                if tag.attrs.is_some()
                    && self.options.duplicate_attributes == DuplicateAttributes::Reject
                {
                    return Err(self.fail(LexErrorKind::DuplicateAttributes, paren));
                }
            }
        }

        self.advance();
        let content_start = self.pos;
        let attributes = self.lex_attribute_group(open)?;
        // `pos` is just past the `)`
        let span = Span::new(content_start, self.pos - 1);
        let token = AttributesToken {
            attributes,
            meta: self.meta(span),
        };
        trace!("Token {} at {:?}: {} pairs", token.kind(), span, token.attributes.len());

        if let Some(Token::Tag(tag)) = self.tokens.last_mut() {
            tag.attrs = Some(token);
        }
        Ok(())
    }

    /// Lex `key="value"` pairs up to and including the closing `)`.
    fn lex_attribute_group(&mut self, open: u32) -> Result<Attributes, LexError> {
        let mut attributes = Attributes::new();
        let mut state = AttrState::Key;
        let mut key: Option<Span> = None;

        loop {
            let at = self.pos;
            let Some(c) = self.peek() else {
                return Err(
                    self.fail(LexErrorKind::UnterminatedAttributeList, Span::new(open, self.pos))
                );
            };

            match state {
                AttrState::Key => match c {
                    _ if is_tag_start(c) || (key.is_some() && is_tag_continue(c)) => {
                        self.advance();
                        let start = key.map_or(at, |k| k.start);
                        key = Some(Span::new(start, self.pos));
                    }
                    '=' if key.is_some() => {
                        self.advance();
                        state = AttrState::Value;
                    }
                    ',' | ')' => {
                        self.advance();
                        if let Some(k) = key.take() {
                            attributes.insert(k.slice(self.source), "");
                        }
                        if c == ')' {
                            return Ok(attributes);
                        }
                    }
                    _ if c.is_whitespace() => {
                        self.advance();
                        if key.is_some() {
                            state = AttrState::AfterKey;
                        }
                    }
                    '\'' | '"' => {
                        self.lex_quoted(c)?;
                        let span = Span::new(at, self.pos);
                        return Err(self.fail(LexErrorKind::InvalidAttributeKey, span));
                    }
                    _ => {
                        return Err(
                            self.fail(LexErrorKind::InvalidAttributeKey, Span::char_at(at, c))
                        );
                    }
                },

                AttrState::AfterKey => match c {
                    _ if c.is_whitespace() => {
                        self.advance();
                    }
                    '=' => {
                        self.advance();
                        state = AttrState::Value;
                    }
                    ',' | ')' => {
                        self.advance();
                        if let Some(k) = key.take() {
                            attributes.insert(k.slice(self.source), "");
                        }
                        if c == ')' {
                            return Ok(attributes);
                        }
                        state = AttrState::Key;
                    }
                    _ if is_tag_start(c) => {
                        let start = key.map_or(at, |k| k.start);
                        let span = Span::new(start, at + c.len_utf8() as u32);
                        return Err(self.fail(LexErrorKind::MissingComma, span));
                    }
                    _ => {
                        return Err(
                            self.fail(LexErrorKind::InvalidAttributeKey, Span::char_at(at, c))
                        );
                    }
                },

                AttrState::Value => match c {
                    _ if c.is_whitespace() => {
                        self.advance();
                    }
                    '\'' | '"' => {
                        let (value, _) = self.lex_quoted(c)?;
                        if let Some(k) = key {
                            attributes.insert(k.slice(self.source), value);
                        }
                        state = AttrState::AfterValue { separated: false };
                    }
                    _ => {
                        return Err(
                            self.fail(LexErrorKind::AttributeValueNotQuoted, Span::char_at(at, c))
                        );
                    }
                },

                AttrState::AfterValue { separated } => match c {
                    _ if c.is_whitespace() => {
                        self.advance();
                        state = AttrState::AfterValue { separated: true };
                    }
                    ',' => {
                        self.advance();
                        key = None;
                        state = AttrState::Key;
                    }
                    ')' => {
                        self.advance();
                        return Ok(attributes);
                    }
                    _ if separated && is_tag_start(c) => {
                        key = None;
                        state = AttrState::Key;
                    }
                    _ if !separated => {
                        let start = key.map_or(at, |k| k.start);
                        let span = Span::new(start, at + c.len_utf8() as u32);
                        return Err(self.fail(LexErrorKind::MissingComma, span));
                    }
                    _ => {
                        return Err(
                            self.fail(LexErrorKind::InvalidAttributeKey, Span::char_at(at, c))
                        );
                    }
                },
            }
        }
    }
}

/// Check if a character can start a tag name or attribute key.
fn is_tag_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Check if a character can continue a tag name or attribute key.
fn is_tag_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Decode the character after a backslash.
fn unescape(c: char) -> char {
    match c {
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        // quotes, backslash and anything else stand for themselves
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectingSink, DEFAULT_MAX_DEPTH, SinkError};

    fn tags(source: &str) -> Vec<(String, Option<usize>)> {
        lex(source)
            .unwrap()
            .iter()
            .map(|t| {
                let label = match t {
                    Token::Tag(tag) => tag.name.clone(),
                    Token::Text(text) => format!("{:?}", text.text),
                };
                (label, t.parent().map(TokenId::index))
            })
            .collect()
    }

    fn err(source: &str) -> LexError {
        lex(source).unwrap_err()
    }

    fn attrs(source: &str) -> Vec<(String, String)> {
        let tokens = lex(source).unwrap();
        let tag = tokens[0].as_tag().unwrap();
        tag.attrs
            .clone()
            .map(|a| a.attributes.into_iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_single_tag() {
        let tokens = lex("my-widget2").unwrap();
        assert_eq!(tokens.len(), 1);
        let tag = tokens[0].as_tag().unwrap();
        assert_eq!(tag.name, "my-widget2");
        assert_eq!(tag.meta.span, Span::new(0, 10));
        assert_eq!(tag.meta.context, ContextKind::None);
        assert_eq!(tag.meta.parent, None);
    }

    #[test]
    fn test_siblings_with_optional_commas() {
        assert_eq!(
            tags("div, span p"),
            vec![
                ("div".to_string(), None),
                ("span".to_string(), None),
                ("p".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_children_get_parent_and_context() {
        let tokens = lex("ul[li, li[\"x\"]] p").unwrap();
        let parents: Vec<_> = tokens.iter().map(|t| t.parent().map(TokenId::index)).collect();
        assert_eq!(parents, vec![None, Some(0), Some(0), Some(2), None]);
        assert_eq!(tokens[1].context(), ContextKind::InChildren);
        assert_eq!(tokens[3].context(), ContextKind::InChildren);
        assert_eq!(tokens[4].context(), ContextKind::None);
    }

    #[test]
    fn test_text_span_excludes_quotes() {
        let tokens = lex("p['hi']").unwrap();
        assert_eq!(tokens[1].as_text(), Some("hi"));
        assert_eq!(tokens[1].span(), Span::new(3, 5));
    }

    #[test]
    fn test_escapes() {
        let tokens = lex(r#""a\nb\tc\'d\"e\qf\\g""#).unwrap();
        assert_eq!(tokens[0].as_text(), Some("a\nb\tc'd\"eqf\\g"));

        let tokens = lex(r"'\b\f\r\v'").unwrap();
        assert_eq!(tokens[0].as_text(), Some("\u{8}\u{c}\r\u{b}"));
    }

    #[test]
    fn test_other_quote_is_literal() {
        let tokens = lex(r#"'say "hi"'"#).unwrap();
        assert_eq!(tokens[0].as_text(), Some("say \"hi\""));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = lex("div[\n  span,\n  'two\nlines'\n]").unwrap();
        let lines: Vec<_> = tokens.iter().map(Token::line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn test_attributes_in_order() {
        assert_eq!(
            attrs(r#"div(a="1",b='2' c = "3")"#),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_span_and_bare_keys() {
        let tokens = lex(r#"input(disabled, data-x="y")"#).unwrap();
        let group = tokens[0].as_tag().unwrap().attrs.as_ref().unwrap();
        assert_eq!(group.meta.span, Span::new(6, 26));
        assert_eq!(group.attributes.get("disabled"), Some(""));
        assert_eq!(group.attributes.get("data-x"), Some("y"));
    }

    #[test]
    fn test_empty_attribute_group() {
        assert!(attrs("div()").is_empty());
        assert!(attrs("div(a='1',)").len() == 1);
    }

    #[test]
    fn test_attributes_attach_to_most_recent_tag() {
        let tokens = lex(r#"div[span](id="x")"#).unwrap();
        assert!(tokens[0].as_tag().unwrap().attrs.is_none());
        assert!(tokens[1].as_tag().unwrap().attrs.is_some());
    }

    #[test]
    fn test_children_without_parent() {
        let e = err("[abc]");
        assert_eq!(e.kind, LexErrorKind::ChildrenWithoutParent);
        assert_eq!(e.span, Span::new(0, 1));
    }

    #[test]
    fn test_attributes_on_null() {
        assert_eq!(err("(a='1')").kind, LexErrorKind::AttributesOnNull);
    }

    #[test]
    fn test_text_cannot_be_parent() {
        assert_eq!(err("'x'[p]").kind, LexErrorKind::ChildrenOnText);
        assert_eq!(err("'x'(a='1')").kind, LexErrorKind::AttributesOnText);
    }

    #[test]
    fn test_unknown_character() {
        let e = err("div#");
        assert_eq!(e.kind, LexErrorKind::UnknownCharacter('#'));
        assert_eq!(e.span.start, 3);
        assert_eq!(e.snippet("div#"), "#");
        assert_eq!(err("9div").kind, LexErrorKind::UnknownCharacter('9'));
    }

    #[test]
    fn test_unterminated_quote() {
        let e = err("div[\"unterminated");
        assert_eq!(e.kind, LexErrorKind::UnterminatedQuote);
        assert_eq!(e.span, Span::new(4, 17));
        assert_eq!(err(r#"p["a\"#).kind, LexErrorKind::UnterminatedQuote);
    }

    #[test]
    fn test_unterminated_quote_in_attribute_position() {
        assert_eq!(err("div(\"unterminated").kind, LexErrorKind::UnterminatedQuote);
        assert_eq!(err("div(a='1").kind, LexErrorKind::UnterminatedQuote);
    }

    #[test]
    fn test_unterminated_attribute_list() {
        let e = err(r#"div(x="1""#);
        assert_eq!(e.kind, LexErrorKind::UnterminatedAttributeList);
        assert_eq!(e.span, Span::new(3, 9));
    }

    #[test]
    fn test_unquoted_value() {
        let e = err("div(x=1)");
        assert_eq!(e.kind, LexErrorKind::AttributeValueNotQuoted);
        assert_eq!(e.span, Span::new(6, 7));
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(err(r#"div(a="1"b="2")"#).kind, LexErrorKind::MissingComma);
        assert_eq!(err(r#"div(a b="2")"#).kind, LexErrorKind::MissingComma);
    }

    #[test]
    fn test_invalid_attribute_key() {
        assert_eq!(err(r#"div("a"="1")"#).kind, LexErrorKind::InvalidAttributeKey);
        assert_eq!(err(r#"div(1a="1")"#).kind, LexErrorKind::InvalidAttributeKey);
        assert_eq!(err(r#"div(="1")"#).kind, LexErrorKind::InvalidAttributeKey);
        assert_eq!(err(r#"div(a!="1")"#).kind, LexErrorKind::InvalidAttributeKey);
    }

    #[test]
    fn test_brackets_must_balance() {
        assert_eq!(err("div]").kind, LexErrorKind::UnmatchedCloseBracket);
        let e = err("div[p[span]");
        assert_eq!(e.kind, LexErrorKind::UnclosedChildren);
        assert_eq!(e.span, Span::new(3, 4));
    }

    #[test]
    fn test_unclosed_children_reports_bracket_line() {
        let source = "div[\n  p,\n  span\n";
        let e = err(source);
        assert_eq!(e.kind, LexErrorKind::UnclosedChildren);
        assert_eq!(e.line, 1);
        assert_eq!(e.to_string(), "unclosed children bracket: line 1, offset 3");
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = |n: usize| format!("{}{}", "a[".repeat(n), "]".repeat(n));

        let tokens = Lexer::new(&nested(4))
            .with_options(LexerOptions::new().max_depth(4))
            .lex()
            .unwrap();
        assert_eq!(tokens.len(), 4);

        let e = Lexer::new(&nested(5))
            .with_options(LexerOptions::new().max_depth(4))
            .lex()
            .unwrap_err();
        assert_eq!(e.kind, LexErrorKind::NestingTooDeep { limit: 4 });
        assert_eq!(e.span, Span::new(9, 10));

        let e = err(&nested(DEFAULT_MAX_DEPTH + 1));
        assert_eq!(e.kind, LexErrorKind::NestingTooDeep { limit: DEFAULT_MAX_DEPTH });
        assert!(lex(&nested(DEFAULT_MAX_DEPTH)).is_ok());
    }

    #[test]
    fn test_duplicate_attribute_groups() {
        assert_eq!(
            err(r#"div(a="1")(b="2")"#).kind,
            LexErrorKind::DuplicateAttributes
        );

        let tokens = Lexer::new(r#"div(a="1")(b="2")"#)
            .with_options(LexerOptions::new().duplicate_attributes(DuplicateAttributes::Replace))
            .lex()
            .unwrap();
        let group = tokens[0].as_tag().unwrap().attrs.as_ref().unwrap();
        assert_eq!(group.attributes.get("a"), None);
        assert_eq!(group.attributes.get("b"), Some("2"));
    }

    #[test]
    fn test_error_line_number() {
        let e = err("div[\n  p,\n  #\n]");
        assert_eq!(e.line, 3);
        assert_eq!(e.to_string(), "unknown character '#': line 3, offset 12");
    }

    #[test]
    fn test_sink_sees_error_before_it_is_returned() {
        let mut sink = CollectingSink::default();
        let e = Lexer::new("div#").with_sink(&mut sink).lex().unwrap_err();
        assert_eq!(sink.reports, vec![e]);
    }

    struct BrokenSink;

    impl DiagnosticSink for BrokenSink {
        fn report_span(&mut self, _: &str, _: &LexError) -> Result<(), SinkError> {
            Err("display unavailable".into())
        }
    }

    #[test]
    fn test_failing_sink_is_ignored() {
        let e = Lexer::new("div(x=1)").with_sink(BrokenSink).lex().unwrap_err();
        assert_eq!(e.kind, LexErrorKind::AttributeValueNotQuoted);
    }

    #[test]
    fn test_empty_template() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex(" \n, ").unwrap().is_empty());
    }
}
