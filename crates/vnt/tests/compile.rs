use vnt::{
    BuildError, CompileError, CompileOptions, DEFAULT_MAX_DEPTH, Document, DuplicateAttributes,
    LexErrorKind, NodeId, RenderTarget, Roots, compile_template, compile_template_with, diagnostic::HtmlSink,
    to_html,
};

fn compile(source: &str) -> (Document, Roots<NodeId>) {
    let mut doc = Document::new();
    let roots = compile_template(source, &mut doc).unwrap();
    (doc, roots)
}

fn lex_error(source: &str) -> vnt::LexError {
    let mut doc = Document::new();
    match compile_template(source, &mut doc) {
        Err(CompileError::Lex(e)) => e,
        other => panic!("expected lex error for {source:?}, got {other:?}"),
    }
}

#[test]
fn nested_template_to_html() {
    let html = to_html(
        r#"
        ul(class="menu")[
            li[a(href="/")["Home"]],
            li["About"]
        ]
        "#,
    )
    .unwrap();
    insta::assert_snapshot!(html, @r#"<ul class="menu"><li><a href="/">Home</a></li><li>About</li></ul>"#);
}

#[test]
fn text_is_escaped_in_html() {
    insta::assert_snapshot!(to_html(r#"p(title='a"b')["x < y & z"]"#).unwrap(), @r#"<p title="a&quot;b">x &lt; y &amp; z</p>"#);
}

#[test]
fn single_root_is_not_wrapped() {
    let (doc, roots) = compile("div");
    let Roots::Single(root) = roots else {
        panic!("expected a single root");
    };
    assert_eq!(doc.tag(root), Some("div"));
}

#[test]
fn multiple_roots_keep_order() {
    let (doc, roots) = compile("div,span");
    let Roots::Many(roots) = roots else {
        panic!("expected several roots");
    };
    let tags: Vec<_> = roots.iter().map(|&r| doc.tag(r)).collect();
    assert_eq!(tags, vec![Some("div"), Some("span")]);
    assert_eq!(doc.parent(roots[1]), None);
}

#[test]
fn sibling_order_is_preserved() {
    let (doc, roots) = compile("div[span['first'], span, 'last']");
    let root = *roots.as_single().unwrap();
    let children = doc.children(root);
    assert_eq!(children.len(), 3);
    assert_eq!(doc.tag(children[0]), Some("span"));
    let first = doc.children(children[0]);
    assert_eq!(first.len(), 1);
    assert_eq!(doc.text(first[0]), Some("first"));
    assert_eq!(doc.tag(children[1]), Some("span"));
    assert_eq!(doc.text(children[2]), Some("last"));
}

#[test]
fn attributes_apply_in_source_order() {
    let (doc, roots) = compile(r#"div(b="2",a="1")"#);
    let root = *roots.as_single().unwrap();
    let attrs: Vec<_> = doc.attributes(root).unwrap().iter().collect();
    assert_eq!(attrs, vec![("b", "2"), ("a", "1")]);
}

#[test]
fn escapes_decode() {
    let (doc, roots) = compile(r#"p["tab\there\nquote\' \" and \q"]"#);
    let root = *roots.as_single().unwrap();
    assert_eq!(doc.text_content(root), "tab\there\nquote' \" and q");
}

#[test]
fn compilation_is_deterministic() {
    let source = r#"main[h1(id="t")["Title"], section[p['a'], p['b']]], footer"#;
    let (first_doc, first) = compile(source);
    let (second_doc, second) = compile(source);
    assert_eq!(first, second);
    assert_eq!(first_doc, second_doc);
}

#[test]
fn documented_error_scenarios() {
    assert_eq!(lex_error("[abc]").kind, LexErrorKind::ChildrenWithoutParent);
    assert_eq!(
        lex_error(r#"div(x="1""#).kind,
        LexErrorKind::UnterminatedAttributeList
    );
    assert_eq!(
        lex_error(r#"div("unterminated"#).kind,
        LexErrorKind::UnterminatedQuote
    );
    let e = lex_error("div#");
    assert_eq!(e.kind, LexErrorKind::UnknownCharacter('#'));
    assert_eq!(e.span.start, 3);
    assert_eq!(
        lex_error("div(x=1)").kind,
        LexErrorKind::AttributeValueNotQuoted
    );
}

#[test]
fn empty_template_is_a_build_error() {
    let mut doc = Document::new();
    assert_eq!(
        compile_template(" ,\n", &mut doc),
        Err(CompileError::Build(BuildError::EmptyTokenStream))
    );
}

/// Counts calls; lexing must fail before any of them happen.
#[derive(Default)]
struct CountingTarget {
    calls: usize,
}

impl RenderTarget for CountingTarget {
    type Node = ();

    fn create_element(&mut self, _: &str) {
        self.calls += 1;
    }

    fn create_text(&mut self, _: &str) {
        self.calls += 1;
    }

    fn set_attribute(&mut self, _: &(), _: &str, _: &str) {
        self.calls += 1;
    }

    fn append_child(&mut self, _: &(), _: ()) {
        self.calls += 1;
    }
}

#[test]
fn lex_errors_create_no_nodes() {
    let mut target = CountingTarget::default();
    let result = compile_template("div[p['ok'], span, #]", &mut target);
    assert!(matches!(result, Err(CompileError::Lex(_))));
    assert_eq!(target.calls, 0);

    compile_template("div[p['ok']]", &mut target).unwrap();
    assert_eq!(target.calls, 5);
}

#[test]
fn options_allow_replacing_attribute_groups() {
    let source = r#"div(a="1")(b="2")"#;
    assert_eq!(lex_error(source).kind, LexErrorKind::DuplicateAttributes);

    let mut doc = Document::new();
    let options = CompileOptions::new().duplicate_attributes(DuplicateAttributes::Replace);
    let roots = compile_template_with(source, &mut doc, &options, None).unwrap();
    let root = *roots.as_single().unwrap();
    assert_eq!(doc.to_html(root), r#"<div b="2"></div>"#);
}

#[test]
fn sink_receives_errors() {
    let mut doc = Document::new();
    let mut sink = HtmlSink::new();
    let result = compile_template_with(
        "p['x'] q(",
        &mut doc,
        &CompileOptions::default(),
        Some(&mut sink),
    );
    assert!(matches!(
        result,
        Err(CompileError::Lex(ref e)) if e.kind == LexErrorKind::UnterminatedAttributeList
    ));
    assert_eq!(sink.reports().len(), 1);
    assert!(doc.is_empty());
}

#[test]
fn error_display_locates_the_fault() {
    let source = "div[\n  p(x=1)\n]";
    let e = lex_error(source);
    assert_eq!(e.to_string(), "attribute values must be quoted: line 2, offset 11");
    assert_eq!(e.snippet(source), "1");

    let rendered = CompileError::Lex(e).render("t.vnt", source);
    let rendered = String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap();
    assert!(rendered.contains("t.vnt"), "{rendered}");
}

fn nested(depth: usize) -> String {
    format!("{}{}", "a[".repeat(depth), "]".repeat(depth))
}

#[test]
fn deep_nesting_is_an_error() {
    let (doc, roots) = compile(&nested(DEFAULT_MAX_DEPTH));
    assert_eq!(doc.children(*roots.as_single().unwrap()).len(), 1);

    let e = lex_error(&nested(5_000));
    assert_eq!(e.kind, LexErrorKind::NestingTooDeep { limit: DEFAULT_MAX_DEPTH });
    assert_eq!(e.span.start as usize, 2 * DEFAULT_MAX_DEPTH + 1);

    let mut doc = Document::new();
    let options = CompileOptions::new().max_depth(2);
    let result = compile_template_with(&nested(3), &mut doc, &options, None);
    assert!(matches!(
        result,
        Err(CompileError::Lex(ref e)) if e.kind == LexErrorKind::NestingTooDeep { limit: 2 }
    ));
    assert!(doc.is_empty());
}
