use std::io::Read;

use vnt_lexer::Lexer;
use vnt_tree::{Token, build};

fn dump(token: &Token, depth: usize) {
    let indent = "  ".repeat(depth);
    match token {
        Token::Tag(tag) => {
            let attrs = tag
                .attrs
                .as_ref()
                .map(|a| {
                    a.attributes
                        .iter()
                        .map(|(k, v)| format!(" {k}={v:?}"))
                        .collect::<String>()
                })
                .unwrap_or_default();
            println!("{indent}<{}{attrs}>", tag.name);
        }
        Token::Text(text) => println!("{indent}{:?}", text.text),
    }
    for child in token.children() {
        dump(child, depth + 1);
    }
}

fn main() {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();

    println!("=== Tokens ===");
    let tokens = match Lexer::new(&source).lex() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    for tok in &tokens {
        println!("{:?}", tok);
    }

    println!("\n=== Tree ===");
    match build(tokens) {
        Ok(roots) => roots.iter().for_each(|root| dump(root, 0)),
        Err(e) => eprintln!("{e}"),
    }
}
