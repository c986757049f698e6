//! Token definitions for comment scanning
//!
//! Linker scripts only have C block comments. Scanning needs two lexer modes because the
//! meaning of `/` and `*` depends on whether we are inside a comment, so there is one logos
//! token set per mode and the scanner morphs between them.
use logos::Logos;

/// Tokens recognized outside of comments
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodeToken {
    #[token("/*")]
    CommentOpen,

    // Quoted file names are opaque: "/*" inside quotes is not a comment
    #[regex(r#""[^"]*""#)]
    Quoted,

    #[regex(r#"[^/"]+"#)]
    Text,

    #[token("/")]
    #[token("\"")]
    Punct,
}

/// Tokens recognized inside a block comment
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommentToken {
    #[token("*/")]
    CommentClose,

    #[regex(r"[^*]+")]
    Body,

    #[token("*")]
    Star,
}
