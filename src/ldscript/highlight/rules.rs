//! Highlight rule table
//!
//! Rules are tried in table order. A later rule never claims text an earlier rule already
//! claimed, so the specific rules (warnings, named keywords and builtins, wildcard section
//! patterns) come before the generic ones.
use once_cell::sync::Lazy;
use regex::Regex;

use super::Category;

/// Reserved words of the linker script language
pub const KEYWORDS: &[&str] = &[
    "ENTRY",
    "INCLUDE",
    "INPUT",
    "GROUP",
    "AS_NEEDED",
    "OUTPUT",
    "SEARCH_DIR",
    "STARTUP",
    "OUTPUT_FORMAT",
    "TARGET",
    "ASSERT",
    "EXTERN",
    "FORCE_COMMON_ALLOCATION",
    "INHIBIT_COMMON_ALLOCATION",
    "INSERT",
    "AFTER",
    "BEFORE",
    "NOCROSSREFS",
    "NOCROSSREFS_TO",
    "OUTPUT_ARCH",
    "LD_FEATURE",
    "PROVIDE",
    "PROVIDE_HIDDEN",
    "HIDDEN",
    "SECTIONS",
    "SORT_BY_NAME",
    "SORT_BY_ALIGNMENT",
    "SORT_NONE",
    "SORT_BY_INIT_PRIORITY",
    "SORT",
    "KEEP",
    "INPUT_SECTION_FLAGS",
    "FILL",
    "CREATE_OBJECT_SYMBOLS",
    "CONSTRUCTORS",
    "SUBALIGN",
    "ONLY_IF_RO",
    "ONLY_IF_RW",
    "SPECIAL",
    "AT",
    "ALIGN_WITH_INPUT",
    "NOLOAD",
    "DSECT",
    "COPY",
    "INFO",
    "OVERLAY",
    "PHDRS",
    "FILEHDR",
    "FLAGS",
    "MEMORY",
    "VERSION",
    "BYTE",
    "SHORT",
    "LONG",
    "QUAD",
    "SQUAD",
];

/// Builtin functions usable in linker script expressions
pub const BUILTINS: &[&str] = &[
    "ABSOLUTE",
    "ADDR",
    "ALIGN",
    "ALIGNOF",
    "BLOCK",
    "DATA_SEGMENT_ALIGN",
    "DATA_SEGMENT_END",
    "DATA_SEGMENT_RELRO_END",
    "DEFINED",
    "LENGTH",
    "LOADADDR",
    "LOG2CEIL",
    "MAX",
    "MIN",
    "NEXT",
    "ORIGIN",
    "SEGMENT_START",
    "SIZEOF",
    "SIZEOF_HEADERS",
    "CONSTANT",
    "MAXPAGESIZE",
    "COMMONPAGESIZE",
];

/// Tokens that usually signal something surprising in a script
pub const WARNING_TOKENS: &[&str] = &["/DISCARD/", "EXCLUDE_FILE", ":NONE"];

/// One entry of the highlight table
#[derive(Debug)]
pub struct HighlightRule {
    pub name: &'static str,
    pub pattern: Regex,
    /// Capture groups to tag, and the category each one gets
    pub groups: &'static [(usize, Category)],
}

impl HighlightRule {
    fn new(name: &'static str, pattern: &str, groups: &'static [(usize, Category)]) -> Self {
        HighlightRule {
            name,
            pattern: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("highlight rule '{}' has an invalid pattern: {}", name, e)
            }),
            groups,
        }
    }
}

fn word_set(words: &[&str]) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b({})\b", alternatives.join("|"))
}

/// The ordered highlight table
pub static HIGHLIGHT_RULES: Lazy<Vec<HighlightRule>> = Lazy::new(|| {
    let warnings: Vec<String> = WARNING_TOKENS.iter().map(|w| regex::escape(w)).collect();

    vec![
        HighlightRule::new(
            "warning",
            &format!("({})", warnings.join("|")),
            &[(1, Category::Warning)],
        ),
        HighlightRule::new("keyword", &word_set(KEYWORDS), &[(1, Category::Keyword)]),
        HighlightRule::new("builtin", &word_set(BUILTINS), &[(1, Category::Builtin)]),
        HighlightRule::new(
            "wildcard-section",
            r"(\*)\(([\w.*$ \t-]+)\)",
            &[(1, Category::Wildcard), (2, Category::WildcardSection)],
        ),
        HighlightRule::new("hex-address", r"\b(0x[0-9]+)\b", &[(1, Category::HexAddress)]),
        HighlightRule::new(
            "section-name",
            r"(?:^|\W)(\.\w+(?:\.\w+)*)",
            &[(1, Category::SectionName)],
        ),
    ]
});
