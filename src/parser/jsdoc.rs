use regex::Regex;
use std::sync::OnceLock;
use swc_common::comments::{Comment, CommentKind};

/// Raw text of a `/** ... */` comment, or `None` for line and plain block comments.
pub fn doc_text(comment: &Comment) -> Option<String> {
    if comment.kind == CommentKind::Block && comment.text.starts_with('*') {
        Some(format!("/*{}*/", comment.text))
    } else {
        None
    }
}

/// Whether the doc comment carries `@final` or `@sealed`.
pub fn is_final(doc: &str) -> bool {
    static FINAL_TAG: OnceLock<Regex> = OnceLock::new();
    FINAL_TAG
        .get_or_init(|| Regex::new(r"(?m)^\s*(/\*\*|\*)?\s*@(final|sealed)\b").expect("valid regex"))
        .is_match(doc)
}
