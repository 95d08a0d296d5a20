//! Text transforms over JavaScript-like source and fenced markdown blocks.
//!
//! These are pattern substitutions, not parsers: they only recognize the
//! shapes described on each function and pass everything else through.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:[A-Za-z0-9_+\-]*\n)?([\s\S]*?)```").expect("valid fenced block regex")
});

static TOP_LEVEL_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:export\s+)?(?:async\s+)?function\s+([A-Za-z_$][\w$]*)\s*\(([^)]*)\)")
        .expect("valid function header regex")
});

static FUNCTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"function\s+([A-Za-z0-9_]+)\s*\(").expect("valid function name regex")
});

static NAMED_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"function\s*([A-Za-z0-9_]+)\s*\((.*?)\)").expect("valid named function regex")
});

/// Introductory line placed above commented-out code.
pub const COMMENT_HEADER: &str = "// This is a simulated refactoring. Here are some comments:";

/// Description line written into generated documentation blocks.
pub const DOC_DESCRIPTION: &str = "Description of the function.";

/// Return tag line written into generated documentation blocks.
pub const DOC_RETURNS: &str = "@returns {*} Description of the return value.";

/// Code inside the first fenced block of `text`, trimmed.
///
/// A language tag on the opening fence is dropped.
pub fn extract_fenced_code(text: &str) -> Option<String> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Wrap code in a markdown fence.
pub fn fence(code: &str) -> String {
    format!("```\n{}\n```", code)
}

/// Names of every `function NAME(` declaration in `source`, in order.
pub fn function_names(source: &str) -> Vec<String> {
    FUNCTION_NAME
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Insert a JSDoc block above every top-level function declaration.
///
/// Returns the new source and the number of blocks inserted.
pub fn add_jsdoc(source: &str) -> (String, usize) {
    let mut output = String::with_capacity(source.len());
    let mut last = 0;
    let mut inserted = 0;

    for caps in TOP_LEVEL_FUNCTION.captures_iter(source) {
        let Some(header) = caps.get(0) else { continue };
        let params = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        output.push_str(&source[last..header.start()]);
        output.push_str(&doc_block(params));
        last = header.start();
        inserted += 1;
    }
    output.push_str(&source[last..]);

    (output, inserted)
}

fn doc_block(params: &str) -> String {
    let mut block = format!("/**\n * {}\n", DOC_DESCRIPTION);
    for param in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        block.push_str(&format!(" * @param {{*}} {}\n", param));
    }
    block.push_str(&format!(" * {}\n */\n", DOC_RETURNS));
    block
}

/// Prefix every line with a line comment, under an introductory comment.
pub fn comment_lines(code: &str) -> String {
    let commented: Vec<String> = code.split('\n').map(|line| format!("// {}", line)).collect();
    format!("{}\n{}", COMMENT_HEADER, commented.join("\n"))
}

/// Rewrite the first `function name(params)` into `const name = (params) =>`.
///
/// Later declarations are left alone.
pub fn to_arrow_function(code: &str) -> String {
    NAMED_FUNCTION
        .replace(code, "const ${1} = (${2}) =>")
        .into_owned()
}
