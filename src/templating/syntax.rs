//! Translation of `#{ }` actions into Tera source.
//!
//! Tera's delimiters are fixed, so documents are rewritten before rendering:
//!
//! - text outside actions is copied through, with each `{` printed by an
//!   expression so Tera never reads document braces as a tag opener
//! - `#{ if x }` / `#{ elif x }` / `#{ else }` / `#{ end }` become Tera
//!   conditionals, `#{ for x in xs }` ... `#{ end }` becomes a loop
//! - `#{ set x = e }` and `#{ $x := e }` become `{% set %}`
//! - `#{ /* note */ }` is a comment
//! - any other action is an expression, printed with `{{ }}`
//!
//! The `$` sigil in front of a variable is optional and removed. Newlines
//! inside an action are kept inside the generated tag, so a line in the
//! translated source is the same line in the document.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::error::TemplateError;
use crate::constants::{CLOSING_DELIM, OPENING_DELIM};

/// `$name := expr`
static SHORT_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\$([A-Za-z_][A-Za-z0-9_]*)\s*:=\s*(.+)$")
        .expect("short assignment pattern is valid")
});

/// `name = expr` after the `set` keyword
static SET_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\$?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.+)$").expect("set pattern is valid")
});

/// `x in expr` or `k, v in expr` after the `for` keyword
static FOR_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^\$?([A-Za-z_][A-Za-z0-9_]*)(?:\s*,\s*\$?([A-Za-z_][A-Za-z0-9_]*))?\s+in\s+(.+)$",
    )
    .expect("for header pattern is valid")
});

/// Tera source printing a single `{`.
const LITERAL_BRACE: &str = "{{ \"{\" }}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    For,
}

impl BlockKind {
    fn end_tag(self) -> &'static str {
        match self {
            BlockKind::If => "endif",
            BlockKind::For => "endfor",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::If => write!(f, "if"),
            BlockKind::For => write!(f, "for"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    kind: BlockKind,
    line: usize,
}

/// Whitespace handling of one action.
#[derive(Debug, Clone, Copy)]
struct Tag {
    trim_left: bool,
    trim_right: bool,
    newlines: usize,
}

/// Translate a document with `#{ }` actions into Tera template source.
///
/// # Errors
///
/// Returns [`TemplateError::SyntaxError`] with the 1-based line of the
/// offending action for unterminated actions, empty actions, `end` without an
/// open block, `elif`/`else` outside `if`, `break`/`continue` outside `for`
/// and blocks left open at the end of the document.
///
/// # Examples
///
/// ```rust
/// use yamladapt::templating::translate;
///
/// let source = translate("name: #{$name}\n", None).unwrap();
/// assert_eq!(source, "name: {{ name }}\n");
/// ```
pub fn translate(source: &str, source_name: Option<&str>) -> Result<String, TemplateError> {
    let mut translator = Translator {
        source,
        source_name,
        output: String::with_capacity(source.len()),
        blocks: Vec::new(),
        line: 1,
    };

    let mut pos = 0;
    while let Some(offset) = source[pos..].find(OPENING_DELIM) {
        let start = pos + offset;
        translator.literal(&source[pos..start]);

        let body_start = start + OPENING_DELIM.len();
        let Some(length) = find_action_end(&source[body_start..]) else {
            return Err(translator.error("unclosed action", translator.line));
        };
        translator.action(&source[body_start..body_start + length])?;
        pos = body_start + length + CLOSING_DELIM.len_utf8();
    }
    translator.literal(&source[pos..]);

    translator.finish()
}

struct Translator<'a> {
    source: &'a str,
    source_name: Option<&'a str>,
    output: String,
    blocks: Vec<OpenBlock>,
    /// Line of the next unread character
    line: usize,
}

impl Translator<'_> {
    fn error(&self, message: impl Into<String>, line: usize) -> TemplateError {
        TemplateError::syntax(message, line, self.source, self.source_name)
    }

    /// Copy text outside actions. Every `{` is printed through an
    /// expression so Tera never sees a tag opener in document text.
    fn literal(&mut self, text: &str) {
        self.line += count_newlines(text);
        let mut pieces = text.split('{');
        if let Some(first) = pieces.next() {
            self.output.push_str(first);
        }
        for piece in pieces {
            self.output.push_str(LITERAL_BRACE);
            self.output.push_str(piece);
        }
    }

    fn action(&mut self, inner: &str) -> Result<(), TemplateError> {
        let line = self.line;
        let newlines = count_newlines(inner);
        self.line += newlines;

        let (trim_left, body, trim_right) = split_trim_markers(inner);
        let tag = Tag {
            trim_left,
            trim_right,
            newlines,
        };
        let statement = body.trim();

        if statement.is_empty() {
            return Err(self.error("empty action", line));
        }

        if statement.starts_with("/*") {
            if !statement.ends_with("*/") || statement.len() < 4 {
                return Err(self.error("comment must be closed with */ before }", line));
            }
            self.comment(tag);
            return Ok(());
        }

        if let Some(captures) = SHORT_ASSIGNMENT.captures(statement) {
            let value = strip_sigils(captures[2].trim());
            self.emit("{%", &format!("set {} = {}", &captures[1], value), "%}", tag);
            return Ok(());
        }

        let (keyword, rest) = split_keyword(statement);
        match keyword {
            "if" => {
                let condition = self.operand(rest, "if", line)?;
                self.blocks.push(OpenBlock {
                    kind: BlockKind::If,
                    line,
                });
                self.emit("{%", &format!("if {condition}"), "%}", tag);
            }
            "elif" => self.elif(rest, line, tag)?,
            "else" => {
                let (next, condition) = split_keyword(rest);
                match next {
                    "" => {
                        self.expect_open_if("else", line)?;
                        self.emit("{%", "else", "%}", tag);
                    }
                    "if" => self.elif(condition, line, tag)?,
                    _ => {
                        return Err(self.error(format!("unexpected '{rest}' after else"), line));
                    }
                }
            }
            "end" => {
                if !rest.is_empty() {
                    return Err(self.error(format!("unexpected '{rest}' after end"), line));
                }
                let Some(block) = self.blocks.pop() else {
                    return Err(self.error("unexpected end", line));
                };
                self.emit("{%", block.kind.end_tag(), "%}", tag);
            }
            "for" => {
                let Some(captures) = FOR_HEADER.captures(rest) else {
                    return Err(self.error("malformed for, expected 'for <name> in <expr>'", line));
                };
                let header = match captures.get(2) {
                    Some(value) => format!(
                        "for {}, {} in {}",
                        &captures[1],
                        value.as_str(),
                        strip_sigils(captures[3].trim())
                    ),
                    None => format!("for {} in {}", &captures[1], strip_sigils(captures[3].trim())),
                };
                self.blocks.push(OpenBlock {
                    kind: BlockKind::For,
                    line,
                });
                self.emit("{%", &header, "%}", tag);
            }
            "break" | "continue" => {
                if !rest.is_empty() {
                    return Err(self.error(format!("unexpected '{rest}' after {keyword}"), line));
                }
                if !self.blocks.iter().any(|block| block.kind == BlockKind::For) {
                    return Err(self.error(format!("{keyword} outside of for"), line));
                }
                self.emit("{%", keyword, "%}", tag);
            }
            "set" => {
                let Some(captures) = SET_ASSIGNMENT.captures(rest) else {
                    return Err(self.error("malformed set, expected 'set <name> = <expr>'", line));
                };
                let value = strip_sigils(captures[2].trim());
                self.emit("{%", &format!("set {} = {}", &captures[1], value), "%}", tag);
            }
            _ => {
                self.emit("{{", &strip_sigils(statement), "}}", tag);
            }
        }
        Ok(())
    }

    fn elif(&mut self, condition: &str, line: usize, tag: Tag) -> Result<(), TemplateError> {
        self.expect_open_if("elif", line)?;
        let condition = self.operand(condition, "elif", line)?;
        self.emit("{%", &format!("elif {condition}"), "%}", tag);
        Ok(())
    }

    fn expect_open_if(&self, keyword: &str, line: usize) -> Result<(), TemplateError> {
        match self.blocks.last() {
            Some(block) if block.kind == BlockKind::If => Ok(()),
            _ => Err(self.error(format!("{keyword} outside of if"), line)),
        }
    }

    fn operand(&self, text: &str, keyword: &str, line: usize) -> Result<String, TemplateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.error(format!("missing expression after {keyword}"), line));
        }
        Ok(strip_sigils(text))
    }

    fn comment(&mut self, tag: Tag) {
        if tag.trim_left || tag.trim_right {
            self.emit("{{", "\"\"", "}}", tag);
        } else {
            self.output.push_str("{#");
            self.output.extend(std::iter::repeat_n('\n', tag.newlines));
            self.output.push_str("#}");
        }
    }

    /// Write one Tera tag, padding it with the action's remaining newlines.
    fn emit(&mut self, open: &str, content: &str, close: &str, tag: Tag) {
        self.output.push_str(open);
        if tag.trim_left {
            self.output.push('-');
        }
        self.output.push(' ');
        self.output.push_str(content);
        self.output.push(' ');
        let padding = tag.newlines.saturating_sub(count_newlines(content));
        self.output.extend(std::iter::repeat_n('\n', padding));
        if tag.trim_right {
            self.output.push('-');
        }
        self.output.push_str(close);
    }

    fn finish(self) -> Result<String, TemplateError> {
        if let Some(block) = self.blocks.last() {
            return Err(self.error(format!("unclosed {} block", block.kind), block.line));
        }
        Ok(self.output)
    }
}

/// Offset of the `}` closing an action body.
///
/// Braces inside `"`, `'` or backtick strings do not close the action, and a
/// comment runs to its `*/` first.
fn find_action_end(body: &str) -> Option<usize> {
    let (trim_left, unmarked, _) = split_trim_markers(body);
    let lead = usize::from(trim_left);
    if unmarked.trim_start().starts_with("/*") {
        let comment_start = lead + (unmarked.len() - unmarked.trim_start().len());
        let comment_end = comment_start + 2 + body[comment_start + 2..].find("*/")? + 2;
        return body[comment_end..].find(CLOSING_DELIM).map(|offset| comment_end + offset);
    }

    let mut quote: Option<char> = None;
    for (index, c) in body.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '\'' | '`') => quote = Some(c),
            None if c == CLOSING_DELIM => return Some(index),
            None => {}
        }
    }
    None
}

/// Split `- ` / ` -` trim markers off an action body.
fn split_trim_markers(inner: &str) -> (bool, &str, bool) {
    let mut body = inner;
    let trim_left = body.starts_with('-') && body[1..].starts_with(char::is_whitespace);
    if trim_left {
        body = &body[1..];
    }
    let trim_right = body.ends_with('-') && body[..body.len() - 1].ends_with(char::is_whitespace);
    if trim_right {
        body = &body[..body.len() - 1];
    }
    (trim_left, body, trim_right)
}

fn split_keyword(statement: &str) -> (&str, &str) {
    match statement.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (statement, ""),
    }
}

/// Remove the `$` sigil in front of identifiers outside string literals.
fn strip_sigils(expression: &str) -> String {
    let mut output = String::with_capacity(expression.len());
    let mut quote: Option<char> = None;
    let mut chars = expression.chars().peekable();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '\'' | '`') => quote = Some(c),
            None if c == '$' => {
                if chars.peek().is_some_and(|next| next.is_ascii_alphabetic() || *next == '_') {
                    continue;
                }
            }
            None => {}
        }
        output.push(c);
    }
    output
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::{Context, Tera};

    fn render(source: &str, context: &Context) -> String {
        let translated = translate(source, None).unwrap();
        Tera::default().render_str(&translated, context).unwrap()
    }

    fn syntax_error_line(source: &str) -> (String, Option<usize>) {
        match translate(source, Some("test.yaml")).unwrap_err() {
            TemplateError::SyntaxError {
                message,
                location,
            } => (message, location.line_number),
            other => panic!("expected syntax error, got {other}"),
        }
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let source = "name: app\nports:\n  - 80\n";
        assert_eq!(translate(source, None).unwrap(), source);
    }

    #[test]
    fn test_document_braces_survive_rendering() {
        let source = "flow: {a: 1, b: [2]}\njinja: \"{{ not a template }}\"\nodd: \"{% x %} {# y #}\"\n";
        assert_eq!(render(source, &Context::new()), source);
    }

    #[test]
    fn test_expression_with_sigil() {
        let mut context = Context::new();
        context.insert("name", "svc");
        assert_eq!(translate("a: #{$name}\n", None).unwrap(), "a: {{ name }}\n");
        assert_eq!(render("a: #{ $name | upper }\n", &context), "a: SVC\n");
    }

    #[test]
    fn test_sigil_inside_string_literal_is_kept() {
        assert_eq!(render("#{ \"$HOME\" }", &Context::new()), "$HOME");
    }

    #[test]
    fn test_closing_brace_inside_quotes() {
        assert_eq!(render("v: #{ \"a}b\" }\n", &Context::new()), "v: a}b\n");
    }

    #[test]
    fn test_conditionals() {
        let source = "#{if $debug}level: debug#{else if $quiet}level: error#{else}level: info#{end}";
        let mut context = Context::new();
        context.insert("debug", &false);
        context.insert("quiet", &true);
        assert_eq!(render(source, &context), "level: error");

        context.insert("quiet", &false);
        assert_eq!(render(source, &context), "level: info");
    }

    #[test]
    fn test_loops_with_trim_markers() {
        let source = "hosts:\n#{- for h in $hosts }\n  - #{ h }\n#{- end }\n";
        let mut context = Context::new();
        context.insert("hosts", &vec!["a", "b"]);
        assert_eq!(render(source, &context), "hosts:\n  - a\n  - b\n");
    }

    #[test]
    fn test_key_value_loop() {
        let source = "#{ for k, v in $labels }#{ k }=#{ v };#{ end }";
        let mut context = Context::new();
        let labels: std::collections::BTreeMap<&str, &str> =
            [("app", "web"), ("tier", "front")].into_iter().collect();
        context.insert("labels", &labels);
        assert_eq!(render(source, &context), "app=web;tier=front;");
    }

    #[test]
    fn test_assignments() {
        let source = "#{ $port := 8000 + 80 }#{ set host = \"localhost\" }#{ host }:#{ $port }";
        assert_eq!(render(source, &Context::new()), "localhost:8080");
    }

    #[test]
    fn test_comments_render_nothing() {
        assert_eq!(render("a#{ /* note } with brace */ }b", &Context::new()), "ab");
    }

    #[test]
    fn test_comment_before_trailing_dash() {
        assert_eq!(translate("#{/**/} -", None).unwrap(), "{##} -");
        assert_eq!(render("items:\n#{- /* none */ }\n  - -", &Context::new()), "items:\n  - -");
    }

    #[test]
    fn test_newlines_inside_actions_keep_line_numbers() {
        let source = "a: #{\n  $x\n}\nb: #{ /*\n*/ }\nc: 1\n";
        let translated = translate(source, None).unwrap();
        assert_eq!(count_newlines(&translated), count_newlines(source));
    }

    #[test]
    fn test_unexpected_end() {
        let (message, line) = syntax_error_line("a: 1\nb: #{end}\n");
        assert_eq!(message, "unexpected end");
        assert_eq!(line, Some(2));
    }

    #[test]
    fn test_unclosed_block_reports_opening_line() {
        let (message, line) = syntax_error_line("a: 1\n#{ if $x }\nb: 2\n");
        assert_eq!(message, "unclosed if block");
        assert_eq!(line, Some(2));
    }

    #[test]
    fn test_unclosed_action() {
        let (message, line) = syntax_error_line("a: 1\nb: 2\nc: #{ $x\n");
        assert_eq!(message, "unclosed action");
        assert_eq!(line, Some(3));
    }

    #[test]
    fn test_misplaced_keywords() {
        assert_eq!(syntax_error_line("#{ else }").0, "else outside of if");
        assert_eq!(syntax_error_line("#{ for x in xs }#{ elif y }#{ end }").0, "elif outside of if");
        assert_eq!(syntax_error_line("#{ if x }#{ break }#{ end }").0, "break outside of for");
        assert_eq!(syntax_error_line("#{ }").0, "empty action");
    }

    #[test]
    fn test_break_inside_nested_if() {
        let source = "#{ for n in $numbers }#{ if n == 3 }#{ break }#{ end }#{ n }#{ end }";
        let mut context = Context::new();
        context.insert("numbers", &vec![1, 2, 3, 4]);
        assert_eq!(render(source, &context), "12");
    }
}
