// src/parser.rs
use crate::jsonpath::Path;

/// Tokenizes the restricted path grammar: `$`, `$.a.b`, `$.a[0]`, `$['a-b'][1]`.
///
/// There is no error path. Unbalanced brackets and stray characters still
/// produce segments from whatever was accumulated.
pub fn parse_path(input: &str) -> Path {
    Parser::new(input).parse()
}

pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn parse(mut self) -> Path {
        self.consume_char('$');
        self.consume_char('.');

        let mut segments = Vec::new();
        let mut buf = String::new();
        let mut in_brackets = false;

        while let Some(c) = self.next_char() {
            match (c, in_brackets) {
                ('.', false) => flush(&mut segments, &mut buf),
                ('[', false) => {
                    flush(&mut segments, &mut buf);
                    in_brackets = true;
                }
                (']', true) => {
                    if !buf.is_empty() {
                        segments.push(strip_quotes(&buf).to_string());
                        buf.clear();
                    }
                    in_brackets = false;
                }
                _ => buf.push(c),
            }
        }
        // unterminated bracket or trailing key
        flush(&mut segments, &mut buf);

        Path { segments }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.i += c.len_utf8();
        Some(c)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }
}

fn flush(segments: &mut Vec<String>, buf: &mut String) {
    if !buf.is_empty() {
        segments.push(std::mem::take(buf));
    }
}

/// Removes one layer of matching single or double quotes.
fn strip_quotes(s: &str) -> &str {
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segs(path: &str) -> Vec<String> {
        parse_path(path).segments
    }

    #[test]
    fn root_has_no_segments() {
        assert!(segs("$").is_empty());
        assert!(segs("$.").is_empty());
    }

    #[test]
    fn dotted_and_bracketed() {
        assert_eq!(segs("$.users[0].name"), vec!["users", "0", "name"]);
        assert_eq!(segs("$[0][1]"), vec!["0", "1"]);
        assert_eq!(segs("$.a..b"), vec!["a", "b"]);
    }

    #[test]
    fn quoted_keys_keep_delimiters_inside() {
        assert_eq!(segs("$['user-id']"), vec!["user-id"]);
        assert_eq!(segs(r#"$["a.b"].c"#), vec!["a.b", "c"]);
        assert_eq!(segs("$['x[1'].y"), vec!["x[1", "y"]);
        assert_eq!(segs("$['mixed\"]"), vec!["'mixed\""]);
    }

    #[test]
    fn unbalanced_brackets_degrade() {
        assert_eq!(segs("$.a[0"), vec!["a", "0"]);
        assert_eq!(segs("$.a]b"), vec!["a]b"]);
        assert_eq!(segs("$.a[]"), vec!["a"]);
    }

    #[test]
    fn non_ascii_keys() {
        assert_eq!(segs("$.café.naïve"), vec!["café", "naïve"]);
    }

    #[test]
    fn parser_consumes_everything() {
        let mut p = Parser::new("$.x");
        assert!(p.consume_char('$'));
        assert!(!p.consume_char('x'));
        assert_eq!(p.next_char(), Some('.'));
        assert_eq!(p.next_char(), Some('x'));
        assert_eq!(p.next_char(), None);
    }
}
