/// Where the scanner currently is with respect to quoting.
///
/// Single and double quoting never nest: inside one, the other quote
/// character is an ordinary literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

pub struct Lexer;

impl Lexer {
    /// Split a raw line into shell words, resolving quotes and backslashes.
    ///
    /// Never fails: an unterminated quote is closed at end of line and a
    /// trailing lone backslash is dropped. Empty words are never emitted.
    pub fn tokenize(line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut buf = String::new();
        let mut state = QuoteState::Unquoted;
        let mut escaped = false;

        for ch in line.chars() {
            match state {
                QuoteState::Unquoted => {
                    if escaped {
                        buf.push(ch);
                        escaped = false;
                        continue;
                    }
                    match ch {
                        ' ' => {
                            if !buf.is_empty() {
                                tokens.push(std::mem::take(&mut buf));
                            }
                        }
                        '\\' => escaped = true,
                        '\'' => state = QuoteState::SingleQuoted,
                        '"' => state = QuoteState::DoubleQuoted,
                        _ => buf.push(ch),
                    }
                }
                QuoteState::SingleQuoted => match ch {
                    '\'' => state = QuoteState::Unquoted,
                    _ => buf.push(ch),
                },
                QuoteState::DoubleQuoted => {
                    if escaped {
                        // Only `\"` and `\\` collapse; anything else keeps its backslash.
                        if ch != '"' && ch != '\\' {
                            buf.push('\\');
                        }
                        buf.push(ch);
                        escaped = false;
                        continue;
                    }
                    match ch {
                        '\\' => escaped = true,
                        '"' => state = QuoteState::Unquoted,
                        _ => buf.push(ch),
                    }
                }
            }
        }

        if escaped && state == QuoteState::DoubleQuoted {
            buf.push('\\');
        }
        if !buf.is_empty() {
            tokens.push(buf);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        Lexer::tokenize(line)
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(words("echo hello world"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_runs_of_spaces_do_not_make_empty_tokens() {
        assert_eq!(words("  echo   a    b  "), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(words("").is_empty());
        assert!(words("     ").is_empty());
    }

    #[test]
    fn test_single_quotes_keep_spaces() {
        assert_eq!(words("echo 'a b'  c"), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn test_single_quotes_keep_backslash_literally() {
        assert_eq!(words(r"echo 'a\nb\\'"), vec!["echo", r"a\nb\\"]);
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(words(r#"echo "a\"b""#), vec!["echo", "a\"b"]);
        assert_eq!(words(r#"echo "x\\y""#), vec!["echo", r"x\y"]);
    }

    #[test]
    fn test_double_quote_keeps_other_backslashes() {
        assert_eq!(words(r#"echo "a\nb""#), vec!["echo", r"a\nb"]);
    }

    #[test]
    fn test_opposite_quote_is_literal() {
        assert_eq!(words(r#"echo "it's""#), vec!["echo", "it's"]);
        assert_eq!(words(r#"echo 'say "hi"'"#), vec!["echo", "say \"hi\""]);
    }

    #[test]
    fn test_unquoted_backslash_escapes_space() {
        assert_eq!(words(r"echo a\ b"), vec!["echo", "a b"]);
        assert_eq!(words(r"echo \'x\'"), vec!["echo", "'x'"]);
    }

    #[test]
    fn test_adjacent_quoted_parts_join() {
        assert_eq!(words(r#"echo 'a'"b"c"#), vec!["echo", "abc"]);
    }

    #[test]
    fn test_empty_quotes_yield_no_token() {
        assert_eq!(words("echo '' \"\""), vec!["echo"]);
    }

    #[test]
    fn test_unterminated_quotes_close_at_end() {
        assert_eq!(words("echo 'abc"), vec!["echo", "abc"]);
        assert_eq!(words("echo \"a b"), vec!["echo", "a b"]);
        assert_eq!(words("echo '"), vec!["echo"]);
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(words(r"echo abc\"), vec!["echo", "abc"]);
        assert_eq!(words(r#"echo "abc\"#), vec!["echo", r"abc\"]);
    }

    #[test]
    fn test_rejoin_is_stable_for_simple_words() {
        let original = vec!["ls", "-la", "/tmp", "x=1", "a.b"];
        let line = original.join(" ");
        assert_eq!(words(&line), original);
    }

    #[test]
    fn test_matches_whitespace_split_without_quotes() {
        let line = "cat  /etc/hosts   -n foo";
        let naive: Vec<&str> = line.split(' ').filter(|s| !s.is_empty()).collect();
        assert_eq!(words(line), naive);
    }
}
