use crate::{
    tokenizer::{parse, take_token, Tokenizer},
    types::{QuoteMark, TokenError},
};

fn words(input: &str) -> Vec<String> {
    parse(input).unwrap()
}

#[test]
fn test_parse_normal() {
    assert_eq!(words("a b"), vec!["a", "b"]);
    assert_eq!(words("echo hello world"), vec!["echo", "hello", "world"]);
}

#[test]
fn test_empty_and_blank_input() {
    assert!(words("").is_empty());
    assert!(words("   ").is_empty());
    assert!(words(" \t \t").is_empty());
}

#[test]
fn test_parse_quoted() {
    assert_eq!(
        words(r#"a 'b c' 'de' "e f" g"#),
        vec!["a", "b c", "de", "e f", "g"]
    );
}

#[test]
fn test_parse_quotedspace() {
    assert_eq!(words(r#"a"b c"d"#), vec!["ab cd"]);
    assert_eq!(words("a'b c'"), vec!["ab c"]);
    assert_eq!(words(r#""like"'this'"#), vec!["likethis"]);
}

#[test]
fn test_parse_escaping() {
    assert_eq!(words(r"a\ b"), vec!["a b"]);
    assert_eq!(words(r"a\\ b"), vec!["a\\", "b"]);
    assert_eq!(words("a\\\tb"), vec!["a\tb"]);
    assert_eq!(words(r#"hello\"world"#), vec!["hello\"world"]);
    assert_eq!(words(r"\'x\'"), vec!["'x'"]);
}

#[test]
fn test_parse_embedded_quote() {
    assert_eq!(words(r#""it's a commit""#), vec!["it's a commit"]);
    assert_eq!(words(r#"'My "true" commit'"#), vec![r#"My "true" commit"#]);
}

#[test]
fn test_escapes_inside_double_quotes() {
    assert_eq!(words(r#""say \"hi\"""#), vec![r#"say "hi""#]);
    assert_eq!(words(r#""back\\slash""#), vec![r"back\slash"]);
    assert_eq!(words(r#""\n""#), vec!["n"]);
}

#[test]
fn test_single_quotes_are_literal() {
    assert_eq!(words(r"'a\b'"), vec![r"a\b"]);
    assert_eq!(words(r"'trailing\'"), vec!["trailing\\"]);
}

#[test]
fn test_empty_quoted_tokens() {
    assert_eq!(words("''"), vec![""]);
    assert_eq!(words(r#""""#), vec![""]);
    assert_eq!(words(r#"a '' b """#), vec!["a", "", "b", ""]);
    assert_eq!(words(r#"x''"#), vec!["x"]);
}

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(words("  a \t\t b   "), vec!["a", "b"]);
    assert_eq!(words("a\nb"), vec!["a\nb"]);
}

#[test]
fn test_unicode_characters() {
    assert_eq!(words("héllo 'wörld ✓'"), vec!["héllo", "wörld ✓"]);
}

#[test]
fn test_unterminated_quote() {
    let err = parse("'abc").unwrap_err();
    assert_eq!(
        err,
        TokenError::UnterminatedQuote {
            mark: QuoteMark::Single,
            partial: "abc".to_string(),
            position: 0,
            remainder: "'abc".to_string(),
        }
    );
    assert!(err.to_string().starts_with("unterminated quoted string"));

    let err = parse(r#"ok  "a\"b"#).unwrap_err();
    assert_eq!(err.position(), 4);
    assert_eq!(err.remainder(), r#""a\"b"#);
    match err {
        TokenError::UnterminatedQuote { mark, partial, .. } => {
            assert_eq!(mark, QuoteMark::Double);
            assert_eq!(partial, "a\"b");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unterminated_escape() {
    let err = parse(r"abc\").unwrap_err();
    assert_eq!(
        err,
        TokenError::UnterminatedEscape {
            position: 0,
            remainder: r"abc\".to_string(),
        }
    );
    assert_eq!(err.to_string(), r"unterminated escape sequence == abc\");

    let err = parse(r"one two\").unwrap_err();
    assert_eq!(err.position(), 4);
    assert_eq!(err.remainder(), r"two\");
}

#[test]
fn test_take_token_positions() -> Result<(), TokenError> {
    let chars: Vec<char> = "  ab 'c d'  ".chars().collect();

    let (first, next) = take_token(&chars, 0)?.expect("first token");
    assert_eq!(first, "ab");
    assert_eq!(next, 4);

    let (second, next) = take_token(&chars, next)?.expect("second token");
    assert_eq!(second, "c d");
    assert_eq!(next, 10);

    assert_eq!(take_token(&chars, next)?, None);
    assert_eq!(take_token(&chars, chars.len())?, None);
    Ok(())
}

#[test]
fn test_tokenizer_stops_after_error() {
    let mut tokenizer = Tokenizer::new("good 'bad");
    assert_eq!(tokenizer.next(), Some(Ok("good".to_string())));
    assert!(matches!(tokenizer.next(), Some(Err(TokenError::UnterminatedQuote { .. }))));
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn test_tokenizer_tracks_position() -> Result<(), TokenError> {
    let mut tokenizer = Tokenizer::new("ls -la");
    assert_eq!(tokenizer.next_token()?, Some("ls".to_string()));
    assert_eq!(tokenizer.position(), 2);
    assert_eq!(tokenizer.next_token()?, Some("-la".to_string()));
    assert_eq!(tokenizer.next_token()?, None);
    assert_eq!(tokenizer.position(), 6);
    Ok(())
}
