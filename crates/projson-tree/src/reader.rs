//! JSON reader that records line/column for every node.
//!
//! Accepts standard JSON (RFC 8259) with an optional leading byte-order
//! mark. Comments and trailing commas are rejected. The grammar is built
//! with [`chumsky`]; byte spans are mapped to 1-based line/column
//! positions afterwards.

use std::io::Read;

use chumsky::prelude::*;

use crate::error::{Result, TreeError};
use crate::value::{JsonValue, Position, ValueKind};

/// Deepest array/object nesting a document may have.
pub const MAX_DEPTH: usize = 64;

/// Read a JSON document from any byte source.
pub fn read(mut source: impl Read) -> Result<JsonValue> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    read_str(&text)
}

/// Read a JSON document from a string.
pub fn read_str(text: &str) -> Result<JsonValue> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines = LineIndex::new(text);
    check_depth(text, &lines)?;

    let result = document(&lines).parse(text).into_result().map_err(|errors| {
        match errors.first() {
            Some(error) => syntax_error(error, &lines),
            None => TreeError::UnexpectedEnd {
                position: lines.position(text.len()),
            },
        }
    });
    result
}

/// Byte offset to line/column mapping for one document.
struct LineIndex<'t> {
    text: &'t str,
    starts: Vec<usize>,
}

impl<'t> LineIndex<'t> {
    fn new(text: &'t str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        let start = self.starts[line - 1];
        let column = self
            .text
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position::new(line, column + 1)
    }
}

fn syntax_error(error: &Rich<'_, char>, lines: &LineIndex<'_>) -> TreeError {
    let offset = error.span().start;
    let position = lines.position(offset);
    if offset >= lines.text.len() {
        TreeError::UnexpectedEnd { position }
    } else {
        TreeError::Syntax {
            position,
            detail: error.to_string(),
        }
    }
}

/// Reject nesting past [`MAX_DEPTH`] before the recursive grammar sees it.
fn check_depth(text: &str, lines: &LineIndex<'_>) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(TreeError::Syntax {
                        position: lines.position(offset),
                        detail: format!("nesting exceeds {MAX_DEPTH} levels"),
                    });
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn document<'a>(
    lines: &'a LineIndex<'a>,
) -> impl Parser<'a, &'a str, JsonValue, extra::Err<Rich<'a, char>>> {
    let value = recursive(|value| {
        let digits = text::digits(10);

        let frac = just('.').then(digits.clone());

        let exp = one_of("eE").then(one_of("+-").or_not()).then(digits);

        let number = just('-')
            .or_not()
            .then(text::int(10))
            .then(frac.or_not())
            .then(exp.or_not())
            .to_slice()
            .map(|s: &str| ValueKind::Number(s.to_string()))
            .boxed();

        let escape = just('\\')
            .then(choice((
                one_of("\\/\"bfnrt").ignored(),
                just('u').then(text::digits(16).exactly(4)).ignored(),
            )))
            .ignored()
            .boxed();

        let string = any()
            .filter(|c: &char| *c != '\\' && *c != '"' && *c >= ' ')
            .ignored()
            .or(escape)
            .repeated()
            .to_slice()
            .delimited_by(just('"'), just('"'))
            .try_map(|raw: &str, span| {
                unescape(raw).ok_or_else(|| Rich::custom(span, "invalid unicode escape"))
            })
            .boxed();

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(ValueKind::Array)
            .boxed();

        let member = string.clone().then_ignore(just(':').padded()).then(value);

        let object = member
            .separated_by(just(',').padded())
            .collect::<Vec<(String, JsonValue)>>()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(|members| ValueKind::Object(members.into_iter().collect()))
            .boxed();

        choice((
            just("null").to(ValueKind::Null),
            just("true").to(ValueKind::Bool(true)),
            just("false").to(ValueKind::Bool(false)),
            number,
            string.map(ValueKind::String),
            array,
            object,
        ))
        .map_with(move |kind, e| {
            let span: SimpleSpan = e.span();
            JsonValue::new(kind, lines.position(span.start))
        })
        .padded()
    });

    value.then_ignore(end())
}

/// Decode the escapes of a string body the grammar already accepted.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let high = hex4(&mut chars)?;
                if (0xD800..0xDC00).contains(&high) {
                    // The low half must follow as another \u escape.
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = hex4(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))?
                } else {
                    char::from_u32(high)?
                }
            }
            other => other,
        };
        out.push(decoded);
    }
    Some(out)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    (0..4).try_fold(0, |code, _| Some(code * 16 + chars.next()?.to_digit(16)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_point_at_value_start() {
        let doc = "{\n  \"version\": \"1.0.0\",\n  \"frameworks\": {\n    \"net45\": {}\n  }\n}";
        let root = read_str(doc).unwrap();
        assert_eq!(root.position, Position::new(1, 1));

        let obj = root.as_object().unwrap();
        let version = obj.get("version").unwrap();
        assert_eq!(version.position, Position::new(2, 14));

        let net45 = obj.object("frameworks").unwrap().get("net45").unwrap();
        assert_eq!(net45.position, Position::new(4, 14));
    }

    #[test]
    fn columns_count_characters() {
        let root = read_str("{\"é\": \"ü\", \"n\": 1}").unwrap();
        let obj = root.as_object().unwrap();
        assert_eq!(obj.get("é").unwrap().position, Position::new(1, 7));
        assert_eq!(obj.get("n").unwrap().position, Position::new(1, 17));
    }

    #[test]
    fn reads_all_shapes() {
        let root = read_str(r#"{"a": [1, -2.5e3, true, false, null], "b": "x"}"#).unwrap();
        let obj = root.as_object().unwrap();
        let items = obj.get("a").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].kind, ValueKind::Number("1".into()));
        assert_eq!(items[1].kind, ValueKind::Number("-2.5e3".into()));
        assert_eq!(items[2].as_bool(), Some(true));
        assert_eq!(items[3].as_bool(), Some(false));
        assert!(items[4].is_null());
        assert_eq!(obj.string("b"), Some("x"));
    }

    #[test]
    fn repeated_keys_keep_last_value() {
        let root = read_str(r#"{"a": 1, "b": 2, "a": "x"}"#).unwrap();
        let obj = root.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(obj.string("a"), Some("x"));
    }

    #[test]
    fn decodes_escapes() {
        let root = read_str(r#""a\"b\\c\né😀""#).unwrap();
        assert_eq!(root.as_str(), Some("a\"b\\c\né😀"));
    }

    #[test]
    fn rejects_bad_strings() {
        assert!(read_str(r#""\ud83d""#).is_err());
        assert!(read_str(r#""\q""#).is_err());
        assert!(read_str("\"tab\there\"").is_err());
    }

    #[test]
    fn skips_byte_order_mark() {
        let root = read_str("\u{feff}{}").unwrap();
        assert!(root.as_object().unwrap().is_empty());
    }

    #[test]
    fn rejects_trailing_content() {
        let err = read_str("{} x").unwrap_err();
        assert!(matches!(err, TreeError::Syntax { .. }));
        assert_eq!(err.position(), Some(Position::new(1, 4)));
    }

    #[test]
    fn rejects_trailing_comma() {
        assert!(read_str(r#"{"a": 1,}"#).is_err());
        assert!(read_str("[1,]").is_err());
    }

    #[test]
    fn reports_unexpected_end() {
        let err = read_str("{\"a\": ").unwrap_err();
        assert!(matches!(err, TreeError::UnexpectedEnd { .. }));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(read_str("01").is_err());
        assert!(read_str("1.").is_err());
        assert!(read_str("-").is_err());
        assert!(read_str("1e").is_err());
    }

    #[test]
    fn nesting_limit() {
        let ok = format!("{}{}", "[".repeat(32), "]".repeat(32));
        assert!(read_str(&ok).is_ok());

        let deep = format!("{{\"tags\": {}{}}}", "[".repeat(200_000), "]".repeat(200_000));
        let err = read_str(&deep).unwrap_err();
        assert!(matches!(err, TreeError::Syntax { .. }));
        assert_eq!(err.position(), Some(Position::new(1, 10 + MAX_DEPTH - 1)));
    }

    #[test]
    fn brackets_inside_strings_do_not_nest() {
        let doc = format!("[\"{}\"]", "[".repeat(500));
        let root = read_str(&doc).unwrap();
        assert_eq!(root.as_string_array().unwrap()[0].len(), 500);
    }

    #[test]
    fn agrees_with_serde_json_on_structure() {
        let doc = r#"{"name": "pkg", "tags": ["a", "b"], "nested": {"ok": true}}"#;
        let ours = read_str(doc).unwrap();
        let theirs: serde_json::Value = serde_json::from_str(doc).unwrap();

        let obj = ours.as_object().unwrap();
        assert_eq!(obj.string("name"), theirs["name"].as_str());
        assert_eq!(obj.string_array("tags").unwrap().len(), 2);
        assert_eq!(
            obj.object("nested").unwrap().bool("ok"),
            theirs["nested"]["ok"].as_bool()
        );
    }

    #[test]
    fn read_from_byte_source() {
        let root = read(&b"[\"x\"]"[..]).unwrap();
        assert_eq!(root.as_string_array().unwrap(), vec!["x"]);
    }
}
