use crate::line::checked_time;

use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::error::VerboseError;
use nom::number::complete::double;
use nom::sequence::delimited;
use nom::IResult;

/// How a single line of a subtitles file was understood.
#[derive(Debug, PartialEq)]
pub enum Entry<'a> {
    Subtitle { time: f64, text: &'a str },
    /// Bracketed prefix present, but its contents are not a usable time.
    BadTime(&'a str),
    Other,
}

#[derive(Debug, Default)]
pub struct Parsed {
    pub entries: Vec<(f64, String)>,
    pub skipped: usize,
    pub ignored: usize,
}

pub struct Parser;
impl Parser {
    pub fn new() -> Self {
        Self {}
    }

    pub fn parse(&self, input: &str) -> Parsed {
        let input = match optional_bom(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };

        let mut parsed = Parsed::default();
        for (number, line) in text_lines(input).enumerate() {
            match classify(line) {
                Entry::Subtitle { time, text } => parsed.entries.push((time, text.to_string())),
                Entry::BadTime(raw) => {
                    log::debug!("Skipping line {}: invalid time '{}'", number + 1, raw);
                    parsed.skipped += 1;
                }
                Entry::Other => parsed.ignored += 1,
            }
        }
        parsed
    }
}

pub fn classify(line: &str) -> Entry<'_> {
    match bracketed(line) {
        Ok((text, raw)) => match parse_time(raw) {
            Some(time) => Entry::Subtitle { time, text },
            None => Entry::BadTime(raw),
        },
        Err(_) => Entry::Other,
    }
}

/// Parses a time in seconds using `.` as the decimal separator, regardless of locale.
/// Signed values are accepted; NaN and infinities are not.
pub fn parse_time(input: &str) -> Option<f64> {
    let (_, time) = all_consuming(delimited(
        multispace0,
        double::<_, VerboseError<&str>>,
        multispace0,
    ))(input)
    .ok()?;

    checked_time(time)
}

/// Splits on `\r\n`, `\n` and a lone `\r`. A final terminator does not start
/// another line.
fn text_lines(input: &str) -> impl Iterator<Item = &str> {
    let body = if input.is_empty() {
        None
    } else {
        Some(
            input
                .strip_suffix("\r\n")
                .or_else(|| input.strip_suffix('\n'))
                .or_else(|| input.strip_suffix('\r'))
                .unwrap_or(input),
        )
    };
    body.into_iter()
        .flat_map(|body| body.split('\n'))
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

/// `[` followed by everything up to the first `]`, which is consumed.
fn bracketed(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    delimited(char('['), take_until("]"), char(']'))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_time {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(parse_time(input), expected);
            }
        )*
        }
    }

    test_parse_time! {
        test_parse_time_0: ("12.500", Some(12.5)),
        test_parse_time_1: ("0", Some(0.0)),
        test_parse_time_2: (" 3.25 ", Some(3.25)),
        test_parse_time_3: ("+1.5", Some(1.5)),
        test_parse_time_4: (".5", Some(0.5)),
        test_parse_time_5: ("1e2", Some(100.0)),
        test_parse_time_6: ("1,5", None),
        test_parse_time_7: ("abc", None),
        test_parse_time_8: ("", None),
        test_parse_time_9: ("-2", Some(-2.0)),
        test_parse_time_10: ("inf", None),
        test_parse_time_11: ("NaN", None),
        test_parse_time_12: ("12.5s", None),
        test_parse_time_13: ("-0", Some(0.0)),
        test_parse_time_14: ("-inf", None),
        test_parse_time_15: (" -0.500", Some(-0.5)),
    }

    macro_rules! test_text_lines {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected): (&str, Vec<&str>) = $value;

                assert_eq!(text_lines(input).collect::<Vec<_>>(), expected);
            }
        )*
        }
    }

    test_text_lines! {
        test_text_lines_0: ("", vec![]),
        test_text_lines_1: ("a\nb\n", vec!["a", "b"]),
        test_text_lines_2: ("a\r\nb", vec!["a", "b"]),
        test_text_lines_3: ("a\rb\r", vec!["a", "b"]),
        test_text_lines_4: ("a\r\r\nb", vec!["a", "", "b"]),
        test_text_lines_5: ("\n", vec![""]),
        test_text_lines_6: ("a\n\nb", vec!["a", "", "b"]),
    }

    #[test]
    fn classifies_entry() {
        assert_eq!(
            classify("[12.500]Hello world"),
            Entry::Subtitle {
                time: 12.5,
                text: "Hello world"
            }
        );
    }

    #[test]
    fn keeps_text_verbatim() {
        assert_eq!(
            classify("[1.000]  spaced ] and [bracketed]"),
            Entry::Subtitle {
                time: 1.0,
                text: "  spaced ] and [bracketed]"
            }
        );
        assert_eq!(classify("[2]"), Entry::Subtitle { time: 2.0, text: "" });
    }

    #[test]
    fn classifies_bad_time() {
        assert_eq!(classify("[abc]hello"), Entry::BadTime("abc"));
        assert_eq!(classify("[]hello"), Entry::BadTime(""));
    }

    #[test]
    fn classifies_other() {
        assert_eq!(classify("hello"), Entry::Other);
        assert_eq!(classify(""), Entry::Other);
        assert_eq!(classify("[12.5 no closing bracket"), Entry::Other);
        assert_eq!(classify(" [1.0]leading space"), Entry::Other);
    }

    #[test]
    fn parses_carriage_return_only_file() {
        let parsed = Parser::new().parse("[0.000]A\r[1.000]B\r");

        assert_eq!(
            parsed.entries,
            vec![(0.0, "A".to_string()), (1.0, "B".to_string())]
        );
    }

    #[test]
    fn parses_file() {
        let input = "\u{FEFF}[0.000]First\r\n# comment\n[abc]hello\n\n[5.250]Second\n";
        let parsed = Parser::new().parse(input);

        assert_eq!(
            parsed.entries,
            vec![(0.0, "First".to_string()), (5.25, "Second".to_string())]
        );
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.ignored, 2);
    }
}
