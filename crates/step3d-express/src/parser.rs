//! ISO 10303-21 clear-text reader.
//!
//! Covers the exchange structure the HLR extraction needs: the header
//! section, one or more data sections, simple and complex instances, and
//! every parameter form (typed parameters and user-defined `!KEYWORD`s
//! included). `/* ... */` comments may appear wherever whitespace may.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1, one_of, satisfy},
    combinator::{map, opt, recognize, value},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::pool::{InstanceBody, Record};
use crate::value::{InstanceId, Value};

/// Data instance as read from the file, before it enters a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInstance {
    pub id: InstanceId,
    pub body: InstanceBody,
    /// 1-based line of the `#id` token.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeFile {
    pub header: Vec<Record>,
    pub data: Vec<ParsedInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error on line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Read a complete exchange structure.
pub fn parse_exchange(source: &str) -> Result<ExchangeFile, SyntaxError> {
    let fail = |rest: &str, message: &str| SyntaxError {
        line: line_of(source, rest),
        message: message.to_string(),
    };

    let (input, _) = ws(source).map_err(|e| fail(error_input(&e, source), "unterminated comment"))?;
    let (input, _) = tag::<_, _, nom::error::Error<&str>>("ISO-10303-21;")(input)
        .map_err(|_| fail(input, "expected ISO-10303-21;"))?;
    let (input, _) = ws(input).map_err(|e| fail(error_input(&e, input), "unterminated comment"))?;

    let (mut input, header) =
        header_section(input).map_err(|e| fail(error_input(&e, input), "malformed HEADER section"))?;

    let mut file = ExchangeFile {
        header,
        data: Vec::new(),
    };
    let mut lines = LineCounter::new(source);

    loop {
        let (rest, _) = ws(input).map_err(|e| fail(error_input(&e, input), "unterminated comment"))?;
        input = rest;
        if !input.starts_with("DATA") {
            break;
        }
        let (rest, records) =
            data_section(input, &mut lines).map_err(|e| fail(error_input(&e, input), "malformed entity instance"))?;
        file.data.extend(records);
        input = rest;
    }

    let (input, _) = tag::<_, _, nom::error::Error<&str>>("END-ISO-10303-21;")(input)
        .map_err(|_| fail(input, "expected DATA section or END-ISO-10303-21;"))?;
    let (_, _) = ws(input).map_err(|e| fail(error_input(&e, input), "unterminated comment"))?;

    Ok(file)
}

fn error_input<'a>(err: &nom::Err<nom::error::Error<&'a str>>, fallback: &'a str) -> &'a str {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => fallback,
    }
}

fn line_of(source: &str, rest: &str) -> usize {
    let offset = source.len().saturating_sub(rest.len());
    source[..offset].matches('\n').count() + 1
}

/// Line numbers for positions visited front to back. Only the newlines
/// between the previous position and the current one are counted.
struct LineCounter<'s> {
    source: &'s str,
    offset: usize,
    line: usize,
}

impl<'s> LineCounter<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the position where `rest` starts.
    fn line_at(&mut self, rest: &str) -> usize {
        let offset = self.source.len().saturating_sub(rest.len());
        if offset < self.offset {
            return line_of(self.source, rest);
        }
        self.line += self.source[self.offset..offset].matches('\n').count();
        self.offset = offset;
        self.line
    }
}

// ============================================================================
// Sections
// ============================================================================

fn header_section(input: &str) -> IResult<&str, Vec<Record>> {
    let (input, _) = tag("HEADER;")(input)?;
    let (input, _) = ws(input)?;
    let (input, records) = many0(terminated(header_entity, ws))(input)?;
    let (input, _) = tag("ENDSEC;")(input)?;
    Ok((input, records))
}

fn header_entity(input: &str) -> IResult<&str, Record> {
    let (input, record) = simple_record(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char(';')(input)?;
    Ok((input, record))
}

fn data_section<'a>(input: &'a str, lines: &mut LineCounter<'_>) -> IResult<&'a str, Vec<ParsedInstance>> {
    let (input, _) = tag("DATA")(input)?;
    let (input, _) = ws(input)?;
    // Edition 3 allows `DATA('name',('schema'));`
    let (input, _) = opt(terminated(parameter_list, ws))(input)?;
    let (input, _) = char(';')(input)?;
    let (mut input, _) = ws(input)?;

    let mut instances = Vec::new();
    while input.starts_with('#') {
        let line = lines.line_at(input);
        let (rest, (id, body)) = entity_instance(input)?;
        instances.push(ParsedInstance { id, body, line });
        let (rest, _) = ws(rest)?;
        input = rest;
    }

    let (input, _) = tag("ENDSEC;")(input)?;
    Ok((input, instances))
}

fn entity_instance(input: &str) -> IResult<&str, (InstanceId, InstanceBody)> {
    let (input, id) = instance_name(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = ws(input)?;
    let (input, body) = alt((
        map(simple_record, InstanceBody::Simple),
        map(complex_record, InstanceBody::Complex),
    ))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char(';')(input)?;
    Ok((input, (id, body)))
}

fn instance_name(input: &str) -> IResult<&str, InstanceId> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = digit1(input)?;
    // digit1 guarantees a decimal literal; only overflow can fail
    match digits.parse() {
        Ok(id) => Ok((input, id)),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
            digits,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn simple_record(input: &str) -> IResult<&str, Record> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, params) = parameter_list(input)?;
    Ok((
        input,
        Record {
            type_name: type_name.to_string(),
            params,
        },
    ))
}

fn complex_record(input: &str) -> IResult<&str, Vec<Record>> {
    delimited(
        pair(char('('), ws),
        many1(terminated(simple_record, ws)),
        char(')'),
    )(input)
}

// ============================================================================
// Parameters
// ============================================================================

fn parameter_list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(
        pair(char('('), ws),
        separated_list0(tuple((ws, char(','), ws)), parameter),
        pair(ws, char(')')),
    )(input)
}

fn parameter(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, char('$')),
        value(Value::Omitted, char('*')),
        map(instance_name, Value::Ref),
        map(string_literal, Value::String),
        map(binary_literal, Value::Binary),
        map(enumeration, Value::Enum),
        map(parameter_list, Value::List),
        typed_parameter,
        number,
    ))(input)
}

fn typed_parameter(input: &str) -> IResult<&str, Value> {
    let (input, name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, inner) = delimited(pair(char('('), ws), parameter, pair(ws, char(')')))(input)?;
    Ok((input, Value::Typed(name.to_string(), Box::new(inner))))
}

/// `NAME` or user-defined `!NAME`.
fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('!')),
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    )))(input)
}

/// Content between the apostrophes; a doubled `''` stays doubled.
fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, _) = char('\'')(input)?;
    let (input, content) = recognize(many0(alt((is_not("'"), tag("''")))))(input)?;
    let (input, _) = char('\'')(input)?;
    Ok((input, content.to_string()))
}

fn binary_literal(input: &str) -> IResult<&str, String> {
    let (input, digits) = delimited(
        char('"'),
        take_while1(|c: char| c.is_ascii_hexdigit()),
        char('"'),
    )(input)?;
    Ok((input, digits.to_string()))
}

fn enumeration(input: &str) -> IResult<&str, String> {
    let (input, token) = delimited(
        char('.'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        char('.'),
    )(input)?;
    Ok((input, token.to_string()))
}

/// Integers and reals. Part 21 reals may end at the point (`1.`) and
/// carry an exponent (`1.E-05`).
fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(tuple((
            char('.'),
            digit0,
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
    )))(input)?;

    let parsed = if text.contains('.') {
        text.parse::<f64>().ok().map(Value::Real)
    } else {
        text.parse::<i64>().ok().map(Value::Integer)
    };

    match parsed {
        Some(v) => Ok((rest, v)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        ))),
    }
}

// ============================================================================
// Whitespace and comments
// ============================================================================

fn ws(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, comment))))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(tag("/*"), terminated(take_until("*/"), tag("*/")))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_STEP: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('Test file'),'2;1');
FILE_NAME('test.step','2020-09-01T18:50:05',('Author'),(''),'proc','sys','Unknown');
FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));
ENDSEC;
DATA;
/* origin */
#1=CARTESIAN_POINT('Origin',(0.,0.,0.));
#2=DIRECTION('Z',(0.0,0.0,1.0));
#3=AXIS2_PLACEMENT_3D('',#1,#2,$);
#4=(GEOMETRIC_REPRESENTATION_CONTEXT(3) REPRESENTATION_CONTEXT('c','3D'));
ENDSEC;
END-ISO-10303-21;"#;

    #[test]
    fn test_parse_step() {
        let file = parse_exchange(SIMPLE_STEP).unwrap();
        assert_eq!(file.header.len(), 3);
        assert_eq!(file.header[0].type_name, "FILE_DESCRIPTION");
        assert_eq!(file.data.len(), 4);
        assert_eq!(file.data[0].line, 9);

        let InstanceBody::Simple(point) = &file.data[0].body else {
            panic!("expected simple record");
        };
        assert_eq!(point.type_name, "CARTESIAN_POINT");
        assert_eq!(
            point.params[1],
            Value::List(vec![Value::Real(0.0), Value::Real(0.0), Value::Real(0.0)])
        );

        let InstanceBody::Complex(parts) = &file.data[3].body else {
            panic!("expected complex record");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].type_name, "REPRESENTATION_CONTEXT");
    }

    #[test]
    fn test_parse_reference() {
        let (_, val) = instance_name("#123").unwrap();
        assert_eq!(val, 123);
    }

    #[test]
    fn test_parse_string() {
        let (_, val) = string_literal("'Hello World'").unwrap();
        assert_eq!(val, "Hello World");
        let (_, val) = string_literal("'it''s'").unwrap();
        assert_eq!(val, "it''s");
    }

    #[test]
    fn test_parse_real() {
        let (_, val) = number("3.14159").unwrap();
        assert!(matches!(val, Value::Real(v) if (v - 3.14159).abs() < 0.00001));
        let (_, val) = number("-1.E-05").unwrap();
        assert!(matches!(val, Value::Real(v) if (v + 1e-5).abs() < 1e-12));
        let (_, val) = number("42").unwrap();
        assert_eq!(val, Value::Integer(42));
    }

    #[test]
    fn test_parse_typed_and_enum_parameters() {
        let (_, list) = parameter_list("(LENGTH_MEASURE(1.5), .T., $, *, \"0F\")").unwrap();
        assert_eq!(
            list,
            vec![
                Value::Typed("LENGTH_MEASURE".into(), Box::new(Value::Real(1.5))),
                Value::Enum("T".into()),
                Value::Null,
                Value::Omitted,
                Value::Binary("0F".into()),
            ]
        );
    }

    #[test]
    fn syntax_errors_carry_the_line() {
        let broken = SIMPLE_STEP.replace("#2=DIRECTION('Z',(0.0,0.0,1.0));", "#2=DIRECTION('Z',(0.0,0.0,1.0);");
        let err = parse_exchange(&broken).unwrap_err();
        assert_eq!(err.line, 10);
    }

    #[test]
    fn instance_lines_across_sections() {
        let text = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('AP242'));\nENDSEC;\n\
                    DATA;\n#1=DIRECTION('',(1.,0.,0.));\n\n#2=DIRECTION('',\n(0.,1.,0.));\n\
                    #3=DIRECTION('',(0.,0.,1.));\nENDSEC;\n\
                    DATA;\n/* note\n */\n#4=DIRECTION('',(1.,0.,0.));\nENDSEC;\nEND-ISO-10303-21;\n";
        let file = parse_exchange(text).unwrap();
        let lines: Vec<_> = file.data.iter().map(|i| (i.id, i.line)).collect();
        assert_eq!(lines, vec![(1, 6), (2, 8), (3, 10), (4, 15)]);
    }

    #[test]
    fn rejects_non_exchange_text() {
        let err = parse_exchange("solid cube\nendsolid\n").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
