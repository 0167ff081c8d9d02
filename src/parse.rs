//! Parse pest pairs into the document tree, and attribute values into geometry

use pest::Parser;
use pest::iterators::Pair;

use crate::ast::{Attribute, Document, Element, Span};
use crate::errors::{ParseError, SourceContext};
use crate::types::{Point, Transform};
use crate::{Rule, SvgParser};

/// Parse markup into a document tree.
pub fn parse(ctx: &SourceContext) -> Result<Document, ParseError> {
    let pairs = SvgParser::parse(Rule::document, &ctx.source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p),
            pest::error::InputLocation::Span(s) => s,
        };
        ParseError::Syntax {
            message: e.variant.message().to_string(),
            src: ctx.named_source(),
            span: Span::new(start, end).into(),
        }
    })?;

    for pair in pairs {
        if pair.as_rule() == Rule::document {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::element {
                    let root = parse_element(inner, ctx)?;
                    return Ok(Document { root });
                }
            }
        }
    }

    Err(ParseError::Syntax {
        message: "no root element".to_string(),
        src: ctx.named_source(),
        span: Span::new(0, 0).into(),
    })
}

fn parse_element(pair: Pair<Rule>, ctx: &SourceContext) -> Result<Element, ParseError> {
    let span = Span::from(pair.as_span());
    let mut name: Option<(String, Span)> = None;
    let mut attributes = Vec::new();
    let mut children = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag_name => name = Some((inner.as_str().to_string(), inner.as_span().into())),
            Rule::attribute => attributes.push(parse_attribute(inner)),
            Rule::element => children.push(parse_element(inner, ctx)?),
            Rule::close_tag => {
                let close = inner.into_inner().next();
                if let (Some((open, open_span)), Some(close)) = (&name, close) {
                    if close.as_str() != open {
                        return Err(ParseError::MismatchedTag {
                            expected: open.clone(),
                            found: close.as_str().to_string(),
                            src: ctx.named_source(),
                            open: (*open_span).into(),
                            close: Span::from(close.as_span()).into(),
                        });
                    }
                }
            }
            // empty_end, text, cdata
            _ => {}
        }
    }

    let (name, name_span) = name.unwrap_or_default();
    Ok(Element {
        name,
        name_span,
        span,
        attributes,
        children,
    })
}

fn parse_attribute(pair: Pair<Rule>) -> Attribute {
    let mut name = String::new();
    let mut value = String::new();
    let mut value_span = Span::default();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => name = inner.as_str().to_string(),
            Rule::attr_value => {
                if let Some(text) = inner.into_inner().next() {
                    value = decode_entities(text.as_str());
                    value_span = text.as_span().into();
                }
            }
            _ => {}
        }
    }

    Attribute { name, value, value_span }
}

/// Decode the five predefined XML entities.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ============================================================================
// Attribute values
// ============================================================================

/// Parse an attribute value against one of the value grammars, yielding the entry pair.
fn parse_value(rule: Rule, text: &str) -> Result<Pair<'_, Rule>, String> {
    let mut pairs = SvgParser::parse(rule, text).map_err(|e| e.variant.message().to_string())?;
    pairs.next().ok_or_else(|| "empty value".to_string())
}

/// Numbers are integral; a fractional value rounds to the nearest integer.
fn number(pair: Pair<Rule>) -> Result<i32, String> {
    let text = pair.as_str();
    let value: f64 = text.parse().map_err(|_| format!("invalid number `{text}`"))?;
    let rounded = value.round();
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(format!("number `{text}` is out of range"));
    }
    Ok(rounded as i32)
}

fn numbers(pair: Pair<Rule>) -> Result<Vec<i32>, String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::number)
        .map(number)
        .collect()
}

/// A single number, e.g. `cx="12"`.
pub fn parse_number(text: &str) -> Result<i32, String> {
    let entry = parse_value(Rule::number_value, text)?;
    numbers(entry)?
        .first()
        .copied()
        .ok_or_else(|| "expected a number".to_string())
}

/// `x,y x,y ...` with commas and/or whitespace as separators.
pub fn parse_points(text: &str) -> Result<Vec<Point>, String> {
    let entry = parse_value(Rule::point_list, text)
        .map_err(|_| "expected pairs of numbers separated by commas or spaces".to_string())?;
    entry
        .into_inner()
        .filter(|p| p.as_rule() == Rule::coord_pair)
        .map(|pair| match numbers(pair)?.as_slice() {
            &[x, y] => Ok(Point::new(x, y)),
            _ => Err("expected an x,y pair".to_string()),
        })
        .collect()
}

/// At most one of `translate(dx[,dy])`, `rotate(deg)`, `scale(f)`.
///
/// The origin is not part of this attribute; see [`parse_origin`].
pub fn parse_transform(text: &str) -> Result<Transform, String> {
    let entry = parse_value(Rule::transform_attr, text)
        .map_err(|_| "expected one of translate(dx,dy), rotate(deg), scale(f)".to_string())?;

    let Some(function) = entry.into_inner().find(|p| p.as_rule() != Rule::EOI) else {
        return Ok(Transform::IDENTITY);
    };

    let rule = function.as_rule();
    let args = numbers(function)?;
    match (rule, args.as_slice()) {
        (Rule::translate, &[dx]) => Ok(Transform::translation(dx, 0)),
        (Rule::translate, &[dx, dy]) => Ok(Transform::translation(dx, dy)),
        (Rule::rotate, &[deg]) => Ok(Transform::rotation(deg)),
        (Rule::scale, &[factor]) => Ok(Transform::scaling(factor)),
        _ => Err(format!("malformed {:?} transform", rule)),
    }
}

/// `transform-origin="x y"` (or `x,y`).
pub fn parse_origin(text: &str) -> Result<Point, String> {
    let entry = parse_value(Rule::origin_attr, text)
        .map_err(|_| "expected two numbers: x y".to_string())?;
    match numbers(entry)?.as_slice() {
        &[x, y] => Ok(Point::new(x, y)),
        _ => Err("expected two numbers: x y".to_string()),
    }
}
