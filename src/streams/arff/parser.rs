use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::UNPARSEABLE_CLASS_LABEL;
use crate::utils::file_parsing::{
    split_csv_preserving_quotes, strip_surrounding_quotes, strip_trailing_comment,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Seek};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub(super) enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

fn read_directive(reader: &mut BufReader<File>, line: &mut String) -> Result<(), Error> {
    loop {
        line.clear();
        if reader.read_line(line)? == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        if !is_comment_or_empty(line) {
            return Ok(());
        }
    }
}

/// Reads everything up to `@data`, returning the header and the offset of
/// the first data line. The class defaults to the last attribute.
pub(super) fn parse_header(
    reader: &mut BufReader<File>,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();

    read_directive(reader, &mut line)?;
    if line.trim_start().to_ascii_lowercase().starts_with("@relation") {
        let raw = line.trim()["@relation".len()..].trim();
        relation = Some(strip_surrounding_quotes(raw).to_string());
        read_directive(reader, &mut line)?;
    }

    let data_start_pos = loop {
        let low = line.trim_start().to_ascii_lowercase();
        if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            let attribute: AttributeRef = match kind {
                AttributeKind::Numeric => Arc::new(NumericAttribute::new(name)),
                AttributeKind::Nominal(values) => {
                    Arc::new(NominalAttribute::from_labels(name, values))
                }
            };
            attributes.push(attribute);
        } else if low.starts_with("@data") {
            break reader.stream_position()?;
        } else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported header directive: {}", line.trim()),
            ));
        }
        read_directive(reader, &mut line)?;
    };

    if attributes.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "ARFF header declares no attributes",
        ));
    }
    let class_index = class_index.unwrap_or(attributes.len() - 1);
    if class_index >= attributes.len() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "Class index {class_index} out of range for {} attributes",
                attributes.len()
            ),
        ));
    }

    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    );
    Ok((header, data_start_pos))
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, AttributeKind), Error> {
    let trimmed = line.trim();
    if !trimmed.to_ascii_lowercase().starts_with("@attribute") {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "Line is not '@attribute'",
        ));
    }
    let rest = trimmed["@attribute".len()..].trim();

    let (name, after_name) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let end = rest[1..].find(quote).map(|i| i + 1).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    "Attribute name without closing quote marks",
                )
            })?;
            (rest[1..end].to_string(), rest[end + 1..].trim())
        }
        _ => {
            let (name, after) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Attribute type is missing"))?;
            (name.to_string(), after.trim())
        }
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, AttributeKind::Numeric));
    }

    if let Some(inside) = after_name.strip_prefix('{') {
        let close = inside
            .rfind('}')
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Nominal set without closing '}'"))?;
        let values = inside[..close]
            .split(',')
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "Empty nominal domain"));
        }
        return Ok((name, AttributeKind::Nominal(values)));
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Attribute kind not supported: {after_name}"),
    ))
}

/// Parses one data row. `?` becomes NaN. A class token outside the class
/// domain yields the unparseable label instead of an error.
pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
) -> Result<Vec<f64>, Error> {
    let tokens = split_csv_preserving_quotes(strip_trailing_comment(line));
    if tokens.len() != header.attributes.len() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Number of columns ({}) differs from number of attributes ({})",
                tokens.len(),
                header.attributes.len()
            ),
        ));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (idx, raw) in tokens.iter().enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            values.push(f64::NAN);
            continue;
        }

        let parsed = parse_value(&header.attributes[idx], idx, raw);
        match parsed {
            Ok(v) => values.push(v),
            Err(e) if idx == header.class_index() => {
                warn!(label = raw, error = %e, "unparseable class label");
                values.push(UNPARSEABLE_CLASS_LABEL as f64);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(values)
}

fn parse_value(attribute: &AttributeRef, idx: usize, raw: &str) -> Result<f64, Error> {
    if attribute.as_any().is::<NumericAttribute>() {
        return raw.parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Invalid numeric value '{raw}' for attribute #{idx}"),
            )
        });
    }

    if let Some(nominal) = attribute.as_any().downcast_ref::<NominalAttribute>() {
        let key = strip_surrounding_quotes(raw);
        return nominal
            .index_of_value(key)
            .map(|pos| pos as f64)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Nominal value '{key}' not found in domain of attribute #{idx}"),
                )
            });
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Unsupported attribute type at column #{idx}"),
    ))
}
