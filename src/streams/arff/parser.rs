use crate::core::attributes::{
    AttributeRef, DateAttribute, NominalAttribute, NumericAttribute,
};
use crate::core::instance_header::InstanceHeader;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::io::{BufRead, Error, ErrorKind, Seek};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
pub(super) enum ParsedAttribute {
    Numeric,
    Nominal(Vec<String>),
    Date(Option<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

fn unexpected_eof() -> Error {
    Error::new(ErrorKind::UnexpectedEof, "ARFF file ended before @data")
}

/// Reads everything up to and including `@data`. `class_index` defaults to the
/// last attribute. Returns the header and the byte offset of the first data line.
pub(super) fn parse_header<R: BufRead + Seek>(
    reader: &mut R,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();

    let data_start_pos = loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(unexpected_eof());
        }
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.trim().to_ascii_lowercase();
        if low.starts_with("@relation") {
            if relation.is_some() || !attributes.is_empty() {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "@relation must appear once, before any @attribute",
                ));
            }
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
        } else if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            attributes.push(build_attribute(name, kind));
        } else if low.starts_with("@data") {
            break reader.stream_position()?;
        } else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported header directive: {}", line.trim()),
            ));
        }
    };

    let class_index = match class_index {
        Some(i) if i >= attributes.len() => {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "class index {i} out of range for {} attributes",
                    attributes.len()
                ),
            ));
        }
        Some(i) => i,
        None => attributes.len().saturating_sub(1),
    };

    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    );

    Ok((header, data_start_pos))
}

fn build_attribute(name: String, kind: ParsedAttribute) -> AttributeRef {
    match kind {
        ParsedAttribute::Numeric => Arc::new(NumericAttribute::new(name)) as AttributeRef,
        ParsedAttribute::Nominal(values) => {
            Arc::new(NominalAttribute::from_labels(&name, values)) as AttributeRef
        }
        ParsedAttribute::Date(format) => Arc::new(DateAttribute::new(name, format)) as AttributeRef,
    }
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, ParsedAttribute), Error> {
    let trimmed = line.trim();
    if !trimmed.to_ascii_lowercase().starts_with("@attribute") {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "Line is not '@attribute'",
        ));
    }
    let rest = trimmed["@attribute".len()..].trim();

    let (name, after_name) = if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let end = rest[1..].find(quote).map(|i| i + 1).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                "Attribute name without closing quote marks",
            )
        })?;
        (rest[1..end].to_string(), rest[end + 1..].trim())
    } else {
        let mut it = rest.splitn(2, char::is_whitespace);
        let name = it.next().unwrap_or_default().to_string();
        let after = it
            .next()
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Attribute type is missing"))?;
        (name, after.trim())
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, ParsedAttribute::Numeric));
    }

    if low.starts_with("date") {
        let format = after_name["date".len()..].trim();
        let format = strip_surrounding_quotes(format);
        let format = (!format.is_empty()).then(|| format.to_string());
        return Ok((name, ParsedAttribute::Date(format)));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Nominal set without closing '}'"))?;

        let values = split_csv_preserving_quotes(&after_name[1..close])
            .iter()
            .map(|s| strip_surrounding_quotes(s).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "Empty nominal domain"));
        }

        return Ok((name, ParsedAttribute::Nominal(values)));
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Attribute kind not supported: {after_name}"),
    ))
}

pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
) -> Result<Vec<f64>, Error> {
    let tokens = split_csv_preserving_quotes(line);
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

        let attr = header.attributes[idx].as_any();

        if attr.is::<NumericAttribute>() {
            let v = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("Invalid numeric value '{raw}' for attribute #{idx}"),
                    )
                })?;
            values.push(v);
            continue;
        }

        if let Some(nominal) = attr.downcast_ref::<NominalAttribute>() {
            let key = strip_surrounding_quotes(raw);
            let Some(pos) = nominal.index_of_value(key) else {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("Nominal value '{key}' not found in domain of attribute #{idx}"),
                ));
            };
            values.push(pos as f64);
            continue;
        }

        if let Some(date) = attr.downcast_ref::<DateAttribute>() {
            let key = strip_surrounding_quotes(raw);
            let v = date.parse_date(key).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!(
                        "Invalid date '{key}' for attribute #{idx} (format '{}'): {e}",
                        date.format
                    ),
                )
            })?;
            values.push(v);
            continue;
        }

        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("Unsupported attribute type at column #{idx}"),
        ));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{Attribute, AttributeKind};
    use std::any::Any;
    use std::io::Cursor;

    fn hdr(attrs: Vec<AttributeRef>, class_index: usize) -> InstanceHeader {
        InstanceHeader::new("r".into(), attrs, class_index)
    }

    fn cursor(contents: &str) -> Cursor<Vec<u8>> {
        Cursor::new(contents.as_bytes().to_vec())
    }

    #[test]
    fn parse_attribute_line_kinds() {
        assert_eq!(
            parse_attribute_line("@attribute temp real").unwrap(),
            ("temp".to_string(), ParsedAttribute::Numeric)
        );
        assert_eq!(
            parse_attribute_line("@ATTRIBUTE 'wind speed' INTEGER").unwrap(),
            ("wind speed".to_string(), ParsedAttribute::Numeric)
        );
        assert_eq!(
            parse_attribute_line("@attribute play {yes, 'no'}").unwrap(),
            (
                "play".to_string(),
                ParsedAttribute::Nominal(vec!["yes".into(), "no".into()])
            )
        );
    }

    #[test]
    fn parse_attribute_line_dates() {
        assert_eq!(
            parse_attribute_line("@attribute ts date").unwrap(),
            ("ts".to_string(), ParsedAttribute::Date(None))
        );
        assert_eq!(
            parse_attribute_line("@attribute ts date \"yyyy-MM-dd HH:mm\"").unwrap(),
            (
                "ts".to_string(),
                ParsedAttribute::Date(Some("yyyy-MM-dd HH:mm".into()))
            )
        );
    }

    #[test]
    fn parse_attribute_line_missing_type_after_name() {
        let err = parse_attribute_line("@attribute outlook").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_name_without_closing_quote() {
        let err = parse_attribute_line("@attribute 'bad {x, y}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_rejects_non_attribute_line() {
        let err = parse_attribute_line("@relation r").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_empty_nominal_domain() {
        let err = parse_attribute_line("@attribute a {   }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_nominal_missing_closing_brace() {
        let err = parse_attribute_line("@attribute a {x, y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_unsupported_type_string() {
        let err = parse_attribute_line("@attribute note string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_defaults_class_to_last() {
        let mut c = cursor("@relation r\n@attribute a numeric\n@attribute c {p, q}\n@data\n");
        let (h, pos) = parse_header(&mut c, None).unwrap();
        assert_eq!(h.class_index(), 1);
        assert_eq!(h.attribute_kind(0), Some(AttributeKind::Numeric));
        assert_eq!(pos as usize, c.get_ref().len());
    }

    #[test]
    fn parse_header_class_index_out_of_range() {
        let mut c = cursor("@relation r\n@attribute a numeric\n@data\n");
        let err = parse_header(&mut c, Some(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn parse_header_unexpected_eof_before_data() {
        let mut c = cursor("@relation r\n@attribute a numeric\n");
        let err = parse_header(&mut c, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn parse_header_unsupported_header_directive() {
        let mut c = cursor("@relation r\n@foo bar\n@data\n1\n");
        let err = parse_header(&mut c, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_late_relation_is_rejected() {
        let mut c = cursor("@attribute a numeric\n@relation r\n@data\n");
        let err = parse_header(&mut c, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_without_relation_is_unnamed() {
        let mut c = cursor("% comment\n\n@attribute a numeric\n@data\n1\n");
        let (h, _) = parse_header(&mut c, Some(0)).unwrap();
        assert_eq!(h.relation_name(), "unnamed_relation");
        assert_eq!(h.number_of_attributes(), 1);
    }

    #[test]
    fn parse_instance_values_mixed_row() {
        let h = hdr(
            vec![
                Arc::new(NominalAttribute::from_labels("o", ["sunny", "rainy"])) as AttributeRef,
                Arc::new(NumericAttribute::new("t".into())) as AttributeRef,
                Arc::new(DateAttribute::new("d".into(), Some("yyyy-MM-dd".into()))) as AttributeRef,
            ],
            0,
        );
        let values = parse_instance_values(&h, "'rainy', 12.5, 1970-01-02").unwrap();
        assert_eq!(values, vec![1.0, 12.5, 86_400_000.0]);

        let values = parse_instance_values(&h, "?,?,?").unwrap();
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn parse_instance_values_wrong_arity() {
        let h = hdr(
            vec![
                Arc::new(NumericAttribute::new("a".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("b".into())) as AttributeRef,
            ],
            0,
        );
        let err = parse_instance_values(&h, "1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_values_invalid_numeric_and_date() {
        let h = hdr(vec![Arc::new(NumericAttribute::new("x".into())) as AttributeRef], 0);
        assert!(parse_instance_values(&h, "abc").is_err());

        let h = hdr(vec![Arc::new(DateAttribute::new("d".into(), None)) as AttributeRef], 0);
        let err = parse_instance_values(&h, "yesterday").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_values_rejects_non_finite_numbers() {
        let h = hdr(vec![Arc::new(NumericAttribute::new("x".into())) as AttributeRef], 0);
        for raw in ["1e400", "-1e400", "inf", "-inf", "NaN"] {
            let err = parse_instance_values(&h, raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData, "{raw}");
        }
        assert_eq!(parse_instance_values(&h, "1e300").unwrap(), vec![1e300]);
        assert!(parse_instance_values(&h, "?").unwrap()[0].is_nan());
    }

    #[test]
    fn parse_instance_values_unknown_nominal() {
        let h = hdr(vec![Arc::new(NominalAttribute::from_labels("a", ["x", "y"])) as AttributeRef], 0);
        let err = parse_instance_values(&h, "z").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    struct DummyAttr;
    impl Attribute for DummyAttr {
        fn name(&self) -> String {
            "d".into()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn arff_representation(&self) -> String {
            "@attribute d dummy".into()
        }
        fn calc_memory_size(&self) -> usize {
            size_of::<Self>()
        }
    }

    #[test]
    fn parse_instance_values_unsupported_attribute_type() {
        let h = hdr(vec![Arc::new(DummyAttr) as AttributeRef], 0);
        let err = parse_instance_values(&h, "42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
