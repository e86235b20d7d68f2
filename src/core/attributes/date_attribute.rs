use crate::core::attributes::Attribute;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::any::Any;

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ss";

/// A date attribute. Values are held as milliseconds since the Unix epoch (UTC),
/// so they take part in distances as plain numbers.
#[derive(Clone, Debug)]
pub struct DateAttribute {
    pub name: String,
    pub format: String,
    chrono_format: String,
}

impl DateAttribute {
    pub fn new(name: String, format: Option<String>) -> DateAttribute {
        let format = format.unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        let chrono_format = translate_pattern(&format);
        DateAttribute {
            name,
            format,
            chrono_format,
        }
    }

    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }

    pub fn parse_date(&self, raw: &str) -> Result<f64, chrono::ParseError> {
        let fmt = self.chrono_format.as_str();
        if fmt.contains("%z") {
            return DateTime::parse_from_str(raw, fmt).map(|dt| dt.timestamp_millis() as f64);
        }
        match NaiveDateTime::parse_from_str(raw, fmt) {
            Ok(dt) => Ok(dt.and_utc().timestamp_millis() as f64),
            Err(e) => match NaiveDate::parse_from_str(raw, fmt) {
                Ok(d) => Ok(d
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc().timestamp_millis() as f64)
                    .unwrap_or_default()),
                Err(_) => Err(e),
            },
        }
    }
}

/// Rewrites a `SimpleDateFormat`-style pattern (as found in ARFF headers) into
/// `chrono` strftime syntax. Quoted runs are literal; `''` is a single quote.
fn translate_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('Z' | 'X', _) => "%z",
            _ => "",
        };

        if directive.is_empty() {
            for _ in 0..run {
                push_literal(&mut out, c);
            }
        } else {
            out.push_str(directive);
        }
        i += run;
    }

    out
}

#[inline]
fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

impl Attribute for DateAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} date \"{}\"", self.name, self.format)
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
            + self.name.capacity()
            + self.format.capacity()
            + self.chrono_format.capacity()
    }
}
