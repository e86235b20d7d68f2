use std::fmt;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PublicationType {
    Article,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Author,
    Year,
    Title,
    Journal,
    Volume,
    Pages,
}

/// Bibliographic reference for the technique behind a learner.
#[derive(Debug, Clone)]
pub struct TechnicalInformation {
    kind: PublicationType,
    fields: Vec<(Field, String)>,
}

impl TechnicalInformation {
    pub fn new(kind: PublicationType) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    pub fn kind(&self) -> PublicationType {
        self.kind
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_bibtex(&self) -> String {
        let key = self.value(Field::Year).unwrap_or("unknown");
        let mut out = format!("@{}{{{},\n", self.kind, key);
        let mut sorted: Vec<&(Field, String)> = self.fields.iter().collect();
        sorted.sort_by_key(|(f, _)| f.to_string());
        let body: Vec<String> = sorted
            .iter()
            .map(|(f, v)| format!("   {} = {{{}}}", f, v))
            .collect();
        out.push_str(&body.join(",\n"));
        out.push_str("\n}\n");
        out
    }
}

impl fmt::Display for TechnicalInformation {
    /// Plain citation, e.g. `A. Author (1999). Title. Journal. 10:1-2.`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = self.value(Field::Author).unwrap_or("Anonymous");
        write!(f, "{author}")?;
        if let Some(year) = self.value(Field::Year) {
            write!(f, " ({year})")?;
        }
        write!(f, ".")?;
        if let Some(title) = self.value(Field::Title) {
            write!(f, " {title}.")?;
        }
        if let Some(journal) = self.value(Field::Journal) {
            write!(f, " {journal}.")?;
        }
        match (self.value(Field::Volume), self.value(Field::Pages)) {
            (Some(v), Some(p)) => write!(f, " {v}:{p}."),
            (Some(v), None) => write!(f, " {v}."),
            (None, Some(p)) => write!(f, " {p}."),
            (None, None) => Ok(()),
        }
    }
}
