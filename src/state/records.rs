//! Portfolio records managed by the admin

use super::forms::FormValues;
use serde::{Deserialize, Serialize};

/// Kind of record, one form schema each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Company,
    Experience,
    Skill,
    Language,
    CvSection,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Company,
        RecordKind::Experience,
        RecordKind::Skill,
        RecordKind::Language,
        RecordKind::CvSection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Company => "Company",
            RecordKind::Experience => "Experience",
            RecordKind::Skill => "Skill",
            RecordKind::Language => "Language",
            RecordKind::CvSection => "CV Section",
        }
    }

    /// Field that must be present for a record to be saved
    pub fn required_field(self) -> &'static str {
        match self {
            RecordKind::Company | RecordKind::Skill => "name",
            RecordKind::Experience | RecordKind::CvSection => "title",
            RecordKind::Language => "language",
        }
    }

    /// Field shown when the record is offered as an option elsewhere
    pub fn display_field(self) -> &'static str {
        self.required_field()
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub kind: RecordKind,
    pub values: FormValues,
}

impl Record {
    pub fn display_name(&self) -> String {
        let name = self.values.text(self.kind.display_field());
        if name.is_empty() {
            format!("{} #{}", self.kind.label(), self.id)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecordKind::CvSection).expect("serialize"),
            "\"cv_section\""
        );
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let record = Record {
            id: 7,
            kind: RecordKind::Skill,
            values: FormValues::new(),
        };
        assert_eq!(record.display_name(), "Skill #7");

        let named = Record {
            values: [("name", "Rust")].into_iter().collect(),
            ..record
        };
        assert_eq!(named.display_name(), "Rust");
    }
}
