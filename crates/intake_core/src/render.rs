//! Projection of an [`ExtractedRecord`] onto fixed display slots.

use std::fmt;

use shared::domain::ExtractedRecord;

pub const NOT_DETECTED: &str = "Not detected";
pub const NO_SKILLS: &str = "No skills detected";
pub const NO_EDUCATION: &str = "No education information found";
pub const NO_EXPERIENCE: &str = "No work experience found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSlot {
    Value(String),
    Placeholder(&'static str),
}

impl FieldSlot {
    fn from_scalar(value: Option<&str>) -> Self {
        match value {
            Some(text) if !text.is_empty() => Self::Value(text.to_string()),
            _ => Self::Placeholder(NOT_DETECTED),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Value(text) => text,
            Self::Placeholder(text) => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionView {
    /// One visual element per entry, in response order.
    Items(Vec<String>),
    Placeholder(&'static str),
}

impl SectionView {
    fn from_items(items: &[String], placeholder: &'static str) -> Self {
        if items.is_empty() {
            Self::Placeholder(placeholder)
        } else {
            Self::Items(items.to_vec())
        }
    }

    pub fn items(&self) -> &[String] {
        match self {
            Self::Items(items) => items,
            Self::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Items(_) => None,
            Self::Placeholder(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub name: FieldSlot,
    pub email: FieldSlot,
    pub phone: FieldSlot,
    pub skills: SectionView,
    pub education: SectionView,
    pub experience: SectionView,
}

pub fn render_record(record: &ExtractedRecord) -> RecordView {
    RecordView {
        name: FieldSlot::from_scalar(record.name.as_deref()),
        email: FieldSlot::from_scalar(record.email.as_deref()),
        phone: FieldSlot::from_scalar(record.phone.as_deref()),
        skills: SectionView::from_items(&record.skills, NO_SKILLS),
        education: SectionView::from_items(&record.education, NO_EDUCATION),
        experience: SectionView::from_items(&record.experience, NO_EXPERIENCE),
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:  {}", self.name.text())?;
        writeln!(f, "Email: {}", self.email.text())?;
        writeln!(f, "Phone: {}", self.phone.text())?;
        write_section(f, "Skills", &self.skills)?;
        write_section(f, "Education", &self.education)?;
        write_section(f, "Experience", &self.experience)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, section: &SectionView) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}:")?;
    match section {
        SectionView::Items(items) => {
            for item in items {
                writeln!(f, "  - {item}")?;
            }
            Ok(())
        }
        SectionView::Placeholder(text) => writeln!(f, "  ({text})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_mixed_record_onto_slots() {
        let record: ExtractedRecord = serde_json::from_str(
            r#"{"name":"A","skills":[],"education":["X"],"experience":[]}"#,
        )
        .expect("record");

        let view = render_record(&record);
        assert_eq!(view.name, FieldSlot::Value("A".to_string()));
        assert_eq!(view.email, FieldSlot::Placeholder(NOT_DETECTED));
        assert_eq!(view.skills.placeholder(), Some(NO_SKILLS));
        assert_eq!(view.education.items(), ["X".to_string()]);
        assert_eq!(view.experience.placeholder(), Some(NO_EXPERIENCE));
    }

    #[test]
    fn empty_scalar_counts_as_absent() {
        let record = ExtractedRecord {
            phone: Some(String::new()),
            ..ExtractedRecord::default()
        };
        assert!(render_record(&record).phone.is_placeholder());
    }

    #[test]
    fn preserves_item_order() {
        let record = ExtractedRecord {
            skills: vec!["Rust".into(), "SQL".into(), "Docker".into()],
            ..ExtractedRecord::default()
        };
        assert_eq!(
            render_record(&record).skills.items(),
            ["Rust".to_string(), "SQL".to_string(), "Docker".to_string()]
        );
    }

    #[test]
    fn text_rendering_lists_items_and_placeholders() {
        let record = ExtractedRecord {
            name: Some("Ada".into()),
            education: vec!["BSc Mathematics".into()],
            ..ExtractedRecord::default()
        };
        let text = render_record(&record).to_string();
        assert!(text.contains("Name:  Ada"));
        assert!(text.contains("  - BSc Mathematics"));
        assert!(text.contains("(No skills detected)"));
        assert!(text.contains("(No work experience found)"));
    }
}
