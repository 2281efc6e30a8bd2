use crate::catalog::EntryRecord;

/// Whether the form creates a new entry or rewrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit { code: String },
}

/// The add/edit entry form. All fields are kept as raw text until save.
pub struct EditorState {
    pub(in crate::app) mode: EditorMode,
    pub(in crate::app) name: String,
    pub(in crate::app) pdf: String,
    pub(in crate::app) audio: String,
    pub(in crate::app) tags: String,
    pub(in crate::app) start_page: String,
}

impl EditorState {
    pub(in crate::app) fn add() -> Self {
        Self {
            mode: EditorMode::Add,
            name: String::new(),
            pdf: String::new(),
            audio: String::new(),
            tags: String::new(),
            start_page: String::new(),
        }
    }

    pub(in crate::app) fn edit(code: &str, record: &EntryRecord) -> Self {
        Self {
            mode: EditorMode::Edit {
                code: code.to_string(),
            },
            name: record.name.clone(),
            pdf: record.pdf.clone().unwrap_or_default(),
            audio: record.audio.clone().unwrap_or_default(),
            tags: record.tags.join(", "),
            start_page: record
                .page_num
                .map(|page| page.to_string())
                .unwrap_or_default(),
        }
    }

    /// The code this form saves under: kept when editing, derived from the
    /// name when adding.
    pub(in crate::app) fn code(&self) -> String {
        match &self.mode {
            EditorMode::Edit { code } => code.clone(),
            EditorMode::Add => code_from_name(&self.name),
        }
    }

    /// Validate and convert the form into a record. Errors are user-input
    /// errors, phrased for the error banner.
    pub(in crate::app) fn to_record(&self) -> Result<EntryRecord, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        let start_page = match self.start_page.trim() {
            "" => None,
            digits => Some(
                digits
                    .parse::<usize>()
                    .map_err(|_| format!("Start page must be a number, got '{digits}'"))?,
            ),
        };
        Ok(EntryRecord {
            name: self.name.trim().to_string(),
            pdf: non_empty(&self.pdf),
            audio: non_empty(&self.audio),
            tags: parse_tags(&self.tags),
            page_num: start_page,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(in crate::app) fn code_from_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

pub(in crate::app) fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_derivation_lowercases_and_underscores() {
        assert_eq!(code_from_name("  Wild Rover "), "wild_rover");
    }

    #[test]
    fn tags_split_on_commas() {
        assert_eq!(
            parse_tags("Alto, tenor ,, BASS"),
            vec!["alto", "tenor", "bass"]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut editor = EditorState::add();
        editor.name = "   ".to_string();
        assert!(editor.to_record().is_err());
    }

    #[test]
    fn bad_start_page_is_rejected() {
        let mut editor = EditorState::add();
        editor.name = "Aria".to_string();
        editor.start_page = "two".to_string();
        assert!(editor.to_record().is_err());
    }

    #[test]
    fn form_round_trips_a_record() {
        let record = EntryRecord {
            name: "Aria".to_string(),
            pdf: Some("a.pdf".to_string()),
            audio: None,
            tags: vec!["alto".to_string()],
            page_num: Some(3),
        };
        let editor = EditorState::edit("aria", &record);
        assert_eq!(editor.code(), "aria");
        assert_eq!(editor.to_record().expect("valid form"), record);
    }
}
