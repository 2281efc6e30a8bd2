use crate::catalog::{Catalog, CatalogEntry, EntryFilter};

use super::super::messages::{AssetFilter, TagFilter};

/// Catalog browsing model: the full entry list, the filtered view of it, and
/// the current selection.
pub struct BrowserState {
    pub(in crate::app) entries: Vec<CatalogEntry>,
    pub(in crate::app) visible: Vec<CatalogEntry>,
    pub(in crate::app) selected: Option<String>,
    pub(in crate::app) asset_filter: AssetFilter,
    pub(in crate::app) tag_filter: TagFilter,
    pub(in crate::app) tags: Vec<String>,
}

impl BrowserState {
    pub(in crate::app) fn from_catalog(catalog: &Catalog) -> Self {
        let mut browser = Self {
            entries: Vec::new(),
            visible: Vec::new(),
            selected: None,
            asset_filter: AssetFilter::All,
            tag_filter: TagFilter::Any,
            tags: Vec::new(),
        };
        browser.refresh(catalog);
        browser
    }

    /// Re-derive entries and tags from the catalog, then re-apply filters.
    pub(in crate::app) fn refresh(&mut self, catalog: &Catalog) {
        self.entries = catalog.entries();
        self.tags = catalog.distinct_tags();
        if let TagFilter::Tag(tag) = &self.tag_filter {
            if !self.tags.contains(tag) {
                self.tag_filter = TagFilter::Any;
            }
        }
        self.apply_filters();
    }

    /// Narrow `entries` down to `visible`; a selection that fell out of view
    /// is cleared.
    pub(in crate::app) fn apply_filters(&mut self) {
        let filter = self.filter();
        self.visible = self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        if let Some(code) = &self.selected {
            if !self.visible.iter().any(|entry| &entry.code == code) {
                self.selected = None;
            }
        }
    }

    pub(in crate::app) fn selected_entry(&self) -> Option<&CatalogEntry> {
        let code = self.selected.as_ref()?;
        self.visible.iter().find(|entry| &entry.code == code)
    }

    fn filter(&self) -> EntryFilter {
        let (audio, pdf) = match self.asset_filter {
            AssetFilter::All => (None, None),
            AssetFilter::AudioAndPdf => (Some(true), Some(true)),
            AssetFilter::AudioOnly => (Some(true), Some(false)),
            AssetFilter::PdfOnly => (Some(false), Some(true)),
        };
        let tags = match &self.tag_filter {
            TagFilter::Any => Vec::new(),
            TagFilter::Tag(tag) => vec![tag.clone()],
        };
        EntryFilter { audio, pdf, tags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> (TempDir, Catalog) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(CATALOG_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "items": {
                    "a": { "name": "Aria", "pdf": "a.pdf", "tags": ["alto"] },
                    "b": { "name": "Ballad", "audio": "b.mp3", "tags": ["tenor"] }
                },
                "paths": {}
            }"#,
        )
        .expect("write");
        let catalog = Catalog::load_from(&path).expect("load");
        (dir, catalog)
    }

    #[test]
    fn filtering_clears_hidden_selection() {
        let (_dir, catalog) = catalog();
        let mut browser = BrowserState::from_catalog(&catalog);
        browser.selected = Some("a".to_string());

        browser.asset_filter = AssetFilter::AudioOnly;
        browser.apply_filters();

        assert_eq!(browser.visible.len(), 1);
        assert_eq!(browser.visible[0].code, "b");
        assert_eq!(browser.selected, None);
    }

    #[test]
    fn stale_tag_filter_resets_on_refresh() {
        let (_dir, catalog) = catalog();
        let mut browser = BrowserState::from_catalog(&catalog);
        browser.tag_filter = TagFilter::Tag("bass".to_string());

        browser.refresh(&catalog);

        assert_eq!(browser.tag_filter, TagFilter::Any);
        assert_eq!(browser.visible.len(), 2);
    }
}
