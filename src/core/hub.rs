//! The hub controller: one owner for all session state
//!
//! The registry, search term, selection and form data live here and are
//! only changed through these methods. Frontends read from the hub and
//! forward user actions to it; notices raised along the way are queued for
//! the frontend to drain with [`Hub::take_notices`].

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::entry::{EntryId, SchemaEntry};
use crate::core::notice::{self, Notice};
use crate::core::registry::{self, Registry};
use crate::error::{FetchError, HubError};
use crate::export;
use crate::schema::fields::{extract_fields, FieldSpec};
use crate::schema::form::FormSession;
use crate::source::{local, remote, SchemaFetcher};

/// What the form area should show
#[derive(Debug)]
pub enum RenderView<'a> {
    /// Nothing selected yet
    Placeholder(&'static str),
    Form {
        entry: &'a SchemaEntry,
        fields: Vec<FieldSpec>,
        data: &'a Value,
    },
}

#[derive(Debug)]
pub struct Hub {
    registry: Registry,
    search: String,
    selection: Option<EntryId>,
    form_data: Value,
    notices: Vec<Notice>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            search: String::new(),
            selection: None,
            form_data: empty_form(),
            notices: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add an uploaded document; invalid JSON leaves the registry untouched
    pub fn upload(&mut self, name: &str, text: &str) -> Result<EntryId, HubError> {
        match local::parse_schema(name, text) {
            Ok(entry) => {
                let id = self.registry.append(entry);
                info!(name, %id, "schema uploaded");
                self.notices.push(Notice::success(notice::upload_succeeded(name)));
                Ok(id)
            }
            Err(e) => {
                warn!(name, error = %e, "upload rejected");
                self.notices.push(Notice::error(notice::UPLOAD_PARSE_FAILED));
                Err(e)
            }
        }
    }

    /// Read a local file and upload its contents
    ///
    /// An unreadable file is reported with the same notice as invalid JSON:
    /// either way the upload produced no schema.
    pub fn upload_file(&mut self, path: &Path) -> Result<EntryId, HubError> {
        let name = local::file_name(path);
        match local::read_text(path) {
            Ok(text) => self.upload(&name, &text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "upload unreadable");
                self.notices.push(Notice::error(notice::UPLOAD_PARSE_FAILED));
                Err(e)
            }
        }
    }

    /// Fetch the remote listing and apply it
    pub fn load_remote(&mut self, fetcher: &dyn SchemaFetcher) -> Result<usize, HubError> {
        let result = remote::fetch_entries_blocking(fetcher);
        self.apply_remote(result)
    }

    /// Apply the outcome of one remote fetch cycle
    ///
    /// Success replaces the registry wholesale; failure changes nothing
    /// except queuing an error notice.
    pub fn apply_remote(
        &mut self,
        result: Result<Vec<SchemaEntry>, FetchError>,
    ) -> Result<usize, HubError> {
        match result {
            Ok(entries) => {
                let count = entries.len();
                self.registry.replace_all(entries);
                if let Some(id) = self.selection {
                    if !self.registry.contains(id) {
                        debug!(%id, "selection dropped by remote replace");
                        self.selection = None;
                        self.form_data = empty_form();
                    }
                }
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "remote fetch failed");
                self.notices.push(Notice::error(notice::REMOTE_FETCH_FAILED));
                Err(HubError::Fetch(e))
            }
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// The registry narrowed by the current search term
    pub fn visible(&self) -> Vec<&SchemaEntry> {
        registry::filter(self.registry.iter(), &self.search)
    }

    /// Select an entry; returns whether the selection changed
    ///
    /// Moving to a different entry starts a fresh, empty form.
    pub fn select(&mut self, id: EntryId) -> Result<bool, HubError> {
        if !self.registry.contains(id) {
            return Err(HubError::UnknownEntry(id.to_string()));
        }
        if self.selection == Some(id) {
            return Ok(false);
        }
        debug!(%id, "selection changed");
        self.selection = Some(id);
        self.form_data = empty_form();
        Ok(true)
    }

    pub fn selection(&self) -> Option<EntryId> {
        self.selection
    }

    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selection == Some(id)
    }

    pub fn selected(&self) -> Option<&SchemaEntry> {
        self.selection.and_then(|id| self.registry.get(id))
    }

    pub fn form_data(&self) -> &Value {
        &self.form_data
    }

    /// Store edited form data back into the session
    pub fn update_form_data(&mut self, data: Value) {
        self.form_data = data;
    }

    /// Start a form session for the selected schema, seeded with current data
    pub fn open_form(&self) -> Result<FormSession, HubError> {
        let entry = self.selected().ok_or(HubError::NoSelection)?;
        FormSession::new(entry, self.form_data.clone())
    }

    pub fn render(&self) -> RenderView<'_> {
        match self.selected() {
            None => RenderView::Placeholder(notice::SELECT_PLACEHOLDER),
            Some(entry) => RenderView::Form {
                entry,
                fields: extract_fields(&entry.schema),
                data: &self.form_data,
            },
        }
    }

    /// Export the current form data; only available while a form is shown
    pub fn export(&self, dir: &Path) -> Result<PathBuf, HubError> {
        if self.selection.is_none() {
            return Err(HubError::NoSelection);
        }
        export::write_export(dir, &self.form_data)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

fn empty_form() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notice::NoticeLevel;
    use crate::source::remote::tests::FakeFetcher;
    use serde_json::json;
    use tempfile::tempdir;

    fn names(hub: &Hub) -> Vec<String> {
        hub.registry().iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_upload_valid_appends_one_entry() {
        let mut hub = Hub::new();
        let id = hub.upload("person.json", r#"{"type": "object"}"#).unwrap();

        assert_eq!(hub.registry().len(), 1);
        let entry = hub.registry().get(id).unwrap();
        assert_eq!(entry.name, "person.json");
        assert_eq!(entry.schema, json!({"type": "object"}));

        let notices = hub.take_notices();
        assert_eq!(notices, vec![Notice::success("person.json 上传成功")]);
        assert!(hub.notices().is_empty());
    }

    #[test]
    fn test_upload_invalid_leaves_registry_unchanged() {
        let mut hub = Hub::new();
        hub.upload("a.json", "{}").unwrap();
        hub.take_notices();

        assert!(hub.upload("b.json", "{ nope").is_err());
        assert_eq!(names(&hub), vec!["a.json"]);
        let notices = hub.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, notice::UPLOAD_PARSE_FAILED);
    }

    #[test]
    fn test_upload_file_reads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("order.json");
        std::fs::write(&path, r#"{"title": "Order"}"#).unwrap();

        let mut hub = Hub::new();
        hub.upload_file(&path).unwrap();
        hub.take_notices();

        let err = hub.upload_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, HubError::Io { .. }));
        assert_eq!(names(&hub), vec!["order.json"]);
        assert_eq!(
            hub.take_notices(),
            vec![Notice::error(notice::UPLOAD_PARSE_FAILED)]
        );
    }

    #[test]
    fn test_duplicate_uploads_are_both_kept() {
        let mut hub = Hub::new();
        let a = hub.upload("same.json", "{}").unwrap();
        let b = hub.upload("same.json", "{}").unwrap();
        assert_ne!(a, b);
        assert_eq!(hub.registry().len(), 2);
    }

    #[test]
    fn test_search_filters_visible_entries() {
        let mut hub = Hub::new();
        for name in ["Person.json", "order.json", "person-v2.json"] {
            hub.upload(name, "{}").unwrap();
        }
        assert_eq!(hub.visible().len(), 3);

        hub.set_search("PERSON");
        let visible: Vec<_> = hub.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(visible, vec!["Person.json", "person-v2.json"]);

        hub.set_search("");
        assert_eq!(hub.visible().len(), 3);
    }

    #[test]
    fn test_selection_is_keyed_by_id() {
        let mut hub = Hub::new();
        let a = hub.upload("a.json", r#"{"type": "object"}"#).unwrap();
        let b = hub.upload("b.json", r#"{"type": "object"}"#).unwrap();

        assert!(hub.select(a).unwrap());
        assert!(hub.is_selected(a));
        assert!(!hub.is_selected(b));

        assert!(hub.select(b).unwrap());
        assert!(!hub.is_selected(a));
        assert!(hub.is_selected(b));
        assert_eq!(hub.selected().map(|e| e.name.as_str()), Some("b.json"));
    }

    #[test]
    fn test_reselecting_same_entry_is_a_no_op() {
        let mut hub = Hub::new();
        let a = hub.upload("a.json", "{}").unwrap();
        hub.select(a).unwrap();
        hub.update_form_data(json!({"kept": true}));

        assert!(!hub.select(a).unwrap());
        assert_eq!(hub.form_data(), &json!({"kept": true}));
    }

    #[test]
    fn test_switching_selection_resets_form_data() {
        let mut hub = Hub::new();
        let a = hub.upload("a.json", "{}").unwrap();
        let b = hub.upload("b.json", "{}").unwrap();
        hub.select(a).unwrap();
        hub.update_form_data(json!({"x": 1}));
        hub.select(b).unwrap();
        assert_eq!(hub.form_data(), &json!({}));
    }

    #[test]
    fn test_select_unknown_id() {
        let mut hub = Hub::new();
        let err = hub.select(EntryId::new()).unwrap_err();
        assert!(matches!(err, HubError::UnknownEntry(_)));
        assert!(hub.selection().is_none());
    }

    #[test]
    fn test_render_placeholder_then_form() {
        let mut hub = Hub::new();
        assert!(matches!(
            hub.render(),
            RenderView::Placeholder(notice::SELECT_PLACEHOLDER)
        ));

        let id = hub
            .upload("p.json", r#"{"properties": {"name": {"type": "string"}}}"#)
            .unwrap();
        hub.select(id).unwrap();
        match hub.render() {
            RenderView::Form { entry, fields, data } => {
                assert_eq!(entry.id, id);
                assert_eq!(fields.len(), 1);
                assert_eq!(data, &json!({}));
            }
            RenderView::Placeholder(_) => panic!("expected a form"),
        }
    }

    #[test]
    fn test_form_edits_flow_back_to_export() {
        let dir = tempdir().unwrap();
        let mut hub = Hub::new();
        let id = hub
            .upload("p.json", r#"{"properties": {"a": {"type": "integer"}}}"#)
            .unwrap();
        hub.select(id).unwrap();

        let mut form = hub.open_form().unwrap();
        form.set(&["a".to_string()], json!(1));
        hub.update_form_data(form.into_data());

        let path = hub.export(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_export_without_selection() {
        let dir = tempdir().unwrap();
        let hub = Hub::new();
        assert!(matches!(hub.export(dir.path()), Err(HubError::NoSelection)));
        assert!(matches!(hub.open_form(), Err(HubError::NoSelection)));
    }

    #[test]
    fn test_export_empty_form_is_allowed() {
        let dir = tempdir().unwrap();
        let mut hub = Hub::new();
        let id = hub.upload("p.json", "{}").unwrap();
        hub.select(id).unwrap();
        let path = hub.export(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_remote_success_replaces_registry() {
        let mut hub = Hub::new();
        let local_id = hub.upload("local.json", "{}").unwrap();
        hub.select(local_id).unwrap();

        let fetcher = FakeFetcher::new(&["a.json", "b.txt", "c.json"])
            .with_body("a.json", json!({"title": "A"}))
            .with_body("c.json", json!({"title": "C"}));
        assert_eq!(hub.load_remote(&fetcher).unwrap(), 2);

        assert_eq!(names(&hub), vec!["a.json", "c.json"]);
        assert!(hub.selection().is_none());
    }

    #[test]
    fn test_remote_failure_keeps_previous_registry() {
        let mut hub = Hub::new();
        hub.upload("local.json", "{}").unwrap();
        hub.take_notices();
        let before: Vec<_> = hub.registry().entries().to_vec();

        let fetcher = FakeFetcher::new(&["a.json", "b.json"]).with_body("a.json", json!({}));
        assert!(hub.load_remote(&fetcher).is_err());

        assert_eq!(hub.registry().entries(), before.as_slice());
        let notices = hub.take_notices();
        assert_eq!(notices, vec![Notice::error(notice::REMOTE_FETCH_FAILED)]);
    }
}
