//! The snapshot publisher.
//!
//! [`SnapshotPublisher`] turns a [`MatchView`] into two artifacts:
//!
//! - the **document**, a full HTML page rendered from `document.html`,
//!   written only when its content differs from the last successful write;
//! - the **record**, a compact JSON [`StateRecord`] written on every call.
//!
//! Templates are compiled into the binary and rendered with `minijinja`
//! (HTML auto-escaping on, since every template name ends in `.html`).

use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, warn};

use scorebug_core::atomic::atomic_write;
use scorebug_core::config::PathsConfig;
use scorebug_core::match_state::MatchView;
use scorebug_core::session::SnapshotSink;
use scorebug_types::{OverlayPayload, StateRecord};

use crate::error::PublishError;
use crate::fill::{
    CardFill, DocumentFill, GoalFill, Palette, StatsFill, SubFill, build_record, record_href,
};

const DOCUMENT: &str = "document.html";
const GOAL: &str = "goal.html";
const CARD: &str = "card.html";
const SUB: &str = "sub.html";
const STATS: &str = "stats.html";

/// The compiled document and overlay templates.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self, PublishError> {
        let mut env = Environment::new();
        let sources = [
            (DOCUMENT, include_str!("../templates/document.html")),
            (GOAL, include_str!("../templates/goal.html")),
            (CARD, include_str!("../templates/card.html")),
            (SUB, include_str!("../templates/sub.html")),
            (STATS, include_str!("../templates/stats.html")),
        ];
        for (name, source) in sources {
            env.add_template(name, source).map_err(|e| {
                PublishError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, PublishError> {
        self.env
            .get_template(name)
            .map_err(|e| PublishError::Template(format!("missing {name} template: {e}")))?
            .render(context)
            .map_err(|e| PublishError::Template(format!("{name} render failed: {e}")))
    }

    /// Render the fragment of the active overlay; empty when there is none.
    pub fn overlay(&self, view: &MatchView, palette: &Palette) -> Result<String, PublishError> {
        match &view.overlay {
            None => Ok(String::new()),
            Some(OverlayPayload::Goal(goal)) => {
                self.render(GOAL, GoalFill::new(goal, view, palette))
            }
            Some(OverlayPayload::Card(card)) => self.render(CARD, CardFill::new(card)),
            Some(OverlayPayload::Sub(sub)) => self.render(SUB, SubFill::new(sub)),
            Some(OverlayPayload::Stats(stats)) => self.render(STATS, StatsFill::new(stats)),
        }
    }

    /// Render the full document from its fill.
    pub fn document(&self, fill: &DocumentFill) -> Result<String, PublishError> {
        self.render(DOCUMENT, fill)
    }
}

/// Document and record rendered from one view.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The compact record.
    pub record: StateRecord,
    /// The full document.
    pub document: String,
}

/// Render both artifacts for `view`. Pure: equal views give equal output.
pub fn render_snapshot(
    templates: &Templates,
    view: &MatchView,
    record_href: &str,
) -> Result<Snapshot, PublishError> {
    let palette = Palette::of(view);
    let overlay_markup = templates.overlay(view, &palette)?;
    let fill = DocumentFill::new(view, &palette, overlay_markup.clone(), record_href.to_owned());
    let document = templates.document(&fill)?;
    let record = build_record(view, &palette, overlay_markup);
    Ok(Snapshot { record, document })
}

/// Outcome of one publish.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// The record that was written.
    pub record: StateRecord,
    /// The document as rendered, whether or not it was written.
    pub document: String,
    /// Whether the document file was rewritten.
    pub document_written: bool,
}

/// Renders views and writes the document and record files.
pub struct SnapshotPublisher {
    templates: Templates,
    document_path: PathBuf,
    record_path: PathBuf,
    record_href: String,
    last_document: Option<String>,
}

impl SnapshotPublisher {
    /// Create a publisher writing to the configured paths.
    pub fn new(paths: &PathsConfig) -> Result<Self, PublishError> {
        Ok(Self {
            templates: Templates::new()?,
            record_href: record_href(&paths.document_file, &paths.record_file),
            document_path: paths.document_file.clone(),
            record_path: paths.record_file.clone(),
            last_document: None,
        })
    }

    /// Render `view` without writing anything.
    pub fn render(&self, view: &MatchView) -> Result<Snapshot, PublishError> {
        render_snapshot(&self.templates, view, &self.record_href)
    }

    /// Render `view`, write the document if it changed, and always write
    /// the record.
    pub fn publish_snapshot(&mut self, view: &MatchView) -> Result<Publication, PublishError> {
        let snapshot = self.render(view)?;
        let document_written = self.write(&snapshot)?;
        let Snapshot { record, document } = snapshot;
        Ok(Publication {
            record,
            document,
            document_written,
        })
    }

    /// Write an already-rendered snapshot. Returns whether the document
    /// file was rewritten.
    ///
    /// Both writes are attempted even if one fails. A failed document write
    /// is retried on the next call.
    pub fn write(&mut self, snapshot: &Snapshot) -> Result<bool, PublishError> {
        let document_result = self.write_document_if_changed(&snapshot.document);
        let record_result = serde_json::to_vec(&snapshot.record)
            .map_err(PublishError::from)
            .and_then(|bytes| write_file(&self.record_path, &bytes));

        let document_written = document_result?;
        record_result?;
        Ok(document_written)
    }

    fn write_document_if_changed(&mut self, document: &str) -> Result<bool, PublishError> {
        if self.last_document.as_deref() == Some(document) {
            return Ok(false);
        }
        write_file(&self.document_path, document.as_bytes())?;
        self.last_document = Some(document.to_owned());
        debug!(path = %self.document_path.display(), bytes = document.len(), "Document rewritten");
        Ok(true)
    }

    /// Where the document is written.
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Where the record is written.
    pub fn record_path(&self) -> &Path {
        &self.record_path
    }
}

impl SnapshotSink for SnapshotPublisher {
    fn publish(&mut self, view: &MatchView) {
        if let Err(e) = self.publish_snapshot(view) {
            warn!(error = %e, "Snapshot publish failed");
        }
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), PublishError> {
    atomic_write(path, content).map_err(|source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    })
}
