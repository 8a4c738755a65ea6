// src/viewer.rs
//! Everything the window shows, and every transition between those states.
//!
//! The GUI forwards user input and clock ticks here and runs the
//! [`LoadTicket`]s it gets back through a [`SheetLoader`](crate::SheetLoader).

use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::config::Config;
use crate::data_types::{DisplayMode, SheetData, SourceReference};
use crate::error::FetchError;
use crate::load_state::{Completion, Generation, SheetSession};
use crate::notice::{CopyIndicator, NoticeBoard};
use crate::scheduler::RefreshScheduler;

/// A load the caller should perform, tagged with the generation its
/// result must be reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: Generation,
    pub source: SourceReference,
    pub mode: DisplayMode,
}

#[derive(Debug)]
pub struct Viewer {
    source: SourceReference,
    mode: DisplayMode,
    session: SheetSession,
    scheduler: RefreshScheduler,
    notices: NoticeBoard,
    copied: CopyIndicator,
    last_loaded_at: Option<DateTime<Local>>,
}

impl Viewer {
    pub fn new(source: SourceReference, mode: DisplayMode, now: Instant) -> Self {
        let mut scheduler = RefreshScheduler::default();
        scheduler.source_changed(source.has_document(), now);

        Viewer {
            source,
            mode,
            session: SheetSession::new(),
            scheduler,
            notices: NoticeBoard::default(),
            copied: CopyIndicator::default(),
            last_loaded_at: None,
        }
    }

    pub fn from_config(config: &Config, now: Instant) -> Self {
        let mut viewer = Viewer::new(
            SourceReference::new(config.document_id.clone(), config.tab_name.clone()),
            config.mode,
            now,
        );
        if config.auto_refresh {
            viewer.scheduler.set_enabled(true, now);
        }
        viewer
    }

    pub fn source(&self) -> &SourceReference {
        &self.source
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn session(&self) -> &SheetSession {
        &self.session
    }

    pub fn data(&self) -> Option<&SheetData> {
        self.session.data()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn auto_refresh(&self) -> bool {
        self.scheduler.is_enabled()
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Local>> {
        self.last_loaded_at
    }

    pub fn set_document_id(&mut self, document_id: String, now: Instant) {
        if self.source.document_id == document_id {
            return;
        }
        self.source.document_id = document_id;
        self.source_changed(now);
    }

    pub fn set_tab_name(&mut self, tab_name: String, now: Instant) {
        if self.source.tab_name == tab_name {
            return;
        }
        self.source.tab_name = tab_name;
        self.source_changed(now);
    }

    fn source_changed(&mut self, now: Instant) {
        self.session.invalidate();
        self.scheduler.source_changed(self.source.has_document(), now);
    }

    /// Switch display mode. Returns true when the sheet should be reloaded
    /// to reshape what is on screen.
    pub fn set_mode(&mut self, mode: DisplayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        let was_loading = self.session.is_loading();
        self.session.invalidate();
        self.source.has_document()
            && (was_loading || self.data().is_some_and(|data| data.mode() != mode))
    }

    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        let enabled = !self.scheduler.is_enabled();
        if !enabled {
            // A refresh still in flight must not land after the user stopped it.
            self.session.invalidate();
        }
        self.scheduler.set_enabled(enabled, now);
    }

    /// Validate the inputs and start a load. A blank document id posts a
    /// notice and leaves the session alone.
    pub fn begin_load(&mut self, now: Instant) -> Result<LoadTicket, FetchError> {
        if let Err(err) = self.source.validate() {
            warn!(error = %err, "load refused");
            self.notices.error(err.user_message(), now);
            return Err(err);
        }

        let generation = self.session.begin();
        debug!(?generation, mode = ?self.mode, "load started");
        Ok(LoadTicket {
            generation,
            source: self.source.clone(),
            mode: self.mode,
        })
    }

    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<SheetData, FetchError>,
        now: Instant,
    ) -> Completion {
        let completion = self.session.complete(generation, result);
        match &completion {
            Completion::Loaded => {
                self.last_loaded_at = Some(Local::now());
                let message = match self.data() {
                    Some(SheetData::List(excuses)) => {
                        format!("Loaded {} excuses.", excuses.len())
                    }
                    Some(SheetData::Table(table)) => format!("Loaded {} rows.", table.rows.len()),
                    None => "Sheet loaded.".to_string(),
                };
                self.notices.success(message, now);
            }
            Completion::Failed(err) => {
                warn!(error = %err, "failed to load sheet data");
                self.notices.error(err.user_message(), now);
            }
            Completion::Stale => {}
        }
        completion
    }

    /// Advance time: expire transient UI and hand out a ticket when an
    /// automatic refresh is due.
    pub fn poll(&mut self, now: Instant) -> Option<LoadTicket> {
        self.notices.expire(now);
        self.copied.expire(now);

        if self.scheduler.poll(now) {
            debug!("auto-refresh tick");
            return self.begin_load(now).ok();
        }
        None
    }

    /// Text to place on the clipboard for excuse `id`, if it is on screen.
    pub fn copy_excuse(&mut self, id: usize, now: Instant) -> Option<String> {
        let Some(SheetData::List(excuses)) = self.session.data() else {
            return None;
        };
        let text = excuses.iter().find(|excuse| excuse.id == id)?.text.clone();

        self.copied.mark(id, now);
        self.notices.success("Excuse copied!", now);
        Some(text)
    }

    pub fn is_copied(&self, id: usize, now: Instant) -> bool {
        self.copied.is_copied(id, now)
    }

    /// Whether anything time-based is pending.
    pub fn needs_ticks(&self) -> bool {
        self.scheduler.is_active() || !self.notices.is_empty() || self.copied.is_pending()
    }
}
