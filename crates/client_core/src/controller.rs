//! Session controller: owns the form state and every screen transition.
//!
//! Views read state through [`SessionController::view`] and report user
//! intents back through the transition methods. Outbound calls are split into
//! a begin step that hands out a generation-stamped ticket and a complete step
//! that drops the outcome when the ticket is no longer current.

use std::sync::Arc;

use shared::{
    domain::{ChatMessage, InterviewSession, Site, SiteArea, SiteType, Topic, UserRole},
    protocol::{SubmissionPayload, EMPTY_TRANSCRIPT_SUMMARY},
};
use tracing::{debug, info, warn};

use crate::{error::CollaboratorError, transcript, Collaborator};

pub const SUMMARY_ERROR_PREFIX: &str = "Sorry, there was an error generating the summary.";
pub const SUMMARY_ERROR_SUFFIX: &str = "Please check the backend script configuration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    RoleSelection,
    SiteSelection,
    Home,
    Topic,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved(Screen),
    Ignored,
}

/// Partially filled site choice held by the site screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteDraft {
    pub area: Option<SiteArea>,
    pub kind: Option<SiteType>,
}

impl SiteDraft {
    pub fn complete(&self) -> Option<Site> {
        Some(Site::new(self.area?, self.kind?))
    }
}

/// Input buffer of the topic screen; flushed with [`SessionController::finish_topic`].
#[derive(Debug, Clone, Default)]
pub struct TopicDraft {
    entries: Vec<ChatMessage>,
}

impl TopicDraft {
    /// Appends one entry. Blank input is ignored and returns `false`.
    pub fn add(&mut self, raw: &str) -> bool {
        match ChatMessage::feedback(raw) {
            Some(entry) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ChatMessage> {
        self.entries
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub role: Option<UserRole>,
    pub site: Option<Site>,
    pub active_topic: Option<Topic>,
    pub history: Vec<InterviewSession>,
    pub summary: String,
    pub summary_loading: bool,
    pub summary_error: Option<String>,
    pub submission: SubmissionStatus,
}

#[derive(Debug)]
#[must_use]
pub struct PendingSummary {
    generation: u64,
    transcript: Vec<ChatMessage>,
}

impl PendingSummary {
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}

#[derive(Debug)]
#[must_use]
pub struct PendingSubmission {
    generation: u64,
    payload: SubmissionPayload,
}

impl PendingSubmission {
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }
}

#[derive(Debug)]
pub enum SummaryStart {
    /// A collaborator call must be made and fed to `complete_summary`.
    Pending(PendingSummary),
    /// Nothing to send; the placeholder summary is already in place.
    Ready,
    Ignored,
}

/// What the current screen should render.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    RoleSelection,
    SiteSelection,
    Home {
        role: UserRole,
        site: Site,
        can_summarize: bool,
    },
    Topic {
        topic: Topic,
    },
    Summary {
        role: UserRole,
        site: Site,
        sessions: &'a [InterviewSession],
        summary: &'a str,
        loading: bool,
        error: Option<&'a str>,
        submission: &'a SubmissionStatus,
        can_submit: bool,
    },
}

pub struct SessionController {
    screen: Screen,
    state: SessionState,
    generation: u64,
    collaborator: Arc<dyn Collaborator>,
}

impl SessionController {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            screen: Screen::RoleSelection,
            state: SessionState::default(),
            generation: 0,
            collaborator,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn can_summarize(&self) -> bool {
        !self.state.history.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.history.is_empty()
            && !self.state.summary_loading
            && self.collaborator.is_configured()
            && !matches!(
                self.state.submission,
                SubmissionStatus::Submitting | SubmissionStatus::Submitted
            )
    }

    pub fn endpoint_configured(&self) -> bool {
        self.collaborator.is_configured()
    }

    /// Selects the view for the current screen, repairing inconsistent state
    /// by redirecting instead of surfacing an error.
    pub fn view(&mut self) -> View<'_> {
        self.repair();
        let state = &self.state;
        match (self.screen, state.role, state.site, state.active_topic) {
            (Screen::SiteSelection, ..) => View::SiteSelection,
            (Screen::Topic, _, _, Some(topic)) => View::Topic { topic },
            (Screen::Home, Some(role), Some(site), _) => View::Home {
                role,
                site,
                can_summarize: self.can_summarize(),
            },
            (Screen::Summary, Some(role), Some(site), _) => View::Summary {
                role,
                site,
                sessions: &state.history,
                summary: &state.summary,
                loading: state.summary_loading,
                error: state.summary_error.as_deref(),
                submission: &state.submission,
                can_submit: self.can_submit(),
            },
            _ => View::RoleSelection,
        }
    }

    fn repair(&mut self) {
        if self.screen == Screen::Topic && self.state.active_topic.is_none() {
            debug!("topic screen without an active topic; returning home");
            self.screen = Screen::Home;
        }
        let needs_identity = matches!(self.screen, Screen::Home | Screen::Summary);
        if needs_identity && (self.state.role.is_none() || self.state.site.is_none()) {
            debug!(screen = ?self.screen, "missing role or site; returning to role selection");
            self.state.role = None;
            self.move_to(Screen::RoleSelection);
        }
    }

    fn move_to(&mut self, screen: Screen) -> Transition {
        if self.screen == Screen::Summary && screen != Screen::Summary {
            // Leaving the summary invalidates any outstanding request.
            self.generation += 1;
            if self.state.submission == SubmissionStatus::Submitting {
                self.state.submission = SubmissionStatus::Idle;
            }
        }
        debug!(from = ?self.screen, to = ?screen, "screen transition");
        self.screen = screen;
        Transition::Moved(screen)
    }

    fn ignored(&self, event: &'static str) -> Transition {
        debug!(event, screen = ?self.screen, "event not valid for current screen");
        Transition::Ignored
    }

    fn clear_engagement(&mut self) {
        self.state.site = None;
        self.state.active_topic = None;
        self.state.history.clear();
        self.state.summary.clear();
        self.state.summary_loading = false;
        self.state.summary_error = None;
        self.state.submission = SubmissionStatus::Idle;
    }

    pub fn select_role(&mut self, role: UserRole) -> Transition {
        if self.screen != Screen::RoleSelection {
            return self.ignored("select_role");
        }
        self.state.role = Some(role);
        info!(%role, "role selected");
        self.move_to(Screen::SiteSelection)
    }

    pub fn select_site(&mut self, draft: &SiteDraft) -> Transition {
        if self.screen != Screen::SiteSelection {
            return self.ignored("select_site");
        }
        let Some(site) = draft.complete() else {
            return self.ignored("select_site");
        };
        self.state.site = Some(site);
        info!(%site, "site selected");
        self.move_to(Screen::Home)
    }

    pub fn open_topic(&mut self, topic: Topic) -> Transition {
        if self.screen != Screen::Home {
            return self.ignored("open_topic");
        }
        self.state.active_topic = Some(topic);
        self.move_to(Screen::Topic)
    }

    /// Closes the active topic. A session is recorded only when `entries` is non-empty.
    pub fn finish_topic(&mut self, entries: Vec<ChatMessage>) -> Transition {
        if self.screen != Screen::Topic {
            return self.ignored("finish_topic");
        }
        if let Some(topic) = self.state.active_topic.take() {
            let count = entries.len();
            if let Some(session) = InterviewSession::new(topic, entries) {
                self.state.history.push(session);
                info!(topic = topic.id(), entries = count, "interview session recorded");
            } else {
                debug!(topic = topic.id(), "topic closed without feedback");
            }
        }
        self.move_to(Screen::Home)
    }

    pub fn back(&mut self) -> Transition {
        match self.screen {
            Screen::SiteSelection => {
                self.state.role = None;
                self.move_to(Screen::RoleSelection)
            }
            Screen::Home => {
                self.clear_engagement();
                self.move_to(Screen::SiteSelection)
            }
            Screen::Summary => self.move_to(Screen::Home),
            Screen::RoleSelection | Screen::Topic => self.ignored("back"),
        }
    }

    pub fn restart_for_new_site(&mut self) -> Transition {
        if self.screen != Screen::Summary {
            return self.ignored("restart_for_new_site");
        }
        self.clear_engagement();
        self.move_to(Screen::SiteSelection)
    }

    pub fn restart(&mut self) -> Transition {
        self.clear_engagement();
        self.state.role = None;
        self.generation += 1;
        info!("session restarted");
        self.move_to(Screen::RoleSelection)
    }

    /// Enters the summary screen and prepares the summarization request.
    ///
    /// Views gate the trigger on [`Self::can_summarize`]; an empty history
    /// still resolves to the placeholder summary without a collaborator call.
    pub fn begin_summary(&mut self) -> SummaryStart {
        if self.screen != Screen::Home {
            self.ignored("summarize");
            return SummaryStart::Ignored;
        }
        self.move_to(Screen::Summary);
        self.generation += 1;
        self.state.summary_loading = true;
        self.state.summary_error = None;

        let transcript = transcript::flatten(&self.state.history);
        if transcript.is_empty() {
            self.state.summary = EMPTY_TRANSCRIPT_SUMMARY.to_string();
            self.state.summary_loading = false;
            return SummaryStart::Ready;
        }
        SummaryStart::Pending(PendingSummary {
            generation: self.generation,
            transcript,
        })
    }

    /// Applies a summarization outcome. Returns `false` if the ticket is stale.
    pub fn complete_summary(
        &mut self,
        ticket: PendingSummary,
        outcome: Result<String, CollaboratorError>,
    ) -> bool {
        if ticket.generation != self.generation || self.screen != Screen::Summary {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale summary response"
            );
            return false;
        }
        match outcome {
            Ok(summary) => {
                self.state.summary = summary;
            }
            Err(err) => {
                warn!(error = %err, "summarization failed");
                self.state.summary_error =
                    Some(format!("{SUMMARY_ERROR_PREFIX} {err} {SUMMARY_ERROR_SUFFIX}"));
            }
        }
        self.state.summary_loading = false;
        true
    }

    pub async fn summarize(&mut self) -> Transition {
        match self.begin_summary() {
            SummaryStart::Ignored => Transition::Ignored,
            SummaryStart::Ready => Transition::Moved(Screen::Summary),
            SummaryStart::Pending(ticket) => {
                let collaborator = Arc::clone(&self.collaborator);
                let outcome = collaborator.summarize(ticket.transcript()).await;
                self.complete_summary(ticket, outcome);
                Transition::Moved(Screen::Summary)
            }
        }
    }

    /// Marks the submission in flight. `None` when the submit control is disabled.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        if self.screen != Screen::Summary || !self.can_submit() {
            debug!(status = ?self.state.submission, "submission not allowed");
            return None;
        }
        let (role, site) = (self.state.role?, self.state.site?);
        self.state.submission = SubmissionStatus::Submitting;
        let payload = SubmissionPayload::new(
            role,
            site,
            self.state.summary.clone(),
            transcript::render_plain_text(&self.state.history),
        );
        Some(PendingSubmission {
            generation: self.generation,
            payload,
        })
    }

    pub fn complete_submission(
        &mut self,
        ticket: PendingSubmission,
        outcome: Result<(), CollaboratorError>,
    ) -> bool {
        if ticket.generation != self.generation || self.screen != Screen::Summary {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale submission response"
            );
            return false;
        }
        self.state.submission = match outcome {
            Ok(()) => {
                info!("feedback submitted");
                SubmissionStatus::Submitted
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                SubmissionStatus::Error(err.to_string())
            }
        };
        true
    }

    pub async fn submit(&mut self) -> &SubmissionStatus {
        if let Some(ticket) = self.begin_submission() {
            let collaborator = Arc::clone(&self.collaborator);
            let outcome = collaborator.submit(ticket.payload()).await;
            self.complete_submission(ticket, outcome);
        }
        &self.state.submission
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
