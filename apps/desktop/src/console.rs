//! Line-oriented terminal front end over [`SessionController`].

use std::sync::Arc;

use client_core::{
    Collaborator, Screen, SessionController, SiteDraft, SubmissionStatus, TopicDraft, Transition,
    View,
};
use shared::domain::{SiteArea, SiteType, Topic, UserRole};

const PHI_REMINDER: &str = "Remember: Do not mention any patient names, medical record numbers, or other Personal Health Information (PHI).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pick(usize),
    Area(usize),
    Kind(usize),
    Next,
    Entry(String),
    Done,
    Summarize,
    Submit,
    NewSite,
    Back,
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interprets one input line for `screen`. On the topic screen any line that
/// is not a slash command is a feedback entry.
pub fn parse_command(screen: Screen, line: &str) -> Option<Command> {
    let line = line.trim();
    if screen == Screen::Topic {
        return match line {
            "" => None,
            "/done" => Some(Command::Done),
            "/restart" => Some(Command::Restart),
            "/quit" => Some(Command::Quit),
            text => Some(Command::Entry(text.to_string())),
        };
    }

    let lowered = line.to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("q" | "quit", None) => Command::Quit,
        ("b" | "back", None) => Command::Back,
        ("r" | "restart", None) => Command::Restart,
        ("s" | "summarize", None) if screen == Screen::Home => Command::Summarize,
        ("submit", None) if screen == Screen::Summary => Command::Submit,
        ("n" | "new-site", None) if screen == Screen::Summary => Command::NewSite,
        ("next", None) if screen == Screen::SiteSelection => Command::Next,
        ("area", Some(n)) if screen == Screen::SiteSelection => Command::Area(n.parse().ok()?),
        ("type", Some(n)) if screen == Screen::SiteSelection => Command::Kind(n.parse().ok()?),
        (n, None) => Command::Pick(n.parse().ok()?),
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

fn nth<T: Copy>(options: &[T], number: usize) -> Option<T> {
    number.checked_sub(1).and_then(|i| options.get(i)).copied()
}

fn submit_label(configured: bool, status: &SubmissionStatus) -> &'static str {
    if !configured {
        return "Submission Not Configured";
    }
    match status {
        SubmissionStatus::Idle => "Submit Anonymously",
        SubmissionStatus::Submitting => "Submitting...",
        SubmissionStatus::Submitted => "Submitted Successfully!",
        SubmissionStatus::Error(_) => "Error! Try Again.",
    }
}

pub struct Console {
    controller: SessionController,
    site_draft: SiteDraft,
    topic_draft: TopicDraft,
    notice: Option<String>,
}

impl Console {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            controller: SessionController::new(collaborator),
            site_draft: SiteDraft::default(),
            topic_draft: TopicDraft::default(),
            notice: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        self.notice = None;
        let transition = match command {
            Command::Quit => return Flow::Quit,
            Command::Restart => self.controller.restart(),
            Command::Back => self.controller.back(),
            Command::Pick(number) => self.pick(number),
            Command::Area(number) => {
                match nth(SiteArea::ALL, number) {
                    Some(area) => self.site_draft.area = Some(area),
                    None => self.note("No such site area."),
                }
                return Flow::Continue;
            }
            Command::Kind(number) => {
                match nth(SiteType::ALL, number) {
                    Some(kind) => self.site_draft.kind = Some(kind),
                    None => self.note("No such site type."),
                }
                return Flow::Continue;
            }
            Command::Next => {
                let transition = self.controller.select_site(&self.site_draft);
                if transition == Transition::Ignored {
                    self.note("Select both a site area and a site type.");
                    return Flow::Continue;
                }
                transition
            }
            Command::Entry(text) => {
                self.topic_draft.add(&text);
                return Flow::Continue;
            }
            Command::Done => {
                let entries = std::mem::take(&mut self.topic_draft).into_entries();
                self.controller.finish_topic(entries)
            }
            Command::Summarize => {
                if !self.controller.can_summarize() {
                    self.note("Discuss at least one topic before summarizing.");
                    return Flow::Continue;
                }
                self.controller.summarize().await
            }
            Command::Submit => {
                if !self.controller.can_submit() {
                    self.note("Submission is not available right now.");
                    return Flow::Continue;
                }
                self.controller.submit().await;
                Transition::Moved(Screen::Summary)
            }
            Command::NewSite => self.controller.restart_for_new_site(),
        };

        match transition {
            Transition::Moved(Screen::SiteSelection) => self.site_draft = SiteDraft::default(),
            Transition::Moved(Screen::Topic) => self.topic_draft = TopicDraft::default(),
            Transition::Moved(_) => {}
            Transition::Ignored => self.note("That option is not available here."),
        }
        Flow::Continue
    }

    fn pick(&mut self, number: usize) -> Transition {
        match self.controller.screen() {
            Screen::RoleSelection => match nth(UserRole::ALL, number) {
                Some(role) => self.controller.select_role(role),
                None => Transition::Ignored,
            },
            Screen::Home => match nth(Topic::ALL, number) {
                Some(topic) => self.controller.open_topic(topic),
                None => Transition::Ignored,
            },
            _ => Transition::Ignored,
        }
    }

    pub fn render(&mut self) -> String {
        let configured = self.controller.endpoint_configured();
        let discussed = self.controller.state().history.len();
        let mut out: Vec<String> = vec![String::new()];

        match self.controller.view() {
            View::RoleSelection => {
                out.push("== Feedback on Hemodialysis Workflows ==".into());
                out.push("All responses are ANONYMOUS. No identifying data is collected or stored.".into());
                out.push("DO NOT mention any patient names, medical record numbers, or other Personal Health Information (PHI).".into());
                out.push(String::new());
                out.push("First, please select your role:".into());
                for (i, role) in UserRole::ALL.iter().enumerate() {
                    out.push(format!("  {}. {role}", i + 1));
                }
                out.push("Commands: <number> select | q quit".into());
            }
            View::SiteSelection => {
                out.push("== Select Your Work Site ==".into());
                out.push("Site Area:".into());
                for (i, area) in SiteArea::ALL.iter().enumerate() {
                    let mark = if self.site_draft.area == Some(*area) { "*" } else { " " };
                    out.push(format!(" {mark}{}. {area}", i + 1));
                }
                out.push("Site Type:".into());
                for (i, kind) in SiteType::ALL.iter().enumerate() {
                    let mark = if self.site_draft.kind == Some(*kind) { "*" } else { " " };
                    out.push(format!(" {mark}{}. {kind}", i + 1));
                }
                out.push("Commands: area <n> | type <n> | next | b back | r restart | q quit".into());
            }
            View::Home {
                role,
                site,
                can_summarize,
            } => {
                out.push(format!("Role: {role}"));
                out.push(format!("Site: {site}"));
                out.push(format!("Topics discussed: {discussed}"));
                out.push(String::new());
                out.push("Select a topic to discuss:".into());
                for (i, topic) in Topic::ALL.iter().enumerate() {
                    out.push(format!("  {}. {} {}", i + 1, topic.emoji(), topic.name()));
                }
                out.push(PHI_REMINDER.into());
                let summarize = if can_summarize { " | s summarize" } else { "" };
                out.push(format!(
                    "Commands: <number> open topic{summarize} | b back | r restart | q quit"
                ));
            }
            View::Topic { topic } => {
                out.push(format!("== {} {} ==", topic.emoji(), topic.name()));
                out.push(format!(
                    "Please enter your feedback about {} below. You can add multiple points.",
                    topic.name()
                ));
                out.push("Your Feedback on This Topic:".into());
                let entries = self.topic_draft.entries();
                if entries.is_empty() {
                    out.push("  Your submitted feedback will appear here.".into());
                }
                for entry in entries {
                    out.push(format!("  - {}", entry.content));
                }
                out.push("Commands: <text> add feedback | /done finish topic | /restart | /quit".into());
            }
            View::Summary {
                role,
                site,
                sessions,
                summary,
                loading,
                error,
                submission,
                can_submit,
            } => {
                out.push("== Feedback Summary ==".into());
                out.push(format!("Role: {role}"));
                out.push(format!("Site: {site}"));
                out.push(String::new());
                out.push("Summary of Pain Points".into());
                match (loading, error) {
                    (true, _) => out.push("  Generating summary...".into()),
                    (false, Some(error)) => out.push(format!("  {error}")),
                    (false, None) => out.extend(summary.lines().map(|line| format!("  {line}"))),
                }
                out.push(String::new());
                out.push("Full Transcript".into());
                if sessions.is_empty() {
                    out.push("  No conversation transcript available.".into());
                }
                for session in sessions {
                    let topic = session.topic();
                    out.push(format!("  {} {}", topic.emoji(), topic.name()));
                    for entry in session.transcript() {
                        out.push(format!("    User: {}", entry.content));
                    }
                }
                out.push(String::new());
                out.push(format!("[{}]", submit_label(configured, submission)));
                if !configured {
                    out.push("Note to admin: set endpoint_url in client.toml or FEEDBACK_ENDPOINT_URL to enable submissions.".into());
                }
                if let SubmissionStatus::Error(message) = submission {
                    out.push(format!("Submission Failed: {message}"));
                }
                let mut commands = Vec::new();
                if can_submit {
                    commands.push("submit");
                }
                if *submission == SubmissionStatus::Submitted {
                    commands.push("n feedback for another site");
                }
                commands.extend(["b back", "r start over", "q quit"]);
                out.push(format!("Commands: {}", commands.join(" | ")));
            }
        }

        if let Some(notice) = &self.notice {
            out.push(format!("! {notice}"));
        }
        out.push(String::new());
        out.join("\n")
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
