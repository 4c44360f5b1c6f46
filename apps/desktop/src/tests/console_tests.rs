use super::*;
use async_trait::async_trait;
use client_core::{connect_collaborator, CollaboratorError};
use shared::{domain::ChatMessage, protocol::SubmissionPayload};

struct StubCollaborator;

#[async_trait]
impl Collaborator for StubCollaborator {
    async fn summarize(&self, transcript: &[ChatMessage]) -> Result<String, CollaboratorError> {
        Ok(format!("- {} pain points", transcript.len()))
    }

    async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

async fn run(console: &mut Console, lines: &[&str]) {
    for line in lines {
        let command = parse_command(console.screen(), line).expect("command");
        assert_eq!(console.handle(command).await, Flow::Continue);
        console.render();
    }
}

#[test]
fn parses_commands_per_screen() {
    assert_eq!(parse_command(Screen::RoleSelection, " 2 "), Some(Command::Pick(2)));
    assert_eq!(parse_command(Screen::RoleSelection, "Q"), Some(Command::Quit));
    assert_eq!(parse_command(Screen::SiteSelection, "area 1"), Some(Command::Area(1)));
    assert_eq!(parse_command(Screen::SiteSelection, "type 4"), Some(Command::Kind(4)));
    assert_eq!(parse_command(Screen::SiteSelection, "type x"), None);
    assert_eq!(parse_command(Screen::Home, "s"), Some(Command::Summarize));
    assert_eq!(parse_command(Screen::Summary, "s"), None);
    assert_eq!(parse_command(Screen::Summary, "submit"), Some(Command::Submit));
    assert_eq!(parse_command(Screen::Home, "area 1"), None);
    assert_eq!(parse_command(Screen::Home, "1 2"), None);
}

#[test]
fn topic_screen_treats_plain_lines_as_feedback() {
    assert_eq!(
        parse_command(Screen::Topic, "  q  "),
        Some(Command::Entry("q".into()))
    );
    assert_eq!(parse_command(Screen::Topic, "/done"), Some(Command::Done));
    assert_eq!(parse_command(Screen::Topic, "   "), None);
}

#[tokio::test]
async fn walks_from_role_to_submitted_summary() {
    let mut console = Console::new(Arc::new(StubCollaborator));
    run(
        &mut console,
        &["1", "area 2", "type 3", "next", "2", "late results", "no callback", "/done", "s"],
    )
    .await;

    assert_eq!(console.screen(), Screen::Summary);
    let summary = console.render();
    assert!(summary.contains("Role: Physician / NP"));
    assert!(summary.contains("Site: AKC South - Rural Satellite"));
    assert!(summary.contains("- 2 pain points"));
    assert!(summary.contains("    User: late results"));
    assert!(summary.contains("[Submit Anonymously]"));

    run(&mut console, &["submit"]).await;
    assert_eq!(
        console.controller().state().submission,
        SubmissionStatus::Submitted
    );
    let rendered = console.render();
    assert!(rendered.contains("[Submitted Successfully!]"));
    assert!(rendered.contains("n feedback for another site"));

    run(&mut console, &["n"]).await;
    assert_eq!(console.screen(), Screen::SiteSelection);
    assert_eq!(
        console.controller().state().role,
        Some(UserRole::PhysicianNp)
    );
}

#[tokio::test]
async fn incomplete_site_is_rejected_with_notice() {
    let mut console = Console::new(Arc::new(StubCollaborator));
    run(&mut console, &["3", "area 1", "next"]).await;

    assert_eq!(console.screen(), Screen::SiteSelection);
    let rendered = console.render();
    assert!(rendered.contains("! Select both a site area and a site type."));
    assert!(rendered.contains(" *1. AKC North"));
}

#[tokio::test]
async fn summarize_requires_a_discussed_topic() {
    let mut console = Console::new(Arc::new(StubCollaborator));
    run(&mut console, &["1", "area 1", "type 1", "next", "4", "/done"]).await;

    assert!(!console.render().contains("s summarize"));
    run(&mut console, &["s"]).await;
    assert_eq!(console.screen(), Screen::Home);
    assert!(console
        .render()
        .contains("Discuss at least one topic before summarizing."));
}

#[tokio::test]
async fn unconfigured_endpoint_shows_admin_note() {
    let collaborator = connect_collaborator(None).expect("collaborator");
    let mut console = Console::new(collaborator);
    run(&mut console, &["2", "area 1", "type 2", "next", "1", "rounds run late", "/done", "s"]).await;

    let rendered = console.render();
    assert!(rendered.contains("Sorry, there was an error generating the summary."));
    assert!(rendered.contains("[Submission Not Configured]"));
    assert!(rendered.contains("Note to admin"));
    assert!(!rendered.contains("Commands: submit"));
}

#[tokio::test]
async fn quit_ends_the_loop() {
    let mut console = Console::new(Arc::new(StubCollaborator));
    assert_eq!(console.handle(Command::Quit).await, Flow::Quit);
}
