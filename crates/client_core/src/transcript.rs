use shared::domain::{ChatMessage, InterviewSession};

/// All feedback entries across sessions, in the order they were collected.
pub fn flatten(sessions: &[InterviewSession]) -> Vec<ChatMessage> {
    sessions
        .iter()
        .flat_map(|session| session.transcript().iter().cloned())
        .collect()
}

/// Plain-text block grouped by topic, as stored alongside a submission.
pub fn render_plain_text(sessions: &[InterviewSession]) -> String {
    let mut text = String::new();
    for session in sessions {
        text.push_str("Topic: ");
        text.push_str(session.topic().name());
        text.push_str("\n--------------------\n");
        for message in session.transcript() {
            text.push_str("User: ");
            text.push_str(&message.content);
            text.push('\n');
        }
        text.push('\n');
    }
    text
}
