use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed option set whose wire value is its display label.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labeled_enum!(
    /// Clinician category the respondent identifies as.
    UserRole {
        PhysicianNp => "Physician / NP",
        NursingStaff => "Nursing Staff",
        AlliedHealthPharmacy => "Allied Health and Pharmacy Staff",
    }
);

labeled_enum!(SiteArea {
    AkcNorth => "AKC North",
    AkcSouth => "AKC South",
});

labeled_enum!(SiteType {
    HospitalUnit => "Hospital Unit",
    UrbanSatellite => "Urban Satellite",
    RuralSatellite => "Rural Satellite",
    LongTermCareSite => "Long Term Care Site",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub area: SiteArea,
    #[serde(rename = "type")]
    pub kind: SiteType,
}

impl Site {
    pub fn new(area: SiteArea, kind: SiteType) -> Self {
        Self { area, kind }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.area, self.kind)
    }
}

/// Discussion subjects offered on the home screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Rounds,
    Labs,
    Transplant,
    NewPatient,
    Orders,
    Comm,
    Handover,
    Anemia,
    Other,
}

impl Topic {
    pub const ALL: &'static [Topic] = &[
        Topic::Rounds,
        Topic::Labs,
        Topic::Transplant,
        Topic::NewPatient,
        Topic::Orders,
        Topic::Comm,
        Topic::Handover,
        Topic::Anemia,
        Topic::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Topic::Rounds => "rounds",
            Topic::Labs => "labs",
            Topic::Transplant => "transplant",
            Topic::NewPatient => "new_patient",
            Topic::Orders => "orders",
            Topic::Comm => "comm",
            Topic::Handover => "handover",
            Topic::Anemia => "anemia",
            Topic::Other => "other",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Topic::Rounds => "Dialysis Rounds",
            Topic::Labs => "Lab Review",
            Topic::Transplant => "Transplant Status",
            Topic::NewPatient => "New Patient Starts",
            Topic::Orders => "Ordering Medications/Orders",
            Topic::Comm => "Unit/MD Communications",
            Topic::Handover => "Handover Issues",
            Topic::Anemia => "Anemia Protocol",
            Topic::Other => "Other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Topic::Rounds => "🔄",
            Topic::Labs => "🔬",
            Topic::Transplant => "⚕️",
            Topic::NewPatient => "🧑‍⚕️",
            Topic::Orders => "💊",
            Topic::Comm => "💬",
            Topic::Handover => "🤝",
            Topic::Anemia => "🩸",
            Topic::Other => "📋",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|topic| topic.id() == id)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Model,
}

/// One free-text statement. Feedback entries are always `MessageRole::User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Builds a feedback entry from raw input. Returns `None` for blank input.
    pub fn feedback(raw: &str) -> Option<Self> {
        let content = raw.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            role: MessageRole::User,
            content: content.to_string(),
        })
    }
}

/// A topic's closed-out batch of feedback. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewSession {
    topic: Topic,
    transcript: Vec<ChatMessage>,
}

impl InterviewSession {
    pub fn new(topic: Topic, transcript: Vec<ChatMessage>) -> Option<Self> {
        if transcript.is_empty() {
            return None;
        }
        Some(Self { topic, transcript })
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}
