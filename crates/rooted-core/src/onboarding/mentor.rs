use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::profile::UserProfile;

/// An animal guide from the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mentor {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub personality: &'static str,
    pub description: &'static str,
    pub traits: &'static [&'static str],
    pub greetings: &'static [&'static str],
}

pub const MENTORS: [Mentor; 6] = [
    Mentor {
        id: "owl",
        name: "Wise Owl",
        emoji: "🦉",
        personality: "Wise & Analytical",
        description: "Deep thinker who provides thoughtful insights and helps you analyze patterns in your stress and behavior.",
        traits: &["Strategic thinking", "Pattern recognition", "Mindful reflection", "Long-term planning"],
        greetings: &[
            "Hoot! Let's take a moment to reflect on your day.",
            "Wisdom comes from understanding patterns. What are you noticing?",
            "Your mind is like a vast library - let's organize those thoughts.",
        ],
    },
    Mentor {
        id: "dolphin",
        name: "Playful Dolphin",
        emoji: "🐬",
        personality: "Joyful & Social",
        description: "Energetic companion who brings lightness and social connection to your wellness journey.",
        traits: &["Emotional intelligence", "Social connection", "Playfulness", "Stress relief"],
        greetings: &[
            "Splash! Ready to dive into some joy today?",
            "Life's waves are easier to ride together - how can I support you?",
            "Let's make some positive waves in your day!",
        ],
    },
    Mentor {
        id: "dog",
        name: "Loyal Dog",
        emoji: "🐕",
        personality: "Supportive & Encouraging",
        description: "Your faithful companion who offers unconditional support and celebrates every small victory.",
        traits: &["Loyalty", "Encouragement", "Consistency", "Emotional support"],
        greetings: &[
            "Woof! I'm here for you, always. How are you feeling?",
            "Every step forward is worth celebrating - you're doing great!",
            "Your loyal friend is here. What do you need today?",
        ],
    },
    Mentor {
        id: "elephant",
        name: "Gentle Elephant",
        emoji: "🐘",
        personality: "Calm & Grounding",
        description: "Steady presence who helps you stay grounded and provides strength during challenging times.",
        traits: &["Inner strength", "Grounding", "Stability", "Memory & reflection"],
        greetings: &[
            "Take a deep breath. I'm here to help you find your center.",
            "Strength comes from within. Let's build yours together.",
            "Like ancient trees, we find peace in staying rooted.",
        ],
    },
    Mentor {
        id: "butterfly",
        name: "Transforming Butterfly",
        emoji: "🦋",
        personality: "Inspiring & Transformative",
        description: "Guide for personal transformation who helps you embrace change and discover your potential.",
        traits: &["Transformation", "Growth mindset", "Creativity", "Adaptation"],
        greetings: &[
            "Beautiful changes await you. Let's explore them together.",
            "Every day is a chance to spread your wings a little wider.",
            "Transformation is natural - you're exactly where you need to be.",
        ],
    },
    Mentor {
        id: "turtle",
        name: "Patient Turtle",
        emoji: "🐢",
        personality: "Patient & Mindful",
        description: "Teaches the art of slow living and helps you find peace in patience and mindful presence.",
        traits: &["Patience", "Mindfulness", "Slow living", "Sustainable habits"],
        greetings: &[
            "Slow and steady wins the race. What small step can we take today?",
            "There's wisdom in moving at your own pace.",
            "Let's practice being present in this moment.",
        ],
    },
];

pub fn find_mentor(id: &str) -> Option<&'static Mentor> {
    MENTORS.iter().find(|m| m.id == id)
}

impl Mentor {
    /// Pick one of this mentor's greetings.
    pub fn random_greeting<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.greetings.choose(rng).copied().unwrap_or_default()
    }

    pub fn to_record(&self) -> MentorRecord {
        MentorRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            emoji: self.emoji.to_string(),
            personality: self.personality.to_string(),
            description: self.description.to_string(),
            traits: self.traits.iter().map(|t| t.to_string()).collect(),
            greetings: self.greetings.iter().map(|g| g.to_string()).collect(),
            extra: Map::new(),
        }
    }
}

/// The mentor as copied into the stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorRecord {
    pub id: String,
    pub name: String,
    pub emoji: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub greetings: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Assign a catalog mentor to the profile.
pub fn apply_mentor(profile: &mut UserProfile, mentor_id: &str) -> Result<(), ValidationError> {
    if mentor_id.trim().is_empty() {
        return Err(ValidationError::MissingField("mentor"));
    }
    let mentor = find_mentor(mentor_id).ok_or_else(|| ValidationError::UnknownId {
        kind: "mentor",
        id: mentor_id.to_string(),
    })?;
    profile.mentor = Some(mentor.to_record());
    profile.onboarding_step = Some("mentor-complete".to_string());
    Ok(())
}
