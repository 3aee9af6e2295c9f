//! Wellness prompts layered over [`AiClient::generate_chat_response`].
//!
//! Prompt text is built by plain functions so it can be checked without a
//! server; the `AiClient` methods just send it.

use indoc::{formatdoc, indoc};
use serde::Serialize;
use serde_json::Value;

use super::client::{AiClient, ChatMessage};
use crate::assessment::AssessmentResults;
use crate::error::AiError;
use crate::onboarding::MentorRecord;
use crate::profile::UserProfile;

/// How many daily logs the stress analysis looks at.
pub const STRESS_LOG_WINDOW: usize = 30;

/// System prompt plus user message for one helper call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

pub fn recommendations_prompt(profile: &UserProfile, mood: Option<&str>) -> Prompt {
    let name = profile
        .avatar
        .as_ref()
        .map(|a| a.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("User");
    let mentor = profile.mentor.as_ref().map_or("None", |m| m.name.as_str());
    let (physical, mental, emotional, stress) = profile
        .assessment_results
        .as_ref()
        .map_or((0, 0, 0, 0), |r| {
            (r.burnout.physical, r.burnout.mental, r.burnout.emotional, r.stress)
        });
    let mood = mood.filter(|m| !m.trim().is_empty()).unwrap_or("Not specified");

    Prompt {
        system: indoc! {"
            You are a compassionate AI wellness coach specializing in workplace burnout recovery.
            You provide personalized, culturally-aware recommendations for Indian professionals.
            Focus on practical, evidence-based interventions that can be done in 5-10 minutes during work hours.
            Always be supportive, understanding, and provide specific actionable advice."}
        .to_string(),
        user: formatdoc! {"
            User Profile:
            - Name: {name}
            - Mentor Animal: {mentor}
            - Burnout Scores: Physical {physical}%, Mental {mental}%, Emotional {emotional}%
            - Stress Level: {stress}%
            - Current Mood: {mood}

            Please provide 3 specific, personalized recommendations for today based on this data.
            Focus on Indian workplace culture and include practical tips they can implement immediately.
            Keep recommendations brief and actionable."},
    }
}

pub fn mentor_dialogue_prompt(mentor: &MentorRecord, user_state: &Value, context: Option<&str>) -> Prompt {
    let traits = if mentor.traits.is_empty() {
        "supportive, wise".to_string()
    } else {
        mentor.traits.join(", ")
    };
    let context = context.unwrap_or("daily_checkin");
    let state = pretty(user_state);
    let (name, personality, emoji) = (&mentor.name, &mentor.personality, &mentor.emoji);

    Prompt {
        system: formatdoc! {"
            You are {name}, a {personality} animal mentor.
            Your role is to provide supportive, encouraging dialogue in the character's voice.
            Personality traits: {traits}
            Keep responses under 100 words, use the character's emoji, and maintain their unique voice.
            Be culturally sensitive to Indian workplace contexts."},
        user: formatdoc! {"
            Context: {context}
            User's current state: {state}

            Provide a supportive message as {name} would say it.
            Use {emoji} and speak in character."},
    }
}

/// Only the newest [`STRESS_LOG_WINDOW`] daily logs are included.
pub fn stress_patterns_prompt(daily_logs: &[Value], history: &[AssessmentResults]) -> Prompt {
    let recent = &daily_logs[daily_logs.len().saturating_sub(STRESS_LOG_WINDOW)..];
    let logs = pretty(recent);
    let history = pretty(history);

    Prompt {
        system: indoc! {"
            You are an expert in workplace stress analysis and burnout recovery.
            Analyze the provided data to identify patterns, triggers, and provide actionable insights.
            Focus on practical recommendations for Indian professionals dealing with workplace stress.
            Be encouraging and provide hope while being realistic about challenges."}
        .to_string(),
        user: formatdoc! {"
            Daily Mood/Energy Logs (last 30 days):
            {logs}

            Assessment History:
            {history}

            Please provide:
            1. Key stress patterns identified
            2. Potential triggers or risk factors
            3. Positive trends or improvements
            4. 3 specific recommendations for the upcoming week
            Keep the analysis encouraging and actionable."},
    }
}

pub fn meditation_prompt(kind: &str, minutes: u32, needs: &[String]) -> Prompt {
    let needs = needs.join(", ");
    Prompt {
        system: formatdoc! {"
            You are an expert meditation teacher creating personalized guided meditation scripts.
            Create a {minutes}-minute {kind} meditation specifically addressing: {needs}.
            Format as a complete script with timing cues, gentle guidance, and soothing language.
            Include culturally relevant elements for Indian practitioners when appropriate."},
        user: formatdoc! {"
            Create a {minutes}-minute guided {kind} meditation script.
            Focus areas: {needs}
            Include proper timing, breathing cues, and gentle transitions.
            Make it suitable for workplace stress relief."},
    }
}

pub fn journal_prompt(text: &str, profile: &UserProfile) -> Prompt {
    let mentor = profile.mentor.as_ref().map_or("No mentor", |m| m.name.as_str());
    Prompt {
        system: indoc! {"
            You are a compassionate AI companion helping with self-reflection and emotional processing.
            Read the user's journal entry and provide gentle, supportive insights.
            Help them identify emotions, patterns, and potential positive actions.
            Be encouraging and non-judgmental, offering hope and practical suggestions when appropriate.
            Keep responses warm, personal, and under 150 words."}
        .to_string(),
        user: formatdoc! {r#"
            User's journal entry: "{text}"
            User context: {mentor} is their guide.

            Provide supportive reflection and gentle insights to help them process their thoughts and feelings."#},
    }
}

impl AiClient {
    async fn send_prompt(&self, prompt: Prompt) -> Result<String, AiError> {
        self.generate_chat_response(vec![ChatMessage::user(prompt.user)], None, Some(prompt.system.as_str()))
            .await
    }

    /// Three short recommendations for today.
    pub async fn recommendations(&self, profile: &UserProfile, mood: Option<&str>) -> Result<String, AiError> {
        self.send_prompt(recommendations_prompt(profile, mood)).await
    }

    pub async fn mentor_dialogue(
        &self,
        mentor: &MentorRecord,
        user_state: &Value,
        context: Option<&str>,
    ) -> Result<String, AiError> {
        self.send_prompt(mentor_dialogue_prompt(mentor, user_state, context))
            .await
    }

    pub async fn analyze_stress_patterns(
        &self,
        daily_logs: &[Value],
        history: &[AssessmentResults],
    ) -> Result<String, AiError> {
        self.send_prompt(stress_patterns_prompt(daily_logs, history))
            .await
    }

    pub async fn meditation_script(&self, kind: &str, minutes: u32, needs: &[String]) -> Result<String, AiError> {
        self.send_prompt(meditation_prompt(kind, minutes, needs)).await
    }

    pub async fn journal_reflection(&self, text: &str, profile: &UserProfile) -> Result<String, AiError> {
        self.send_prompt(journal_prompt(text, profile)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::BurnoutScores;
    use crate::onboarding::{find_mentor, AvatarConfig};
    use crate::storage::AiConfig;
    use chrono::Utc;
    use mockito::Matcher;
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile {
            avatar: Some(AvatarConfig {
                name: "Asha".into(),
                ..Default::default()
            }),
            mentor: Some(find_mentor("elephant").unwrap().to_record()),
            assessment_results: Some(AssessmentResults {
                burnout: BurnoutScores {
                    physical: 58,
                    mental: 42,
                    emotional: 25,
                },
                stress: 65,
                completed_at: Utc::now(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn recommendations_fill_in_scores() {
        let prompt = recommendations_prompt(&profile(), Some("tired"));
        assert!(prompt.user.starts_with("User Profile:\n- Name: Asha\n"));
        assert!(prompt.user.contains("Mentor Animal: Gentle Elephant"));
        assert!(prompt.user.contains("Physical 58%, Mental 42%, Emotional 25%"));
        assert!(prompt.user.contains("Stress Level: 65%"));
        assert!(prompt.user.contains("Current Mood: tired"));
        assert!(prompt.system.starts_with("You are a compassionate AI wellness coach"));
    }

    #[test]
    fn recommendations_defaults_for_empty_profile() {
        let prompt = recommendations_prompt(&UserProfile::default(), None);
        assert!(prompt.user.contains("- Name: User\n"));
        assert!(prompt.user.contains("Mentor Animal: None"));
        assert!(prompt.user.contains("Physical 0%, Mental 0%, Emotional 0%"));
        assert!(prompt.user.contains("Current Mood: Not specified"));
    }

    #[test]
    fn mentor_dialogue_in_character() {
        let mentor = find_mentor("owl").unwrap().to_record();
        let prompt = mentor_dialogue_prompt(&mentor, &json!({ "mood": "low" }), None);
        assert!(prompt.system.starts_with("You are Wise Owl, a Wise & Analytical animal mentor."));
        assert!(prompt.system.contains("Personality traits: Strategic thinking, Pattern recognition"));
        assert!(prompt.user.starts_with("Context: daily_checkin\n"));
        assert!(prompt.user.contains("Use 🦉 and speak in character."));
    }

    #[test]
    fn stress_analysis_uses_last_thirty_logs() {
        let logs: Vec<Value> = (0..45).map(|day| json!({ "day": day })).collect();
        let prompt = stress_patterns_prompt(&logs, &[]);
        assert!(!prompt.user.contains("\"day\": 14\n"));
        assert!(prompt.user.contains("\"day\": 15\n"));
        assert!(prompt.user.contains("\"day\": 44\n"));
        assert_eq!(prompt.user.matches("\"day\"").count(), STRESS_LOG_WINDOW);
    }

    #[test]
    fn meditation_and_journal() {
        let needs = vec!["focus".to_string(), "calm".to_string()];
        let prompt = meditation_prompt("mindfulness", 10, &needs);
        assert!(prompt.system.contains("Create a 10-minute mindfulness meditation specifically addressing: focus, calm."));

        let prompt = journal_prompt("long day", &UserProfile::default());
        assert!(prompt.user.starts_with("User's journal entry: \"long day\""));
        assert!(prompt.user.contains("No mentor is their guide."));
    }

    #[tokio::test]
    async fn journal_reflection_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex("compassionate AI companion".into()))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Breathe, Asha."}}]}"#)
            .create_async()
            .await;
        let client = AiClient::from_config(&AiConfig {
            endpoint: format!("{}/chat/completions", server.url()),
            ..Default::default()
        })
        .unwrap();

        let reply = client.journal_reflection("long day", &profile()).await.unwrap();
        assert_eq!(reply, "Breathe, Asha.");
        mock.assert_async().await;
    }
}
