use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkinTone {
    pub name: &'static str,
    /// Hex colour stored in the avatar config.
    pub value: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleOption {
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

const fn style(name: &'static str, emoji: &'static str, description: &'static str) -> StyleOption {
    StyleOption {
        name,
        emoji,
        description,
    }
}

pub const SKIN_TONES: [SkinTone; 5] = [
    SkinTone { name: "Light", value: "#F3D5B7", emoji: "🏻" },
    SkinTone { name: "Medium Light", value: "#E8B887", emoji: "🏼" },
    SkinTone { name: "Medium", value: "#C89664", emoji: "🏽" },
    SkinTone { name: "Medium Dark", value: "#A67C5A", emoji: "🏾" },
    SkinTone { name: "Dark", value: "#8B5A3C", emoji: "🏿" },
];

pub const HAIR_STYLES: [StyleOption; 5] = [
    style("Short", "👨‍🦲", ""),
    style("Wavy", "👨‍🦱", ""),
    style("Curly", "👨‍🦱", ""),
    style("Long", "👨‍🦰", ""),
    style("Bald", "👨‍🦲", ""),
];

pub const OUTFIT_STYLES: [StyleOption; 4] = [
    style("Professional", "👔", "Business attire"),
    style("Casual", "👕", "Everyday comfort"),
    style("Traditional", "🥻", "Indian ethnic wear"),
    style("Creative", "🎨", "Artistic expression"),
];

pub const ACCESSORIES: [StyleOption; 4] = [
    style("Glasses", "👓", ""),
    style("Watch", "⌚", ""),
    style("Earrings", "👂", ""),
    style("None", "✨", ""),
];

/// The avatar the user builds during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig {
    pub name: String,
    pub skin_tone: String,
    pub hair_style: String,
    pub outfit_style: String,
    pub accessory: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            skin_tone: SKIN_TONES[2].value.to_string(),
            hair_style: HAIR_STYLES[0].name.to_string(),
            outfit_style: OUTFIT_STYLES[0].name.to_string(),
            accessory: ACCESSORIES[3].name.to_string(),
        }
    }
}

fn check_option(
    kind: &'static str,
    value: &str,
    mut known: impl Iterator<Item = &'static str>,
) -> Result<(), ValidationError> {
    if known.any(|k| k == value) {
        Ok(())
    } else {
        Err(ValidationError::UnknownId {
            kind,
            id: value.to_string(),
        })
    }
}

impl AvatarConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        check_option("skin tone", &self.skin_tone, SKIN_TONES.iter().map(|t| t.value))?;
        check_option("hair style", &self.hair_style, HAIR_STYLES.iter().map(|s| s.name))?;
        check_option("outfit style", &self.outfit_style, OUTFIT_STYLES.iter().map(|s| s.name))?;
        check_option("accessory", &self.accessory, ACCESSORIES.iter().map(|s| s.name))?;
        Ok(())
    }

    pub fn skin_tone(&self) -> Option<&'static SkinTone> {
        SKIN_TONES.iter().find(|t| t.value == self.skin_tone)
    }

    pub fn outfit(&self) -> Option<&'static StyleOption> {
        OUTFIT_STYLES.iter().find(|o| o.name == self.outfit_style)
    }
}

/// Store the avatar on the profile and mark that onboarding step done.
pub fn apply_avatar(profile: &mut UserProfile, avatar: AvatarConfig) -> Result<(), ValidationError> {
    avatar.validate()?;
    profile.avatar = Some(avatar);
    profile.onboarding_step = Some("avatar-complete".to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_first_screen() {
        let avatar = AvatarConfig::default();
        assert_eq!(avatar.skin_tone, "#C89664");
        assert_eq!(avatar.hair_style, "Short");
        assert_eq!(avatar.outfit_style, "Professional");
        assert_eq!(avatar.accessory, "None");
        assert_eq!(avatar.skin_tone().unwrap().name, "Medium");
    }

    #[test]
    fn blank_name_rejected() {
        let mut profile = UserProfile::default();
        let err = apply_avatar(&mut profile, AvatarConfig::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
        assert!(profile.avatar.is_none());
    }

    #[test]
    fn unknown_option_rejected() {
        let avatar = AvatarConfig {
            name: "Asha".into(),
            outfit_style: "Spacesuit".into(),
            ..Default::default()
        };
        assert!(matches!(
            avatar.validate(),
            Err(ValidationError::UnknownId { kind: "outfit style", .. })
        ));
    }

    #[test]
    fn apply_sets_step() {
        let mut profile = UserProfile::default();
        let avatar = AvatarConfig {
            name: "Asha".into(),
            outfit_style: "Traditional".into(),
            ..Default::default()
        };
        apply_avatar(&mut profile, avatar).unwrap();
        assert_eq!(profile.onboarding_step.as_deref(), Some("avatar-complete"));
        assert_eq!(
            profile.avatar.as_ref().unwrap().outfit().unwrap().description,
            "Indian ethnic wear"
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(AvatarConfig::default()).unwrap();
        assert_eq!(json["skinTone"], "#C89664");
        assert_eq!(json["outfitStyle"], "Professional");
    }
}
