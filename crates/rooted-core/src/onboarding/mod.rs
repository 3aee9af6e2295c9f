//! Onboarding: simulated account creation, avatar builder and mentor choice.
//!
//! Each step validates its input and writes onto a [`crate::UserProfile`];
//! persisting the profile is the caller's job (see
//! [`crate::storage::ProfileStore`]).

mod account;
mod avatar;
mod mentor;

pub use account::{
    log_in, sign_up, sso_profile, workplace_profile, LoginForm, NextStep, SignupForm,
    MIN_PASSWORD_LEN,
};
pub use avatar::{
    apply_avatar, AvatarConfig, SkinTone, StyleOption, ACCESSORIES, HAIR_STYLES, OUTFIT_STYLES,
    SKIN_TONES,
};
pub use mentor::{apply_mentor, find_mentor, Mentor, MentorRecord, MENTORS};
