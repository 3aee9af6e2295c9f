mod driver;
mod record;
mod session;
mod technique;

pub use driver::BreathingDriver;
pub use record::SessionRecord;
pub use session::{BreathingSession, SessionState};
pub use technique::{
    find_technique, find_technique_by_name, Technique, ZeroPhasePolicy, PHASES, TECHNIQUES,
};
