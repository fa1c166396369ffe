mod instruction;
mod item;
mod session;

pub use instruction::Instruction;
pub use item::{DialogueItem, VoiceMapping};
pub use session::{AudioClip, SessionSnapshot, SessionStatus, SessionSummary, file_name};
