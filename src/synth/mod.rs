// Purpose: Voice lifecycle and mixing
// This layer sits above graph nodes and owns everything the render thread touches

pub mod message;
pub mod mixer;
pub mod voice;

pub use mixer::{MasterBus, Mixer};
pub use voice::{Voice, VoiceState};
