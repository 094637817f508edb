mod protocol;

pub mod logging;
pub mod presence;
pub mod sequencer;
pub mod settings;

pub use protocol::client::*;
pub use protocol::messages::*;
