pub mod network;

pub use network::{HiddenErrorSource, Network};
