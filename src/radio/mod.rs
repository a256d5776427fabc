/// Radio operating mode
pub mod mode;
/// Driver shared with the radio interrupt
pub mod shared;
/// Radio driver interface
pub mod traits;

pub use mode::{RadioMode, RadioState};
pub use shared::{SharedRadio, SharedRadioHandle};
pub use traits::{RadioDriver, Retries};
