// WandWatch — TinyML demo firmware library
//
// Hardware-independent half of the firmware: the decimating sample window,
// the model facade, the demo state machines and plotting.  Everything here
// builds and tests on the host; the device drivers and FreeRTOS tasks live in
// the binary.

pub mod config;
pub mod demo;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod plot;
pub mod sample_window;
pub mod wand;

pub use error::{ModelError, SampleWindowError};
pub use sample_window::{SampleWindow, SampleWindowConfig};
