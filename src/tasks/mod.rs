// WandWatch — FreeRTOS tasks (one std::thread each)

pub mod sensor;
pub mod ui;
pub mod wand;
