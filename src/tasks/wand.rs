// WandWatch — Magic Wand Task
//
// Drains the sensor channel into the gesture pipeline and forwards every
// recognised gesture to the UI task.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use wandwatch::events::{SensorData, UiEvent};
use wandwatch::wand::GesturePipeline;

const STATS_INTERVAL: Duration = Duration::from_secs(30);

pub fn wand_task(sensor_rx: Receiver<SensorData>, ui_tx: Sender<UiEvent>) -> anyhow::Result<()> {
    log::info!("Wand task started");

    let mut pipeline = GesturePipeline::new()?;
    log::info!(
        "Keeping 1 in {} accelerometer samples, window of {} tuples",
        pipeline.window().decimation_factor(),
        pipeline.window().window_tuples()
    );

    let mut last_stats = Instant::now();

    // Block until a sensor sample arrives; the channel closing ends the task.
    for data in sensor_rx.iter() {
        if let Some(result) = pipeline.push(&data) {
            if ui_tx.send(UiEvent::Gesture(result)).is_err() {
                log::warn!("UI channel closed — exiting wand task");
                return Ok(());
            }
        }

        if last_stats.elapsed() >= STATS_INTERVAL {
            log::info!("Wand stats: {:?}", pipeline.stats());
            last_stats = Instant::now();
        }
    }

    log::warn!("Sensor channel closed — exiting wand task");
    Ok(())
}
