// WandWatch — Host Simulator
//
// Runs the demos without the board: one sine sweep, one regression run and a
// synthetic wand session (rest, then a stroke on each axis) fed through the
// gesture pipeline at the real raw sample rate.

use wandwatch::config::*;
use wandwatch::demo::{RegressionDemo, SineSweep};
use wandwatch::events::SensorData;
use wandwatch::wand::GesturePipeline;

const SINE_STEPS: u32 = 16;
const REST_SECONDS: f32 = 6.0;
const STROKE_SECONDS: f32 = 1.5;
const STROKE_PERIOD_SECONDS: f32 = 0.5;
const STROKE_AMPLITUDE_G: f32 = 1.2;

pub fn run() -> anyhow::Result<()> {
    log::info!("WandWatch host simulator");

    log::info!("-- {} demo --", wandwatch::events::DemoMode::Sine.title());
    let mut sweep = SineSweep::new(SINE_STEPS);
    for _ in 0..SINE_STEPS {
        sweep.step()?;
    }

    log::info!("-- {} demo --", wandwatch::events::DemoMode::Regression.title());
    let mut regression = RegressionDemo::seeded(0x5eed);
    regression.on_touch();
    let points = regression.run()?;
    let worst = points
        .iter()
        .map(|&(x, y)| (y - (REGRESSION_SLOPE * x + REGRESSION_INTERCEPT)).abs())
        .fold(0.0f32, f32::max);
    log::info!("{} points, worst residual {:.4}", points.len(), worst);

    log::info!("-- {} demo --", wandwatch::events::DemoMode::Wand.title());
    let mut pipeline = GesturePipeline::new()?;
    let rest = seconds_to_samples(REST_SECONDS);
    let stroke = seconds_to_samples(STROKE_SECONDS);

    let mut t = 0usize;
    for axis in 0..3 {
        for _ in 0..rest {
            feed(&mut pipeline, t, resting());
            t += 1;
        }
        for i in 0..stroke {
            feed(&mut pipeline, t, stroking(axis, i));
            t += 1;
        }
    }
    for _ in 0..rest {
        feed(&mut pipeline, t, resting());
        t += 1;
    }

    log::info!("Wand stats: {:?}", pipeline.stats());
    Ok(())
}

fn seconds_to_samples(seconds: f32) -> usize {
    (seconds * WAND_RAW_SAMPLE_RATE_HZ) as usize
}

fn feed(pipeline: &mut GesturePipeline, t: usize, data: SensorData) {
    if let Some(result) = pipeline.push(&data) {
        let at = t as f32 / WAND_RAW_SAMPLE_RATE_HZ;
        log::info!(
            "t={:.2}s  {} ({:.0}%)",
            at,
            result.gesture.display_name(),
            result.confidence * 100.0
        );
    }
}

fn resting() -> SensorData {
    SensorData {
        az: 1.0,
        ..SensorData::default()
    }
}

/// Sinusoidal stroke along one accelerometer axis on top of gravity.
fn stroking(axis: usize, i: usize) -> SensorData {
    let phase = i as f32 / (STROKE_PERIOD_SECONDS * WAND_RAW_SAMPLE_RATE_HZ);
    let swing = STROKE_AMPLITUDE_G * (2.0 * core::f32::consts::PI * phase).sin();
    let mut data = resting();
    match axis {
        0 => data.ax += swing,
        1 => data.ay += swing,
        _ => data.az += swing,
    }
    data
}
