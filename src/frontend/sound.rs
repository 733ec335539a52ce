use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::error;

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.2;

/// A 440 Hz tone that plays whenever the shared gate is set.
///
/// The output stream runs for the lifetime of the value; toggling the gate
/// only changes what the callback writes.
pub struct Sound {
    gate: Arc<AtomicBool>,
    _stream: cpal::Stream,
}

impl Sound {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let mut supported_configs_range = device
            .supported_output_configs()
            .context("error while querying configs")?;
        let supported_config = supported_configs_range
            .next()
            .ok_or_else(|| anyhow!("no supported output config"))?
            .with_max_sample_rate();
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let gate = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => build::<i8>(&device, &config, &gate),
            cpal::SampleFormat::I16 => build::<i16>(&device, &config, &gate),
            cpal::SampleFormat::I32 => build::<i32>(&device, &config, &gate),
            cpal::SampleFormat::I64 => build::<i64>(&device, &config, &gate),
            cpal::SampleFormat::U8 => build::<u8>(&device, &config, &gate),
            cpal::SampleFormat::U16 => build::<u16>(&device, &config, &gate),
            cpal::SampleFormat::U32 => build::<u32>(&device, &config, &gate),
            cpal::SampleFormat::U64 => build::<u64>(&device, &config, &gate),
            cpal::SampleFormat::F32 => build::<f32>(&device, &config, &gate),
            cpal::SampleFormat::F64 => build::<f64>(&device, &config, &gate),
            sample_format => return Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.play().context("failed to start audio stream")?;

        Ok(Self {
            gate,
            _stream: stream,
        })
    }

    /// Handle the CPU thread uses to switch the tone on and off.
    pub fn gate(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.gate)
    }
}

/// Drives the tone gate from the machine's sound edges: on once a step
/// loads the sound timer, off on the tick that runs it out.
pub struct ToneSwitch {
    gate: Arc<AtomicBool>,
    on: bool,
}

impl ToneSwitch {
    pub fn new(gate: Arc<AtomicBool>) -> Self {
        gate.store(false, Ordering::Relaxed);
        Self { gate, on: false }
    }

    /// `sound_active` as read right after a step. FX18 with zero also
    /// silences a running tone.
    pub fn after_step(&mut self, sound_active: bool) {
        if sound_active != self.on {
            self.set(sound_active);
        }
    }

    /// `expired` is the beep-off edge returned by `tick_timers`.
    pub fn after_tick(&mut self, expired: bool) {
        if expired {
            self.set(false);
        }
    }

    fn set(&mut self, on: bool) {
        self.on = on;
        self.gate.store(on, Ordering::Relaxed);
    }
}

impl Drop for ToneSwitch {
    fn drop(&mut self) {
        self.gate.store(false, Ordering::Relaxed);
    }
}

fn build<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    gate: &Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let gate = Arc::clone(gate);

    let mut sample_clock = 0f32;
    let mut next_value = move || {
        sample_clock = (sample_clock + 1.0) % sample_rate;
        if gate.load(Ordering::Relaxed) {
            VOLUME * (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
        } else {
            0.0
        }
    };

    let err_fn = |err| error!("an error occurred on stream: {}", err);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )
        .context("failed to build output stream")
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
