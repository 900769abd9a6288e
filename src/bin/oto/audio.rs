//! Audio output: runs a voice inside the cpal callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Consumer;
use tracing::{error, info};

use oto_dsp::{host::render_block, sequencing::Score, voices::MmlBass, RenderCtx, MAX_BLOCK_SIZE};

/// Output device parameters chosen by the host.
pub struct OutputInfo {
    pub sample_rate: f32,
    pub channels: usize,
}

/// Default output device and its preferred configuration.
pub fn open_output() -> EyreResult<(cpal::Device, cpal::SupportedStreamConfig)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    Ok((device, config))
}

pub fn output_info(config: &cpal::SupportedStreamConfig) -> OutputInfo {
    OutputInfo {
        sample_rate: config.sample_rate().0 as f32,
        channels: config.channels() as usize,
    }
}

/// Start playing `bass`. New scores arriving on `scores` replace the
/// current one at the next callback. The stream stops when dropped.
pub fn start(
    device: &cpal::Device,
    config: cpal::SupportedStreamConfig,
    mut bass: MmlBass,
    mut scores: Consumer<Score>,
) -> EyreResult<cpal::Stream> {
    let info = output_info(&config);
    let channels = info.channels;
    let mut ctx = RenderCtx::new(info.sample_rate);

    info!(
        sample_rate = info.sample_rate,
        channels,
        "starting output stream"
    );

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                bass.mml_mut().poll_scores(&mut scores);

                // Render in bounded blocks so per-block work stays predictable.
                for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    render_block(&mut bass, &mut ctx, chunk, channels, &[]);
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;
    Ok(stream)
}
