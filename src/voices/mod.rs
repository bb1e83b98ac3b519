//! Turns a `SynthesisRecipe` into a ready-to-render `Voice`.
//!
//! One generic builder serves every sound: the recipe says which source to
//! start from and which filters to chain, and the builder wires the same
//! graph nodes together for each of the voice's output channels.
//!
//! # Example
//!
//! ```ignore
//! use soundscape_dsp::{dsp::noise::NoiseGenerator, voices, EngineConfig, SoundId};
//!
//! let config = EngineConfig::default();
//! let mut noise = NoiseGenerator::new(7);
//! let voice = voices::build_voice(SoundId::Ocean, 1, &config, 48_000.0, &mut noise);
//! ```

use std::sync::Arc;

use crate::{
    dsp::noise::NoiseGenerator,
    engine::EngineConfig,
    graph::{
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        lfo::LfoNode,
        noise::NoiseNode,
        oscillator::OscNode,
        GraphNode,
    },
    sound::{FilterStage, OscSpec, SoundId, SourceKind, SynthesisRecipe},
    synth::voice::{Voice, VOICE_CHANNELS},
};

/// Build a voice for `id` at `sample_rate`.
///
/// Noise sources get a fresh stereo buffer of `config.loop_seconds`; each
/// channel plays its own decorrelated stream. Allocates; call it off the
/// render thread.
pub fn build_voice(
    id: SoundId,
    generation: u64,
    config: &EngineConfig,
    sample_rate: f32,
    noise: &mut NoiseGenerator,
) -> Voice {
    let recipe = id.recipe();

    let channels: Vec<Box<dyn GraphNode>> = match recipe.source {
        SourceKind::Noise(color) => {
            let buffer = noise.generate(color, config.loop_seconds, sample_rate, VOICE_CHANNELS);
            buffer
                .channels()
                .iter()
                .map(|samples| channel_graph(recipe, noise_source(recipe, samples.clone())))
                .collect()
        }
        SourceKind::Oscillators(specs) => (0..VOICE_CHANNELS)
            .map(|_| channel_graph(recipe, oscillator_bank(specs)))
            .collect(),
    };

    Voice::new(id, generation, channels, sample_rate, config.fades())
}

fn noise_source(recipe: &SynthesisRecipe, samples: Arc<[f32]>) -> Box<dyn GraphNode> {
    NoiseNode::new(samples, recipe.looped).boxed()
}

/// Equal-weight sum of every oscillator in the bank.
fn oscillator_bank(specs: &[OscSpec]) -> Box<dyn GraphNode> {
    let mut oscillators = specs.iter().map(|spec| {
        OscNode::new(spec.waveform, spec.frequency).with_detune(spec.detune_cents)
    });

    let Some(first) = oscillators.next() else {
        return NoiseNode::looped(Arc::from(Vec::<f32>::new())).boxed();
    };

    // Mixing the n-th source in at 1/n keeps every source at equal weight
    oscillators
        .enumerate()
        .fold(first.boxed(), |bank, (i, osc)| {
            bank.mix(osc, 1.0 / (i + 2) as f32).boxed()
        })
}

/// Chain the recipe's filter stages after `source`.
fn channel_graph(recipe: &SynthesisRecipe, source: Box<dyn GraphNode>) -> Box<dyn GraphNode> {
    recipe
        .stages
        .iter()
        .enumerate()
        .fold(source, |graph, (index, stage)| {
            let filter = stage_filter(stage);
            match recipe.modulation {
                Some(lfo) if lfo.stage == index => graph
                    .through(filter.modulate(
                        LfoNode::sine(lfo.rate_hz),
                        FilterParam::Cutoff,
                        lfo.depth_hz,
                    ))
                    .boxed(),
                _ => graph.through(filter).boxed(),
            }
        })
}

fn stage_filter(stage: &FilterStage) -> FilterNode {
    FilterNode::new(stage.kind, stage.cutoff_hz, stage.q)
}
