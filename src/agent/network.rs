//! Small fully connected Q-network trained with Adam.

use rand::Rng;
use serde::{Deserialize, Serialize};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-8;
/// Per-sample error is clipped before backpropagation
const MAX_ERROR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DenseLayer {
    inputs: usize,
    outputs: usize,
    /// Row-major, `outputs` rows of `inputs` weights
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl DenseLayer {
    /// Xavier-uniform init, scaled by `gain`
    fn new<R: Rng + ?Sized>(inputs: usize, outputs: usize, gain: f64, rng: &mut R) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt() * gain;
        let weights = (0..inputs * outputs)
            .map(|_| rng.random_range(-limit..=limit))
            .collect();
        Self {
            inputs,
            outputs,
            weights,
            biases: vec![0.0; outputs],
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .chunks(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
struct Moments {
    m: Vec<f64>,
    v: Vec<f64>,
}

impl Moments {
    fn zeros(len: usize) -> Self {
        Self {
            m: vec![0.0; len],
            v: vec![0.0; len],
        }
    }
}

/// Adam state for every layer; rebuilt empty after loading a checkpoint
#[derive(Debug, Clone, Default)]
struct AdamState {
    step: i32,
    weights: Vec<Moments>,
    biases: Vec<Moments>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QNetwork {
    layers: Vec<DenseLayer>,
    learning_rate: f64,
    #[serde(skip)]
    adam: AdamState,
}

/// One regression target for a single output
#[derive(Debug, Clone, Copy)]
pub struct TrainingSample<'a> {
    pub input: &'a [f64],
    pub output: usize,
    pub target: f64,
}

impl QNetwork {
    /// `sizes` lists every layer width, input first and output last
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], learning_rate: f64, rng: &mut R) -> Self {
        let last = sizes.len().saturating_sub(2);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                // Small output layer keeps initial Q-values near zero
                let gain = if i == last { 0.1 } else { 1.0 };
                DenseLayer::new(pair[0], pair[1], gain, rng)
            })
            .collect();

        Self {
            layers,
            learning_rate,
            adam: AdamState::default(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.inputs).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.outputs).unwrap_or(0)
    }

    /// Check that every layer is internally consistent and feeds the next one.
    /// Loaded checkpoints go through this before any forward pass.
    pub fn validate(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("no layers".to_string());
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("learning rate {}", self.learning_rate));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.inputs == 0 || layer.outputs == 0 {
                return Err(format!("layer {} is {}x{}", i, layer.inputs, layer.outputs));
            }
            if layer.weights.len() != layer.inputs * layer.outputs {
                return Err(format!(
                    "layer {} has {} weights, expected {}",
                    i,
                    layer.weights.len(),
                    layer.inputs * layer.outputs
                ));
            }
            if layer.biases.len() != layer.outputs {
                return Err(format!(
                    "layer {} has {} biases, expected {}",
                    i,
                    layer.biases.len(),
                    layer.outputs
                ));
            }
            if layer.weights.iter().chain(&layer.biases).any(|v| !v.is_finite()) {
                return Err(format!("layer {} has non-finite parameters", i));
            }
            if i > 0 && self.layers[i - 1].outputs != layer.inputs {
                return Err(format!(
                    "layer {} takes {} inputs but layer {} emits {}",
                    i,
                    layer.inputs,
                    i - 1,
                    self.layers[i - 1].outputs
                ));
            }
        }
        Ok(())
    }

    pub fn predict(&self, input: &[f64]) -> Vec<f64> {
        self.activations(input).pop().unwrap_or_default()
    }

    /// Activations of every layer, starting with the input itself
    fn activations(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut trace = Vec::with_capacity(self.layers.len() + 1);
        trace.push(input.to_vec());
        for (i, layer) in self.layers.iter().enumerate() {
            let mut out = layer.forward(&trace[i]);
            if i + 1 < self.layers.len() {
                out.iter_mut().for_each(|v| *v = v.max(0.0));
            }
            trace.push(out);
        }
        trace
    }

    /// One Adam step on the mean squared error of the selected outputs.
    /// Returns the batch loss before the update.
    pub fn train(&mut self, batch: &[TrainingSample<'_>]) -> f64 {
        if batch.is_empty() || self.layers.is_empty() {
            return 0.0;
        }
        let scale = 1.0 / batch.len() as f64;

        let mut grad_w: Vec<Vec<f64>> = self.layers.iter().map(|l| vec![0.0; l.weights.len()]).collect();
        let mut grad_b: Vec<Vec<f64>> = self.layers.iter().map(|l| vec![0.0; l.outputs]).collect();
        let mut loss = 0.0;

        for sample in batch {
            let trace = self.activations(sample.input);
            let Some(prediction) = trace.last() else {
                continue;
            };
            let Some(predicted) = prediction.get(sample.output) else {
                continue;
            };

            let error = predicted - sample.target;
            loss += 0.5 * error * error * scale;

            let mut delta = vec![0.0; prediction.len()];
            delta[sample.output] = error.clamp(-MAX_ERROR, MAX_ERROR) * scale;

            for (l, layer) in self.layers.iter().enumerate().rev() {
                let input = &trace[l];
                for (o, d) in delta.iter().enumerate() {
                    if *d == 0.0 {
                        continue;
                    }
                    grad_b[l][o] += d;
                    let row = &mut grad_w[l][o * layer.inputs..(o + 1) * layer.inputs];
                    for (g, x) in row.iter_mut().zip(input) {
                        *g += d * x;
                    }
                }

                if l == 0 {
                    break;
                }
                delta = (0..layer.inputs)
                    .map(|i| {
                        if input[i] <= 0.0 {
                            return 0.0;
                        }
                        delta
                            .iter()
                            .enumerate()
                            .map(|(o, d)| d * layer.weights[o * layer.inputs + i])
                            .sum()
                    })
                    .collect();
            }
        }

        self.apply_adam(&grad_w, &grad_b);
        loss
    }

    fn apply_adam(&mut self, grad_w: &[Vec<f64>], grad_b: &[Vec<f64>]) {
        if self.adam.weights.len() != self.layers.len() {
            self.adam = AdamState {
                step: 0,
                weights: self.layers.iter().map(|l| Moments::zeros(l.weights.len())).collect(),
                biases: self.layers.iter().map(|l| Moments::zeros(l.outputs)).collect(),
            };
        }

        self.adam.step += 1;
        let correction1 = 1.0 - BETA1.powi(self.adam.step);
        let correction2 = 1.0 - BETA2.powi(self.adam.step);
        let lr = self.learning_rate;

        let update = |params: &mut [f64], grads: &[f64], moments: &mut Moments| {
            for (((p, g), m), v) in params
                .iter_mut()
                .zip(grads)
                .zip(moments.m.iter_mut())
                .zip(moments.v.iter_mut())
            {
                *m = BETA1 * *m + (1.0 - BETA1) * g;
                *v = BETA2 * *v + (1.0 - BETA2) * g * g;
                let m_hat = *m / correction1;
                let v_hat = *v / correction2;
                *p -= lr * m_hat / (v_hat.sqrt() + ADAM_EPSILON);
            }
        };

        for (l, layer) in self.layers.iter_mut().enumerate() {
            update(&mut layer.weights, &grad_w[l], &mut self.adam.weights[l]);
            update(&mut layer.biases, &grad_b[l], &mut self.adam.biases[l]);
        }
    }
}

impl PartialEq for QNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.layers == other.layers && self.learning_rate == other.learning_rate
    }
}
