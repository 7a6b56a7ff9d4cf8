//! Feed-forward regression network exported from the trained Keras model.
//!
//! Each layer stores its kernel in Keras layout (`inputs x units`), so a
//! batch of rows is evaluated as `activation(batch * kernel + bias)`.

use chrono::{DateTime, Utc};
use nalgebra::{DMatrix, RowDVector};
use serde::Deserialize;

use crate::error::InferenceError;
use crate::inference::{ensure_columns, Regressor};
use crate::models::FEATURE_COUNT;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub input_features: Option<Vec<String>>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, value: f64) -> f64 {
        match self {
            Activation::Linear => value,
            Activation::Relu => value.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-value).exp()),
            Activation::Tanh => value.tanh(),
        }
    }
}

#[derive(Debug, Clone)]
struct DenseLayer {
    kernel: DMatrix<f64>,
    bias: RowDVector<f64>,
    activation: Activation,
}

#[derive(Debug, Clone)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Build the network, checking that consecutive layer widths line up
    /// and that the first layer accepts the eight student features.
    pub fn from_layers(specs: &[LayerSpec]) -> Result<Self, String> {
        if specs.is_empty() {
            return Err("model has no layers".to_string());
        }

        let mut layers = Vec::with_capacity(specs.len());
        let mut width = FEATURE_COUNT;

        for (index, spec) in specs.iter().enumerate() {
            if spec.weights.len() != width {
                return Err(format!(
                    "layer {index} takes {} inputs, expected {width}",
                    spec.weights.len()
                ));
            }

            let units = spec.bias.len();
            if units == 0 {
                return Err(format!("layer {index} has no units"));
            }
            if let Some(row) = spec.weights.iter().position(|row| row.len() != units) {
                return Err(format!(
                    "layer {index} weight row {row} has {} entries, expected {units}",
                    spec.weights[row].len()
                ));
            }

            let finite = spec
                .weights
                .iter()
                .flatten()
                .chain(spec.bias.iter())
                .all(|value| value.is_finite());
            if !finite {
                return Err(format!("layer {index} contains a non-finite parameter"));
            }

            let flat: Vec<f64> = spec.weights.iter().flatten().copied().collect();
            layers.push(DenseLayer {
                kernel: DMatrix::from_row_slice(width, units, &flat),
                bias: RowDVector::from_vec(spec.bias.clone()),
                activation: spec.activation,
            });
            width = units;
        }

        Ok(Self { layers })
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn output_width(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.kernel.ncols())
    }
}

impl Regressor for DenseNetwork {
    fn predict(&self, batch: &DMatrix<f64>) -> Result<DMatrix<f64>, InferenceError> {
        ensure_columns("model input", batch, FEATURE_COUNT)?;

        let mut activations = batch.clone();
        for layer in &self.layers {
            let product = &activations * &layer.kernel;
            activations = DMatrix::from_fn(product.nrows(), product.ncols(), |r, c| {
                layer.activation.apply(product[(r, c)] + layer.bias[c])
            });
        }

        Ok(activations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(weights: Vec<Vec<f64>>, bias: Vec<f64>, activation: Activation) -> LayerSpec {
        LayerSpec {
            weights,
            bias,
            activation,
        }
    }

    fn two_layer_specs() -> Vec<LayerSpec> {
        // Hidden unit 0 sums every feature; unit 1 is the negated sum.
        let hidden = layer(
            vec![vec![1.0, -1.0]; FEATURE_COUNT],
            vec![0.0, 0.0],
            Activation::Relu,
        );
        let output = layer(vec![vec![2.0], vec![3.0]], vec![0.5], Activation::Linear);
        vec![hidden, output]
    }

    #[test]
    fn forward_pass_applies_kernel_bias_and_activation() {
        let network = DenseNetwork::from_layers(&two_layer_specs()).unwrap();
        let positive = DMatrix::from_row_slice(1, FEATURE_COUNT, &[1.0; FEATURE_COUNT]);
        let negative = DMatrix::from_row_slice(1, FEATURE_COUNT, &[-1.0; FEATURE_COUNT]);

        // relu(8) * 2 + relu(-8) * 3 + 0.5
        assert_eq!(network.predict(&positive).unwrap()[(0, 0)], 16.5);
        // relu(-8) * 2 + relu(8) * 3 + 0.5
        assert_eq!(network.predict(&negative).unwrap()[(0, 0)], 24.5);
    }

    #[test]
    fn evaluates_each_row_of_a_batch() {
        let network = DenseNetwork::from_layers(&two_layer_specs()).unwrap();
        let mut values = vec![0.5; FEATURE_COUNT];
        values.extend(vec![0.0; FEATURE_COUNT]);
        let batch = DMatrix::from_row_slice(2, FEATURE_COUNT, &values);

        let output = network.predict(&batch).unwrap();
        assert_eq!(output.shape(), (2, 1));
        assert_eq!(output[(0, 0)], 8.5);
        assert_eq!(output[(1, 0)], 0.5);
    }

    #[test]
    fn sigmoid_and_tanh_activations() {
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
        assert_eq!(Activation::Relu.apply(-3.0), 0.0);
        assert_eq!(Activation::Linear.apply(-3.0), -3.0);
    }

    #[test]
    fn rejects_mismatched_layer_widths() {
        let mut specs = two_layer_specs();
        specs[1].weights.pop();
        let err = DenseNetwork::from_layers(&specs).unwrap_err();
        assert_eq!(err, "layer 1 takes 1 inputs, expected 2");
    }

    #[test]
    fn rejects_first_layer_without_eight_inputs() {
        let specs = vec![layer(vec![vec![1.0]; 5], vec![0.0], Activation::Linear)];
        let err = DenseNetwork::from_layers(&specs).unwrap_err();
        assert_eq!(err, "layer 0 takes 5 inputs, expected 8");
    }

    #[test]
    fn rejects_ragged_rows_and_empty_models() {
        let mut specs = two_layer_specs();
        specs[0].weights[3].push(1.0);
        let err = DenseNetwork::from_layers(&specs).unwrap_err();
        assert_eq!(err, "layer 0 weight row 3 has 3 entries, expected 2");

        assert_eq!(
            DenseNetwork::from_layers(&[]).unwrap_err(),
            "model has no layers"
        );
    }

    #[test]
    fn activation_defaults_to_linear() {
        let spec: LayerSpec = serde_json::from_str(r#"{"weights": [[1.0]], "bias": [0.0]}"#).unwrap();
        assert_eq!(spec.activation, Activation::Linear);
    }
}
