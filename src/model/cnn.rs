//! CNN Model Architecture for Cancer Image Classification
//!
//! Convolutional classifier built with the Burn framework. Weights are
//! produced elsewhere and loaded read-only; this module only defines the
//! forward pass the stored record plugs into.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d,
        Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for the CancerClassifier CNN model
///
/// Persisted next to the weights as `config.json`.
#[derive(Config, Debug)]
pub struct CancerClassifierConfig {
    /// Number of output classes (26 in the reference deployment)
    #[config(default = "26")]
    pub num_classes: usize,

    /// Input image size (square)
    #[config(default = "128")]
    pub input_size: usize,

    /// Dropout rate used at training time (inactive at inference)
    #[config(default = "0.3")]
    pub dropout_rate: f64,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Base number of convolutional filters
    #[config(default = "32")]
    pub base_filters: usize,

    /// Units in the hidden fully connected layer
    #[config(default = "256")]
    pub hidden_units: usize,
}

impl CancerClassifierConfig {
    /// Initialize a model with fresh weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> CancerClassifier<B> {
        CancerClassifier::new(self, device)
    }

    /// Check that the architecture is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.num_classes == 0 {
            return Err("num_classes must be greater than 0".to_string());
        }
        if self.input_size < 16 {
            return Err("input_size must be at least 16".to_string());
        }
        if self.in_channels != 3 {
            return Err("in_channels must be 3 (RGB)".to_string());
        }
        if self.base_filters == 0 || self.hidden_units == 0 {
            return Err("base_filters and hidden_units must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err("dropout_rate must be in range [0.0, 1.0)".to_string());
        }
        Ok(())
    }
}

/// A CNN block with Conv2d, BatchNorm, ReLU, and MaxPool
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv: Conv2d<B>,
    pub bn: BatchNorm<B>,
    pub relu: Relu,
    pub pool: MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    pub fn new(in_channels: usize, out_channels: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);

        Self {
            conv,
            bn: BatchNormConfig::new(out_channels).init(device),
            relu: Relu::new(),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = self.bn.forward(x);
        let x = self.relu.forward(x);
        self.pool.forward(x)
    }
}

/// Cancer image classifier
///
/// Architecture:
/// - 4 convolutional blocks (3 -> 32 -> 64 -> 128 -> 256 filters), each halving H and W
/// - Global Average Pooling
/// - Fully connected head with dropout
#[derive(Module, Debug)]
pub struct CancerClassifier<B: Backend> {
    pub conv1: ConvBlock<B>,
    pub conv2: ConvBlock<B>,
    pub conv3: ConvBlock<B>,
    pub conv4: ConvBlock<B>,

    pub global_pool: AdaptiveAvgPool2d,

    pub fc1: Linear<B>,
    pub dropout: Dropout,
    pub fc2: Linear<B>,

    num_classes: usize,
}

impl<B: Backend> CancerClassifier<B> {
    pub fn new(config: &CancerClassifierConfig, device: &B::Device) -> Self {
        let base = config.base_filters;

        Self {
            conv1: ConvBlock::new(config.in_channels, base, device), // 128 -> 64
            conv2: ConvBlock::new(base, base * 2, device),           // 64 -> 32
            conv3: ConvBlock::new(base * 2, base * 4, device),       // 32 -> 16
            conv4: ConvBlock::new(base * 4, base * 8, device),       // 16 -> 8
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc1: LinearConfig::new(base * 8, config.hidden_units).init(device),
            dropout: DropoutConfig::new(config.dropout_rate).init(),
            fc2: LinearConfig::new(config.hidden_units, config.num_classes).init(device),
            num_classes: config.num_classes,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.conv2.forward(x);
        let x = self.conv3.forward(x);
        let x = self.conv4.forward(x);

        // [B, C, H, W] -> [B, C, 1, 1] -> [B, C]
        let x = self.global_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        let x = self.dropout.forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax, rows sum to 1
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(x), 1)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;

    type TestBackend = DefaultBackend;

    #[test]
    fn test_classifier_output_shape() {
        let device = Default::default();
        let config = CancerClassifierConfig::new()
            .with_num_classes(5)
            .with_base_filters(4)
            .with_hidden_units(8);
        let model = CancerClassifier::<TestBackend>::new(&config, &device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 128, 128], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 5]);
        assert_eq!(model.num_classes(), 5);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let device = Default::default();
        let config = CancerClassifierConfig::new()
            .with_num_classes(3)
            .with_base_filters(4)
            .with_hidden_units(8);
        let model = config.init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::ones([1, 3, 32, 32], &device);
        let probs: Vec<f32> = model
            .forward_softmax(input)
            .into_data()
            .to_vec()
            .unwrap();

        assert_eq!(probs.len(), 3);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_config_validate() {
        assert!(CancerClassifierConfig::new().validate().is_ok());
        assert!(CancerClassifierConfig::new()
            .with_num_classes(0)
            .validate()
            .is_err());
        assert!(CancerClassifierConfig::new()
            .with_in_channels(1)
            .validate()
            .is_err());
    }
}
