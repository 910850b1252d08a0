//! BERT-family sentence encoder on candle
//!
//! Loads a sentence-transformers style model directory (`config.json`,
//! `tokenizer.json` and `model.safetensors` or `pytorch_model.bin`) and
//! produces mean-pooled, L2-normalized embeddings on the CPU.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::info;

use super::embedder::Embedder;
use crate::error::{Error, Result};

const MAX_SEQUENCE_TOKENS: usize = 256;

fn embedding_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Embedding(format!("{context}: {e}"))
}

/// Sentence encoder backed by a BERT model
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl BertEmbedder {
    /// Load model, config and tokenizer from a local directory
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = Device::Cpu;
        info!(dir = %model_dir.display(), "loading sentence encoder");

        let config_path = model_dir.join("config.json");
        let config: Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| embedding_err("invalid model config", e))?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| embedding_err("failed to load tokenizer", e))?;
        tokenizer.with_padding(Some(PaddingParams::default()));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| embedding_err("invalid truncation settings", e))?;

        let safetensors = model_dir.join("model.safetensors");
        let weights: HashMap<String, Tensor> = if safetensors.exists() {
            candle_core::safetensors::load(&safetensors, &device)
                .map_err(|e| embedding_err("failed to read weights", e))?
        } else {
            candle_core::pickle::read_all(model_dir.join("pytorch_model.bin"))
                .map_err(|e| embedding_err("failed to read weights", e))?
                .into_iter()
                .collect()
        };
        let vb = VarBuilder::from_tensors(weights, DTYPE, &device);
        let model =
            BertModel::load(vb, &config).map_err(|e| embedding_err("failed to build model", e))?;

        info!(dim = config.hidden_size, "sentence encoder ready");
        Ok(Self {
            model,
            tokenizer,
            device,
            dim: config.hidden_size,
        })
    }

    fn encode(&self, texts: &[&str]) -> candle_core::Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(candle_core::Error::msg)?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // masked mean pooling over the sequence axis
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
        pooled.broadcast_div(&norms)?.to_vec2::<f32>()
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts)
            .map_err(|e| embedding_err("inference failed", e))
    }
}
