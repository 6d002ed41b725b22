//! Target-model prompt profiles
//!
//! Different generative models want the same grounded content in different
//! shapes: a vision model takes one mixed-content user turn, a text model a
//! system+user split; some want images before text. A profile captures
//! those axes so one assembler serves every target.

use serde::{Deserialize, Serialize};

/// How the instruction framing and query/content split across roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptFraming {
    /// One user turn carrying instruction, query, content, and images
    SingleTurn,
    /// Instruction as a system message, query and content as a user message
    SystemUserSplit,
}

/// Where image blocks sit relative to the text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockOrder {
    TextFirst,
    ImagesFirst,
}

/// Prompt shape for one target generative model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Model identifier sent on the wire (e.g. "gpt-4o")
    pub model_id: String,
    pub framing: PromptFraming,
    pub block_order: BlockOrder,
    /// Attach one image block per selected document
    pub include_images: bool,
    pub max_tokens: u32,
}

impl TargetProfile {
    /// Mixed-content single-turn profile for a vision model
    pub fn vision_single_turn(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            framing: PromptFraming::SingleTurn,
            block_order: BlockOrder::TextFirst,
            include_images: true,
            max_tokens: 1000,
        }
    }

    /// Text-only system+user profile for a non-vision model
    pub fn text_system_user(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            framing: PromptFraming::SystemUserSplit,
            block_order: BlockOrder::TextFirst,
            include_images: false,
            max_tokens: 1000,
        }
    }

    /// The default pair of targets: one vision model, one text model
    pub fn default_targets() -> Vec<Self> {
        vec![
            Self::vision_single_turn("gpt-4o"),
            Self::text_system_user("meta-llama/Meta-Llama-3.1-70B-Instruct"),
        ]
    }
}
