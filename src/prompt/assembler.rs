//! Grounded prompt assembly from the winning method's documents
//!
//! Document selection is one decision made once: re-sort the winner's full
//! list by its own retrieval score descending and truncate to top-N. Human
//! grades decided which method won; the method's own ranking decides which
//! of its documents best represent it. Profiles only change how the selected
//! content is laid out per target model.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::prompt::profiles::{BlockOrder, PromptFraming, TargetProfile};
use crate::types::{DocumentJudgment, MethodResults};

/// One content block inside a mixed-content message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// OpenAI-style image reference; the data URL wraps the opaque base64 blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message content: plain text or a block list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// One chat message in a prompt payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Complete generation request for one target model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Assembles per-target payloads from the winning method's documents
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    profiles: Vec<TargetProfile>,
}

impl PromptAssembler {
    /// Create an assembler for the default target pair
    pub fn new() -> Self {
        Self {
            profiles: TargetProfile::default_targets(),
        }
    }

    /// Create with explicit target profiles
    pub fn with_profiles(profiles: Vec<TargetProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[TargetProfile] {
        &self.profiles
    }

    /// Build one payload per target profile from the winner's full list
    ///
    /// Errors with `NoDocumentsForMethod` when the winning method has no
    /// documents; that is a distinct condition from missing scores and must
    /// name the method.
    pub fn assemble(
        &self,
        query: &str,
        winner: &MethodResults,
        top_n: usize,
    ) -> Result<Vec<PromptPayload>> {
        if winner.documents.is_empty() {
            return Err(EngineError::NoDocumentsForMethod {
                method: winner.method.clone(),
            });
        }

        let selected = select_top_documents(&winner.documents, top_n);

        Ok(self
            .profiles
            .iter()
            .map(|profile| build_payload(profile, query, &selected))
            .collect())
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-N documents by the method's own retrieval score, descending
///
/// Annotation grades play no part here; retrieval order is what represents
/// the method's behavior.
fn select_top_documents(documents: &[DocumentJudgment], top_n: usize) -> Vec<DocumentJudgment> {
    let mut sorted = documents.to_vec();
    sorted.sort_by(|a, b| {
        b.document
            .score
            .partial_cmp(&a.document.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

fn build_payload(
    profile: &TargetProfile,
    query: &str,
    documents: &[DocumentJudgment],
) -> PromptPayload {
    let content_text = render_documents(documents);
    let instruction = instruction_text(profile.include_images);

    let messages = match profile.framing {
        PromptFraming::SingleTurn => {
            let text = format!("{instruction}\n\nQuery: {query}\n{content_text}\n{FORMAT_TEXT}");
            let text_block = ContentBlock::Text { text };

            let image_blocks = if profile.include_images {
                image_blocks(documents)
            } else {
                Vec::new()
            };

            let blocks = match profile.block_order {
                BlockOrder::TextFirst => {
                    let mut blocks = vec![text_block];
                    blocks.extend(image_blocks);
                    blocks
                }
                BlockOrder::ImagesFirst => {
                    let mut blocks = image_blocks;
                    blocks.push(text_block);
                    blocks
                }
            };

            vec![ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Blocks(blocks),
            }]
        }
        PromptFraming::SystemUserSplit => vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(format!("{instruction}\n\n{FORMAT_TEXT}")),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Text(format!("Query: {query}\n\n{content_text}")),
            },
        ],
    };

    PromptPayload {
        model: profile.model_id.clone(),
        messages,
        max_tokens: profile.max_tokens,
    }
}

/// Title/content pairs for the selected documents, in selection order
fn render_documents(documents: &[DocumentJudgment]) -> String {
    let mut out = String::new();
    for judgment in documents {
        out.push_str(&format!(
            "Title: {}\nContent: {}\n\n",
            judgment.document.title, judgment.document.content
        ));
    }
    out
}

/// One image block per document carrying image data, in selection order
fn image_blocks(documents: &[DocumentJudgment]) -> Vec<ContentBlock> {
    documents
        .iter()
        .filter_map(|judgment| judgment.document.image_data.as_deref())
        .map(|data| ContentBlock::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/jpeg;base64,{data}"),
            },
        })
        .collect()
}

fn instruction_text(with_images: bool) -> String {
    let source = if with_images {
        "title, content, and provided image data"
    } else {
        "title and content"
    };
    format!(
        "You are an expert statistical analyst. Answer the given query with a detailed \
         and comprehensive statistical insight from the following {source}."
    )
}

const FORMAT_TEXT: &str = "Format the response in the following structure with 3 paragraphs, \
without paragraph title:\n\n\
1. Start the response with a clear classification or a straightforward answer to the query.\n\
2. Provide supporting findings and detailed analysis, including relevant statistical data.\n\
3. Summarize the final conclusion briefly. If the query does not specify a country, provide \
a global perspective in the conclusion based on the provided content.";
