//! Oracle backed by a generative model.

use super::{MoveOracle, OracleReply, OracleRequest, parse_reply, system_prompt, user_prompt};
use crate::error::OracleError;
use crate::llm_client::LlmClient;
use tracing::{debug, info, instrument};

/// Asks an LLM for moves and parses its JSON answer.
pub struct LlmOracle {
    name: String,
    client: LlmClient,
}

impl LlmOracle {
    /// Creates an oracle around a configured client.
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(oracle = %name, "Creating LLM oracle");
        Self { name, client }
    }
}

#[async_trait::async_trait]
impl MoveOracle for LlmOracle {
    #[instrument(skip(self, request), fields(oracle = %self.name, ticket = %request.ticket))]
    async fn suggest_move(&self, request: &OracleRequest) -> Result<OracleReply, OracleError> {
        let prompt = user_prompt(request);
        debug!(prompt_length = prompt.len(), "Sending prompt to LLM");

        let text = self
            .client
            .request_move(system_prompt(), &prompt, request.rules.size)
            .await?;
        debug!(response = %text, "LLM answered");

        parse_reply(&text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
