use crate::error::ChatError;
use crate::models::{ChatAnswer, ChatOptions, ConversationTurn};
use crate::prompt::{
    build_condense_prompt, build_system_prompt, link_followups, CONDENSE_SYSTEM_PROMPT,
};
use crate::session::ChatSession;
use crate::traits::{ChatModel, Embedder, VectorIndex};

/// The retrieve-then-generate pipeline, constructed once at startup and
/// handed by reference to whatever drives the conversation. Each call
/// to [`ChatPipeline::ask`] is one blocking request/response turn.
pub struct ChatPipeline<E, V, G>
where
    E: Embedder,
    V: VectorIndex,
    G: ChatModel,
{
    embedder: E,
    index: V,
    model: G,
    options: ChatOptions,
}

impl<E, V, G> ChatPipeline<E, V, G>
where
    E: Embedder + Send + Sync,
    V: VectorIndex + Send + Sync,
    G: ChatModel + Send + Sync,
{
    pub fn new(embedder: E, index: V, model: G, options: ChatOptions) -> Self {
        Self {
            embedder,
            index,
            model,
            options,
        }
    }

    /// Answers one question. On success the user and assistant turns
    /// are appended to the session; on any failure the session is left
    /// untouched so the same question can simply be asked again.
    pub async fn ask(
        &self,
        session: &mut ChatSession,
        question: &str,
    ) -> Result<ChatAnswer, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::Request("question is empty".to_string()));
        }

        let history = session.recent(self.options.history_window).to_vec();

        // A follow-up question is first restated as a standalone one so
        // retrieval does not depend on the conversation being in hand.
        let standalone_question = if history.is_empty() {
            None
        } else {
            let condense = build_condense_prompt(&history, question);
            Some(
                self.model
                    .complete(CONDENSE_SYSTEM_PROMPT, &[], &condense)
                    .await?,
            )
        };
        let retrieval_query = standalone_question.as_deref().unwrap_or(question);

        let query_vector = self.embedder.embed(retrieval_query).await?;
        let sources = self.index.query(&query_vector, self.options.top_k).await?;

        let system_prompt = build_system_prompt(&sources);
        let answer = self.model.complete(&system_prompt, &history, question).await?;

        // Link follow-ups key off the original question, not the
        // answer, and are rendered to the user only; the session stores
        // the answer as generated so later prompts do not replay the
        // link markdown as conversation history.
        let mut rendered = answer.clone();
        for message in link_followups(question) {
            rendered.push_str("\n\n");
            rendered.push_str(message);
        }

        session.push(ConversationTurn::user(question));
        session.push(ConversationTurn::assistant(answer));

        Ok(ChatAnswer {
            answer: rendered,
            standalone_question,
            sources,
        })
    }

    pub fn options(&self) -> ChatOptions {
        self.options
    }
}
