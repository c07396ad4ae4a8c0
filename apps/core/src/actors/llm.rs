use crate::actors::messages::{ActorError, AppError, LlmMessage, PromptKind};
use crate::actors::traits::TextGenerator;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, info};

/// A handle to the OpenRouter LLM actor.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct OpenRouterHandle {
    sender: mpsc::Sender<LlmMessage>,
}

impl OpenRouterHandle {
    /// Creates a new OpenRouter actor and returns a handle to it.
    ///
    /// This will spawn the `OpenRouterRunner` in a new Tokio task. A missing
    /// `api_key` is tolerated; every request then resolves to its fallback
    /// text.
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = OpenRouterRunner::new(receiver, api_url, api_key);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }
}

#[async_trait]
impl TextGenerator for OpenRouterHandle {
    async fn generate_response(
        &self,
        query: String,
        data_context: Option<String>,
        kind: PromptKind,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Generate {
            query,
            data_context,
            kind,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(Duration::from_secs(60), recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }
}

// --- Constants ---
const MODEL: &str = "deepseek/deepseek-r1:free";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const BASE_SYSTEM_PROMPT: &str = "\
IMPORTANT: You are FLOATCHAT, an expert oceanographic AI assistant specializing in Argo float data analysis.
You have access to a comprehensive Argo dataset containing temperature, salinity, depth, and location measurements from autonomous ocean floats worldwide.

Your name is FLOATCHAT. You are not any other AI model. You are specifically FloatChat.

Key capabilities:
- Analyze oceanographic data patterns and trends
- Explain complex oceanographic concepts in simple terms
- Support multiple languages and respond in the user's preferred language
- Provide accurate, scientific explanations
- Suggest appropriate data visualizations

Always be helpful, accurate, and educational in your responses.
Never mention that you are any other model. Always identify yourself as FloatChat.";

const IDENTITY_REMINDER: &str =
    "CRITICAL: Never mention that you are any other model. Always identify yourself as FloatChat.";

// --- Actor Runner (Internal Logic) ---
struct OpenRouterRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    api_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenRouterRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, api_url: String, api_key: Option<String>) -> Self {
        Self {
            receiver,
            api_url,
            api_key,
            client: Client::new(),
        }
    }

    async fn run(mut self) {
        info!("OpenRouter actor started");

        if self.api_key.is_none() {
            error!("OpenRouter API key not found, responses will use fallback texts");
        }

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("OpenRouter actor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Generate {
                query,
                data_context,
                kind,
                responder,
            } => {
                let result = match self
                    .generate_completion(&query, data_context.as_deref(), kind)
                    .await
                {
                    Ok(text) => Ok(text),
                    Err(e) => {
                        error!("OpenRouter request failed: {}", e);
                        Ok(fallback_response(kind))
                    }
                };
                let _ = responder.send(result);
            }
        }
    }

    async fn generate_completion(
        &self,
        query: &str,
        data_context: Option<&str>,
        kind: PromptKind,
    ) -> Result<String, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Config("DEEPSEEK_API_KEY is not set, cannot call OpenRouter".to_string())
        })?;

        let payload = serde_json::json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system_prompt(kind)},
                {"role": "user", "content": user_message(query, data_context, kind)}
            ],
            "max_tokens": 3000,
            "temperature": 0.6,
            "top_p": 0.85,
            "frequency_penalty": 0.1,
            "presence_penalty": 0.1,
            "transform": true
        });

        let request_future = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&payload)
            .send();

        let res = timeout(REQUEST_TIMEOUT, request_future).await??;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Actor(ActorError::LlmError(format!(
                "OpenRouter request failed with status {}: {}",
                status, body
            ))));
        }

        let json: serde_json::Value = res.json().await?;
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Actor(ActorError::LlmError(
                    "OpenRouter response missing message content".to_string(),
                ))
            })
    }
}

fn system_prompt(kind: PromptKind) -> String {
    let focus = match kind {
        PromptKind::DataAnalysis => {
            "Focus on:\n\
             - Analyzing the provided Argo data\n\
             - Identifying patterns, trends, and anomalies\n\
             - Providing statistical insights\n\
             - Suggesting scientific interpretations\n\
             - Recommending visualizations to illustrate findings"
        }
        PromptKind::Visualization => {
            "Focus on:\n\
             - Recommending appropriate visualization types for the data\n\
             - Suggesting specific plot parameters and configurations\n\
             - Explaining what insights each visualization would reveal\n\
             - Considering best practices for oceanographic data visualization"
        }
        PromptKind::Greeting => {
            "When users greet you with greetings like \"hi\", \"hello\", or \"hey\", respond warmly and introduce yourself as FloatChat.\n\
             Provide a brief, friendly welcome message that explains what you can help with.\n\
             Mention that you're an AI assistant for exploring Argo oceanographic data.\n\
             Keep your response concise but welcoming.\n\
             ONLY use this greeting response for actual greetings, not for other questions or queries.\n\
             Example response: \"Hi! I'm FloatChat, your AI assistant for exploring ocean data. I can help you analyze temperature and salinity patterns, create visualizations, and answer questions about oceanography. What would you like to explore?\""
        }
        PromptKind::Explanation => {
            "Focus on:\n\
             - Providing clear, educational explanations\n\
             - Using appropriate scientific terminology\n\
             - Making complex concepts accessible\n\
             - Answering questions about oceanography, Argo floats, and marine science"
        }
    };
    format!("{}\n\n{}\n\n{}", BASE_SYSTEM_PROMPT, focus, IDENTITY_REMINDER)
}

fn user_message(query: &str, data_context: Option<&str>, kind: PromptKind) -> String {
    let mut message = format!("User Query: {}\n\n", query);
    if let Some(context) = data_context {
        message.push_str(&format!("Data Context:\n{}\n\n", context));
    }
    let instruction = match kind {
        PromptKind::DataAnalysis => {
            "Please analyze this data and provide insights about the oceanographic patterns and trends."
        }
        PromptKind::Visualization => {
            "Please suggest appropriate visualizations for this data and explain what insights they would reveal."
        }
        PromptKind::Greeting => {
            "This is a greeting message. Please provide a warm, friendly greeting and introduce yourself as FloatChat, the oceanographic AI assistant. Explain what you can help with. ONLY provide a greeting for actual greetings like 'hi', 'hello', 'hey', not for other questions or queries."
        }
        PromptKind::Explanation => "Please provide a clear and helpful explanation.",
    };
    message.push_str(instruction);
    message
}

/// Canned response used when the OpenRouter API cannot be reached.
pub(crate) fn fallback_response(kind: PromptKind) -> String {
    match kind {
        PromptKind::DataAnalysis => "\
I apologize, but I'm currently unable to connect to the AI analysis service. \
However, I'm FloatChat, your oceanographic AI assistant, and I can tell you that your Argo data query has been processed successfully. \
The data contains valuable oceanographic measurements including temperature, salinity, and depth profiles that can reveal important patterns about ocean conditions.

You may want to examine:
- Temperature vs depth profiles to understand thermocline structure
- Salinity variations with geographic location
- Seasonal patterns in the data
- Regional differences in ocean properties

Please try your analysis request again in a moment."
            .to_string(),
        PromptKind::Visualization => "\
I apologize, but I'm currently unable to connect to the AI visualization service. \
However, I'm FloatChat, your oceanographic AI assistant, and for oceanographic data like yours, I would typically recommend:

- Scatter plots for temperature vs salinity relationships
- Line plots for depth profiles
- Heat maps for geographic distributions
- Time series plots for temporal trends

Please try your visualization request again in a moment."
            .to_string(),
        PromptKind::Greeting | PromptKind::Explanation => "\
I apologize, but I'm currently unable to connect to the AI service to provide a detailed explanation. \
However, I'm FloatChat, your oceanographic AI assistant, and I'm here to help with your oceanographic questions about Argo float data, \
including temperature, salinity, depth measurements, and ocean science concepts.

Please try your question again in a moment, or feel free to ask about specific aspects of oceanographic data analysis."
            .to_string(),
    }
}
