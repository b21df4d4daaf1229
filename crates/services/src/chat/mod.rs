//! Text chat with the diabetes assistant.
//!
//! The client keeps the conversation history and sends it whole on every
//! call; the service prepends the assistant persona before forwarding to
//! the provider, so clients cannot override it.

pub mod ports;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::CompletionProfile;
use provider::{ApiKey, CallOptions, ChatCompletionParams, ChatMessage, MessageRole, ProviderClient};

use ports::{ChatService, ChatServiceError};

const SYSTEM_PROMPT: &str = "Tu es un assistant spécialisé pour les personnes diabétiques. \
    Tu fournis des conseils précis et scientifiquement validés sur la gestion du diabète, \
    l'alimentation, les médicaments, l'activité physique et le suivi de la glycémie. \
    Tu peux suggérer des aliments à faible indice glycémique, expliquer comment gérer \
    les situations difficiles comme l'hypoglycémie, et donner des conseils pratiques \
    pour maintenir un bon équilibre glycémique. Tu n'es pas un médecin et tu dois \
    toujours rappeler que tes conseils ne remplacent pas l'avis d'un professionnel de santé.";

pub struct ChatServiceImpl {
    provider: Arc<dyn ProviderClient>,
    profile: CompletionProfile,
}

impl ChatServiceImpl {
    pub fn new(provider: Arc<dyn ProviderClient>, profile: CompletionProfile) -> Self {
        Self { provider, profile }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn respond(
        &self,
        messages: Vec<ChatMessage>,
        api_key: ApiKey,
    ) -> Result<String, ChatServiceError> {
        tracing::debug!(turns = messages.len(), "answering chat conversation");

        let mut full_conversation = Vec::with_capacity(messages.len() + 1);
        full_conversation.push(ChatMessage::text(MessageRole::System, SYSTEM_PROMPT));
        full_conversation.extend(messages);

        let params = ChatCompletionParams {
            model: self.profile.model.clone(),
            messages: full_conversation,
            max_tokens: self.profile.max_tokens,
            temperature: self.profile.temperature,
            response_format: None,
            stream: false,
        };
        let options = CallOptions::new(api_key, Duration::from_secs(self.profile.timeout_secs));

        let response = self.provider.chat_completion(params, &options).await?;
        let reply = response
            .content()
            .map(str::to_string)
            .ok_or(ChatServiceError::EmptyReply)?;

        tracing::info!(model = %self.profile.model, "chat reply generated");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provider::mock::{MockFailure, MockProvider, ResponseTemplate};
    use provider::MessageContent;

    fn test_profile() -> CompletionProfile {
        CompletionProfile {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: Some(800),
            temperature: Some(0.7),
            timeout_secs: 25,
        }
    }

    #[tokio::test]
    async fn test_respond_prepends_system_prompt() {
        let mock = Arc::new(MockProvider::new());
        mock.set_default_response(ResponseTemplate::new(
            "Pensez à surveiller votre glycémie après le repas.",
        ))
        .await;
        let service = ChatServiceImpl::new(mock.clone(), test_profile());

        let reply = service
            .respond(
                vec![ChatMessage::text(
                    MessageRole::User,
                    "Que puis-je manger au petit-déjeuner ?",
                )],
                ApiKey::new("sk-test"),
            )
            .await
            .unwrap();
        assert_eq!(reply, "Pensez à surveiller votre glycémie après le repas.");

        let requests = mock.chat_requests().await;
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        let MessageContent::Text(system) = &messages[0].content else {
            panic!("expected a text system message");
        };
        assert!(system.starts_with("Tu es un assistant spécialisé pour les personnes diabétiques."));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(requests[0].max_tokens, Some(800));
        assert!(requests[0].response_format.is_none());
    }

    #[tokio::test]
    async fn test_respond_maps_provider_failures() {
        let mock = Arc::new(MockProvider::new());
        mock.fail_chat(MockFailure::Timeout { timeout_secs: 25 }).await;
        let service = ChatServiceImpl::new(mock.clone(), test_profile());

        let err = service
            .respond(
                vec![ChatMessage::text(MessageRole::User, "Bonjour")],
                ApiKey::new("sk-test"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChatServiceError::Timeout));
    }
}
