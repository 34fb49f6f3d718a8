use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{
    Category, DomainError, GenerationParams, Intent, PromptMessage, Role, Tone,
};

/// Offline stand-in for a real model: classifies by keyword and answers in
/// the same JSON shape a model would.
///
/// Deterministic for a given prompt, so it is suitable for local runs
/// (`--mock-model`) and demos without an API key.
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }

    fn classify(text: &str) -> (Intent, Category, Tone, f64) {
        let text = text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        let (intent, category) = if has(&["cancelar", "cancelación", "cancelacion", "baja"]) {
            (Intent::Cancelacion, Category::Servicio)
        } else if has(&["devolver", "devolución", "devolucion", "reembolso"]) {
            (Intent::Devolucion, Category::Producto)
        } else if has(&["factura", "cobro", "cobraron", "tarjeta", "pago"]) {
            (Intent::Facturacion, Category::Pago)
        } else if has(&["no funciona", "error", "falla", "roto", "no enciende"]) {
            (Intent::SoporteTecnico, Category::Producto)
        } else if has(&["envío", "envio", "llegó", "llego", "entrega"]) {
            (Intent::Otro, Category::Logistica)
        } else {
            (Intent::Otro, Category::Otro)
        };

        let tone = if has(&["urgente", "ya mismo", "inmediato"]) {
            Tone::Urgente
        } else if has(&["inaceptable", "pésimo", "pesimo", "furioso"]) {
            Tone::Enojado
        } else if has(&["otra vez", "de nuevo", "todavía", "todavia"]) {
            Tone::Frustrado
        } else if has(&["gracias", "excelente", "genial"]) {
            Tone::Positivo
        } else {
            Tone::Neutral
        };

        let confidence = if intent == Intent::Otro { 0.35 } else { 0.8 };
        (intent, category, tone, confidence)
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        _params: &GenerationParams,
    ) -> Result<String, DomainError> {
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let (intent, category, tone, confidence) = Self::classify(user);
        debug!("MockCompletionClient: {} / {} / {}", intent, category, tone);

        Ok(serde_json::json!({
            "intent": intent,
            "category": category,
            "tone": tone,
            "confidence": confidence,
        })
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_messages, parse_model_response};

    async fn answer(text: &str) -> String {
        MockCompletionClient::new()
            .complete(&build_messages(text, None), &GenerationParams::CLASSIFICATION)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn answers_parse_into_the_taxonomy() {
        let raw = answer("Quiero cancelar mi suscripción, es urgente").await;
        let result = parse_model_response(&raw, false).unwrap();
        assert_eq!(result.intent(), Intent::Cancelacion);
        assert_eq!(result.tone(), Tone::Urgente);
        assert_eq!(result.confidence(), 0.8);
    }

    #[tokio::test]
    async fn unknown_topics_are_low_confidence_otro() {
        let raw = answer("Hola, buen día").await;
        let result = parse_model_response(&raw, false).unwrap();
        assert_eq!(result.intent(), Intent::Otro);
        assert_eq!(result.category(), Category::Otro);
        assert!(result.confidence() <= 0.4);
    }

    #[tokio::test]
    async fn billing_complaints_map_to_pago() {
        let raw = answer("Me cobraron dos veces la factura otra vez").await;
        let result = parse_model_response(&raw, false).unwrap();
        assert_eq!(result.intent(), Intent::Facturacion);
        assert_eq!(result.category(), Category::Pago);
        assert_eq!(result.tone(), Tone::Frustrado);
    }
}
