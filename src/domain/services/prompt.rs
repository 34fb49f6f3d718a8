use crate::domain::{Channel, PromptMessage};

/// Instruction block sent as the system message on every classification call.
pub const SYSTEM_PROMPT: &str = "\
Eres un clasificador de reclamos de postventa. Devuelve ÚNICAMENTE un JSON con:
{ \"intent\": \"...\", \"category\": \"...\", \"tone\": \"...\", \"confidence\": 0.0 }
Intents: cancelacion, devolucion, soporte_tecnico, facturacion, otro.
Categorías: producto, servicio, logistica, pago, otro.
Tono: enojado, neutral, frustrado, positivo, urgente.
Si dudas, usa \"otro\" y confidence <= 0.4.";

/// Build the system + user message pair for an already sanitized complaint.
pub fn build_messages(text: &str, channel: Option<Channel>) -> [PromptMessage; 2] {
    let channel = channel.unwrap_or_default();
    [
        PromptMessage::system(SYSTEM_PROMPT),
        PromptMessage::user(format!("Texto del reclamo:\n{text}\nCanal: {channel}\n")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn builds_system_then_user() {
        let [system, user] = build_messages("Quiero cancelar mi pedido", Some(Channel::Email));
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, SYSTEM_PROMPT);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Texto del reclamo:\nQuiero cancelar mi pedido\nCanal: email\n");
    }

    #[test]
    fn channel_defaults_to_web() {
        let [_, user] = build_messages("hola", None);
        assert!(user.content.ends_with("Canal: web\n"));
    }

    #[test]
    fn system_prompt_lists_every_taxonomy_value() {
        for word in [
            "cancelacion",
            "devolucion",
            "soporte_tecnico",
            "facturacion",
            "producto",
            "servicio",
            "logistica",
            "pago",
            "enojado",
            "frustrado",
            "positivo",
            "urgente",
            "confidence <= 0.4",
        ] {
            assert!(SYSTEM_PROMPT.contains(word), "missing {word}");
        }
    }
}
