use serde::{Deserialize, Serialize};

/// What the customer is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Cancelacion,
    Devolucion,
    SoporteTecnico,
    Facturacion,
    Otro,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Cancelacion,
        Intent::Devolucion,
        Intent::SoporteTecnico,
        Intent::Facturacion,
        Intent::Otro,
    ];

    pub const FALLBACK: Intent = Intent::Otro;

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Cancelacion => "cancelacion",
            Intent::Devolucion => "devolucion",
            Intent::SoporteTecnico => "soporte_tecnico",
            Intent::Facturacion => "facturacion",
            Intent::Otro => "otro",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the taxonomy.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        Self::ALL.into_iter().find(|i| i.as_str() == lowered)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subject area the complaint is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Producto,
    Servicio,
    Logistica,
    Pago,
    Otro,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Producto,
        Category::Servicio,
        Category::Logistica,
        Category::Pago,
        Category::Otro,
    ];

    pub const FALLBACK: Category = Category::Otro;

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Producto => "producto",
            Category::Servicio => "servicio",
            Category::Logistica => "logistica",
            Category::Pago => "pago",
            Category::Otro => "otro",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lowered)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emotional register detected in the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Enojado,
    Neutral,
    Frustrado,
    Positivo,
    Urgente,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Enojado,
        Tone::Neutral,
        Tone::Frustrado,
        Tone::Positivo,
        Tone::Urgente,
    ];

    pub const FALLBACK: Tone = Tone::Neutral;

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Enojado => "enojado",
            Tone::Neutral => "neutral",
            Tone::Frustrado => "frustrado",
            Tone::Positivo => "positivo",
            Tone::Urgente => "urgente",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lowered)
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the complaint came in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Web,
    Whatsapp,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Web => "web",
            Channel::Whatsapp => "whatsapp",
            Channel::Email => "email",
        }
    }

    /// Exact (case-sensitive) match against the accepted channel tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "web" => Some(Channel::Web),
            "whatsapp" => Some(Channel::Whatsapp),
            "email" => Some(Channel::Email),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown channel '{s}' (expected web, whatsapp or email)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_parse_ignores_case() {
        assert_eq!(Intent::parse("CANCELACION"), Some(Intent::Cancelacion));
        assert_eq!(Intent::parse("Soporte_Tecnico"), Some(Intent::SoporteTecnico));
        assert_eq!(Intent::parse("refund"), None);
    }

    #[test]
    fn test_category_and_tone_parse() {
        assert_eq!(Category::parse("Logistica"), Some(Category::Logistica));
        assert_eq!(Category::parse("logística"), None);
        assert_eq!(Tone::parse("URGENTE"), Some(Tone::Urgente));
        assert_eq!(Tone::parse(""), None);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Intent::SoporteTecnico).unwrap();
        assert_eq!(json, "\"soporte_tecnico\"");
        let json = serde_json::to_string(&Channel::Whatsapp).unwrap();
        assert_eq!(json, "\"whatsapp\"");
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        for tone in Tone::ALL {
            assert_eq!(Tone::parse(tone.as_str()), Some(tone));
        }
    }

    #[test]
    fn test_channel_tags_are_case_sensitive() {
        assert_eq!(Channel::from_tag("email"), Some(Channel::Email));
        assert_eq!(Channel::from_tag("Email"), None);
        assert_eq!(Channel::default(), Channel::Web);
        assert!("sms".parse::<Channel>().is_err());
    }
}
