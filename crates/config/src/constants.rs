//! Centralized defaults for the booking assistant
//!
//! Single source of truth for the tuning constants and word tables the
//! chatbot engine starts from. Everything here can be overridden through
//! `AssistantConfig` (YAML file or environment), so none of these values is
//! hardcoded in the engine itself.
//!
//! All words are stored already normalized: lowercase, no diacritics.

/// Scoring thresholds
pub mod thresholds {
    /// Minimum TF-IDF score for a service to be accepted as the intent
    pub const TFIDF_ACCEPTANCE: f64 = 0.12;

    /// Similarity a vocabulary term must exceed to replace a token
    pub const SPELLING_SIMILARITY: f32 = 0.75;

    /// Multiplier applied to a suggestion score when first letters differ
    pub const FIRST_CHAR_PENALTY: f32 = 0.8;
}

/// Size limits
pub mod limits {
    /// Tokens shorter than this are never corrected nor extracted
    pub const MIN_TOKEN_LEN: usize = 3;

    /// Sub-service rows read to build the vocabulary
    pub const VOCABULARY_CATALOG_LIMIT: usize = 500;

    pub const VOCABULARY_MIN_TERM_LEN: usize = 4;
    pub const VOCABULARY_MAX_TERM_LEN: usize = 30;

    pub const MAX_SUGGESTIONS: usize = 5;
    pub const MAX_TOKEN_SUGGESTIONS: usize = 6;

    /// Free-text search results shown at once
    pub const MAX_SEARCH_RESULTS: usize = 12;

    pub const DEFAULT_DAYS: u32 = 1;

    /// Largest day count accepted from a message
    pub const MAX_DAYS: u32 = 365;
}

/// Ordered misspelling table: (regex, replacement)
///
/// Applied top to bottom before any vocabulary-driven correction.
pub const SPELLING_RULES: &[(&str, &str)] = &[
    (r"\b(?:nesecito|nesesito|nececito|necesito|necsito|nesito|nesecita|necesto)\b", "necesito"),
    (r"\b(?:alqiler|alkiler|alquiller|alquilr|alquilet|arquiler|alquier|alquileres)\b", "alquiler"),
    (r"\b(?:publisidad|publicida|publicdad|publisida|pulicidad|publicidd|puvlicidad)\b", "publicidad"),
    (r"\b(?:animasion|animacon|animacio|animaicon|animcion|animazion)\b", "animacion"),
    (r"\b(?:d\s?j|dee?jay|diyei|dyei|dijei|diyey)\b", "dj"),
    (r"\b(?:locusion|locucon|lokucion|locucio|lucucion)\b", "locucion"),
    (r"\b(?:cunia|cunya|kuna|cunha)\b", "cuna"),
    (r"\b(?:luses|lucez|luzes|luse)\b", "luces"),
    (r"\b(?:mescladora|mezcladosa|mescaldora|mezcaldora|mezcladra|mesclador|mezclador)\b", "mezcladora"),
    (r"\b(?:mikrofono|microfno|microfomo|micrfono|microphono|microfon|mircofono)\b", "microfono"),
    (r"\b(?:parled|par-led|par\s+lead|parlet|par\s+let)\b", "par led"),
];

/// Spanish articles, prepositions, conjunctions and pronouns
pub const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "lo", "un", "una", "unos", "unas",
    "de", "del", "al", "a", "ante", "bajo", "con", "contra", "desde", "en", "entre",
    "hacia", "hasta", "para", "por", "segun", "sin", "sobre", "tras",
    "y", "e", "o", "u", "ni", "que", "pero", "sino", "como", "cuando", "donde",
    "mi", "mis", "tu", "tus", "su", "sus", "se", "me", "te", "le", "les", "nos",
    "es", "son", "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas",
    "muy", "ya", "si",
];

/// Words that carry no catalog meaning in a request
pub const FILLER_WORDS: &[&str] = &[
    "necesito", "quiero", "busco", "quisiera", "gustaria", "queria", "tienen", "tiene",
    "tienes", "hay", "dame", "favor", "hola", "buenas", "buenos", "gracias", "ver",
    "algo", "cuanto", "cuesta", "precio", "precios", "cotizar", "cotizacion", "dia",
    "dias", "opciones",
];

/// Extra words never offered as suggestions (on top of stopwords and fillers)
pub const EXTENDED_STOPWORDS: &[&str] = &[
    "servicio", "servicios", "incluye", "incluido", "unidad", "unidades", "hora",
    "horas", "cada", "todo", "todos", "otro", "otros",
];

/// Static vocabulary used before (or without) the catalog
pub const BASE_VOCABULARY: &[&str] = &[
    "alquiler", "animacion", "publicidad", "luces", "dj", "audio", "sonido",
    "microfono", "mezcladora", "parlante", "locucion", "cuna", "spot", "evento",
    "iluminacion", "animador",
];

/// Suggestions offered when nothing in the vocabulary scores
pub const FALLBACK_SUGGESTIONS: &[&str] = &[
    "alquiler", "animacion", "publicidad", "luces", "dj", "audio",
];

/// Per-service intent keywords: (service display name, keywords)
pub const SERVICE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Alquiler",
        &[
            "alquiler", "alquilar", "rentar", "renta", "arriendo", "equipo", "equipos",
            "luces", "mezcladora", "microfono", "parlante", "parlantes", "par led",
            "iluminacion",
        ],
    ),
    (
        "Animación",
        &[
            "animacion", "animador", "animadores", "dj", "locucion", "locutor",
            "maestro de ceremonia", "hora loca", "animar",
        ],
    ),
    (
        "Publicidad",
        &[
            "publicidad", "cuna", "cunas", "spot", "anuncio", "jingle", "propaganda",
            "perifoneo", "publicitar",
        ],
    ),
];

/// On-topic words that do not point at a single service
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "cotizar", "cotizacion", "precio", "precios", "evento", "eventos", "fiesta", "boda",
    "matrimonio", "cumpleanos", "servicio", "servicios", "sonido", "audio", "musica",
    "reserva", "reservar", "show", "catalogo",
];

/// Connector words meaning "add to what I already have"
pub const CONTINUATION_WORDS: &[&str] = &[
    "lo mismo", "tambien", "ademas", "eso", "sigue", "igual", "y", "otro", "otra", "mas",
];
