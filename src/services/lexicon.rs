// Lexicons
// Fixed emotive-keyword and action-verb word lists used by the stasis checks.
// Matching is whole-word and case-insensitive over `word_tokens`.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::text_processor::word_tokens;

const EMOTIVE_WORDS: &[&str] = &[
    // Italian
    "paura", "paure", "terrore", "angoscia", "ansia", "ansie", "panico", "inquietudine",
    "tristezza", "triste", "tristi", "malinconia", "nostalgia", "dolore", "dolori",
    "sofferenza", "disperazione", "disperato", "disperata", "rimpianto", "rimorso",
    "gioia", "felice", "felici", "felicità", "sollievo", "speranza", "speranze",
    "amore", "odio", "rabbia", "furia", "collera", "rancore", "vergogna", "colpa",
    "solitudine", "emozione", "emozioni", "sentimento", "sentimenti", "cuore",
    "lacrime", "lacrima", "piangeva", "pianse", "singhiozzava", "sospirò", "sospirava",
    "sentiva", "provava", "tremava", "commossa", "commosso", "turbata", "turbato",
    "smarrimento", "nodo", "vuoto",
    // English
    "fear", "afraid", "terror", "dread", "anxiety", "sadness", "sad", "sorrow", "grief",
    "despair", "joy", "happy", "happiness", "relief", "hope", "love", "hate", "anger",
    "rage", "shame", "guilt", "loneliness", "emotion", "emotions", "feeling", "feelings",
    "heart", "tears", "wept", "sighed", "felt",
];

const ACTION_WORDS: &[&str] = &[
    // Italian, infinitive and common third-person forms
    "correre", "corse", "correva", "corre", "corsero", "correvano",
    "afferrare", "afferrò", "afferrava", "afferra",
    "aprire", "aprì", "apriva", "apre", "spalancò", "spalancava",
    "chiudere", "chiuse", "chiudeva", "chiude", "sbatté",
    "prendere", "prese", "prendeva", "prende", "raccolse", "raccoglieva",
    "colpire", "colpì", "colpiva", "colpisce",
    "saltare", "saltò", "saltava", "salta", "balzò", "balzava",
    "spingere", "spinse", "spingeva", "spinge",
    "tirare", "tirò", "tirava", "tira", "trascinò", "trascinava",
    "lanciare", "lanciò", "lanciava", "lancia", "scagliò",
    "entrare", "entrò", "entrava", "entra", "entrarono",
    "uscire", "uscì", "usciva", "esce", "uscirono",
    "fuggire", "fuggì", "fuggiva", "fugge", "scappare", "scappò", "scappava", "scappa",
    "combattere", "combatté", "combatteva", "lottò", "lottava",
    "estrasse", "estraeva", "impugnò", "impugnava", "brandì",
    "sparare", "sparò", "sparava", "spara",
    "gridò", "gridava", "urlò", "urlava",
    "attaccare", "attaccò", "attaccava", "attacca", "assalì",
    "raggiunse", "raggiungeva", "inseguì", "inseguiva",
    "salire", "salì", "saliva", "sale", "scendere", "scese", "scendeva", "scende",
    "avanzò", "avanzava", "avanza", "indietreggiò",
    "mosse", "muoveva", "camminò", "camminava", "cammina",
    "sollevò", "sollevava", "afferrarono", "bussò", "calciò", "schivò", "ruppe",
    // English
    "run", "ran", "runs", "grabbed", "grabs", "opened", "opens", "closed", "slammed",
    "took", "struck", "hit", "jumped", "leapt", "pushed", "pulled", "dragged", "threw",
    "entered", "fled", "escaped", "fought", "drew", "shot", "shouted", "screamed",
    "attacked", "reached", "chased", "climbed", "descended", "stepped", "moved",
    "walked", "lifted", "kicked", "dodged", "broke", "seized", "rushed",
];

fn emotive_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| EMOTIVE_WORDS.iter().copied().collect())
}

fn action_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ACTION_WORDS.iter().copied().collect())
}

/// `token` must already be lowercase
pub fn is_emotive_word(token: &str) -> bool {
    emotive_set().contains(token)
}

/// `token` must already be lowercase
pub fn is_action_word(token: &str) -> bool {
    action_set().contains(token)
}

pub fn contains_emotive(text: &str) -> bool {
    word_tokens(text).iter().any(|t| is_emotive_word(t))
}

pub fn contains_action(text: &str) -> bool {
    word_tokens(text).iter().any(|t| is_action_word(t))
}
