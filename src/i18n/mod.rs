//! Internationalization (i18n) support for user-facing messages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Fr,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Fr => "fr",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Lang::En),
            "fr" | "fr-fr" => Ok(Lang::Fr),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Built-in catalog: (key, english, french)
const BUILTIN: &[(&str, &str, &str)] = &[
    (
        "generate.failed",
        "Failed to generate content. Please try again.",
        "Échec de la génération du contenu. Veuillez réessayer.",
    ),
    (
        "generate.title_required",
        "Please enter a title first",
        "Veuillez d'abord saisir un titre",
    ),
    (
        "generate.empty",
        "The model returned no usable sections.",
        "Le modèle n'a renvoyé aucune section exploitable.",
    ),
    (
        "save.success",
        "Post created successfully!",
        "Article créé avec succès dans Sanity !",
    ),
    (
        "save.failed",
        "Error while creating the post.",
        "Erreur lors de la création de l'article.",
    ),
    (
        "save.authorization",
        "Authorization error. Check your Sanity permissions.",
        "Erreur d'autorisation. Vérifiez vos permissions Sanity.",
    ),
    (
        "save.validation",
        "Validation error. Check the data format.",
        "Erreur de validation. Vérifiez le format des données.",
    ),
    (
        "save.network",
        "Network error. Check your connection.",
        "Erreur réseau. Vérifiez votre connexion.",
    ),
    (
        "contact.required",
        "All fields are required",
        "Tous les champs sont obligatoires",
    ),
    (
        "contact.invalid_email",
        "Invalid email format",
        "Format d'adresse e-mail invalide",
    ),
    (
        "contact.success",
        "Thank you for your message! We'll get back to you soon.",
        "Merci pour votre message ! Nous vous répondrons bientôt.",
    ),
    (
        "contact.failed",
        "Failed to submit contact form. Please try again later.",
        "Échec de l'envoi du formulaire. Veuillez réessayer plus tard.",
    ),
    (
        "contact.fetch_failed",
        "Failed to fetch contact messages",
        "Impossible de récupérer les messages",
    ),
    (
        "contact.id_required",
        "Message ID is required",
        "L'identifiant du message est obligatoire",
    ),
    (
        "contact.updated",
        "Message updated successfully",
        "Message mis à jour",
    ),
    (
        "contact.update_failed",
        "Failed to update contact message",
        "Impossible de mettre à jour le message",
    ),
    (
        "contact.invalid_transition",
        "This status change is not allowed",
        "Ce changement de statut n'est pas autorisé",
    ),
    (
        "query.page_size",
        "Page size must be between 1 and 100",
        "La taille de page doit être comprise entre 1 et 100",
    ),
    (
        "newsletter.email_required",
        "Email is required",
        "L'adresse e-mail est obligatoire",
    ),
    (
        "newsletter.success",
        "Thanks for subscribing!",
        "Merci pour votre inscription !",
    ),
    (
        "newsletter.already_subscribed",
        "This email is already subscribed",
        "Cette adresse est déjà inscrite",
    ),
    (
        "newsletter.failed",
        "An error occurred while subscribing. Please try again later.",
        "Une erreur est survenue lors de l'inscription. Veuillez réessayer plus tard.",
    ),
];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: Lang,
    /// Language data: lang -> key -> translation
    translations: HashMap<Lang, HashMap<String, String>>,
}

impl I18n {
    /// Create a handler with the built-in catalog
    pub fn new(language: Lang) -> Self {
        let mut translations: HashMap<Lang, HashMap<String, String>> = HashMap::new();
        for (key, en, fr) in BUILTIN {
            translations
                .entry(Lang::En)
                .or_default()
                .insert(key.to_string(), en.to_string());
            translations
                .entry(Lang::Fr)
                .or_default()
                .insert(key.to_string(), fr.to_string());
        }

        Self {
            language,
            translations,
        }
    }

    /// Load overrides from `<lang>.yml` files in a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for lang in Lang::ALL {
            let path = dir.join(format!("{}.yml", lang.code()));
            if !path.is_file() {
                continue;
            }

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let mut flat = HashMap::new();
                    flatten_translations(&data, "", &mut flat);
                    self.translations.entry(lang).or_default().extend(flat);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get a translation by key
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(self.language, key)
    }

    /// Get a translation for a specific language
    pub fn get_for_lang(&self, lang: Lang, key: &str) -> String {
        if let Some(value) = self.translations.get(&lang).and_then(|data| data.get(key)) {
            return value.clone();
        }

        // Fallback to English
        if lang != Lang::En {
            if let Some(value) = self.translations.get(&Lang::En).and_then(|data| data.get(key)) {
                return value.clone();
            }
        }

        // Return key as fallback
        key.to_string()
    }
}

/// Flatten nested YAML into dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::String(s) => {
                result.insert(full_key, s.clone());
            }
            serde_yaml::Value::Number(n) => {
                result.insert(full_key, n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                result.insert(full_key, b.to_string());
            }
            _ => {}
        }
    }
}
