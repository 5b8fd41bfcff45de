//! AI writer: prompts and the chat-completions client

mod groq;

pub use groq::{ChatMessage, GroqClient};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{InputError, Result};

/// Kind of article the model is asked to write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticleType {
    #[default]
    Tutoriel,
    Guide,
    Analyse,
    Actualite,
    Comparaison,
    Opinion,
    Interview,
    RetourExperience,
}

impl ArticleType {
    pub const ALL: [ArticleType; 8] = [
        ArticleType::Tutoriel,
        ArticleType::Guide,
        ArticleType::Analyse,
        ArticleType::Actualite,
        ArticleType::Comparaison,
        ArticleType::Opinion,
        ArticleType::Interview,
        ArticleType::RetourExperience,
    ];

    /// Identifier used in requests
    pub fn value(&self) -> &'static str {
        match self {
            ArticleType::Tutoriel => "tutoriel",
            ArticleType::Guide => "guide",
            ArticleType::Analyse => "analyse",
            ArticleType::Actualite => "actualite",
            ArticleType::Comparaison => "comparaison",
            ArticleType::Opinion => "opinion",
            ArticleType::Interview => "interview",
            ArticleType::RetourExperience => "retour-experience",
        }
    }

    /// Display name given to the model
    pub fn title(&self) -> &'static str {
        match self {
            ArticleType::Tutoriel => "Tutoriel technique",
            ArticleType::Guide => "Guide pratique",
            ArticleType::Analyse => "Analyse technique",
            ArticleType::Actualite => "Actualité tech",
            ArticleType::Comparaison => "Comparaison d'outils",
            ArticleType::Opinion => "Article d'opinion",
            ArticleType::Interview => "Interview",
            ArticleType::RetourExperience => "Retour d'expérience",
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for ArticleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        ArticleType::ALL
            .into_iter()
            .find(|t| t.value().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = ArticleType::ALL.iter().map(|t| t.value()).collect();
                format!("Unknown article type: {}. Available: {}", s, known.join(", "))
            })
    }
}

/// What the user asked the writer for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub title: String,
    /// Extra instructions
    pub prompt: Option<String>,
    pub article_type: ArticleType,
    /// Keywords to weave into the text, comma separated
    pub keywords: Option<String>,
}

impl GenerationRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Reject requests the model cannot do anything useful with
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(InputError::TitleRequired.into());
        }
        Ok(())
    }

    /// Messages sent to the chat-completions endpoint
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(user_prompt(self)),
        ]
    }
}

/// Persona and SEO rules for the writer
pub fn system_prompt() -> String {
    "Tu es un expert rédacteur SEO spécialisé en technologie et programmation.
Tu écris exclusivement en français avec une expertise en optimisation pour les moteurs de recherche.

Tes articles respectent ces critères SEO :
- Structure hiérarchique claire (H1, H2, H3)
- Densité de mots-clés optimale (1-2%)
- Phrases courtes et lisibles
- Contenu informatif et engageant
- Meta description attractive
- Inclusion naturelle des mots-clés
- Longueur optimale 800-1500 mots"
        .to_string()
}

/// Article request with the labeled output format the extractor expects
pub fn user_prompt(request: &GenerationRequest) -> String {
    let title = request.title.trim();
    let mut prompt = format!(
        "Génère un article de blog complet optimisé SEO avec le titre : \"{}\"\n\n",
        title
    );

    if let Some(extra) = request.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        prompt.push_str(&format!("Instructions supplémentaires : {}\n", extra));
    }
    if let Some(keywords) = request
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        prompt.push_str(&format!(
            "Mots-clés à inclure naturellement : {}\n",
            keywords
        ));
    }
    prompt.push_str(&format!(
        "Type d'article : {}\n\n",
        request.article_type.title()
    ));

    prompt.push_str(&format!(
        "Format requis :

META_DESCRIPTION: [Une description de 150-160 caractères optimisée SEO]

SLUG: [Un slug SEO-friendly basé sur le titre]

KEYWORDS: [5-8 mots-clés pertinents séparés par des virgules]

EXCERPT: [Un extrait de 2-3 phrases résumant l'article]

CONTENT:
# {title}

[Introduction captivante de 100-150 mots avec le mot-clé principal]

## [Sous-titre H2 avec mots-clés secondaires]

[Contenu détaillé avec exemples pratiques]

### [Sous-titre H3 si nécessaire]

[Plus de contenu structuré]

## Conclusion

[Conclusion engageante qui résume les points clés et incite à l'action]

---

Assure-toi que l'article :
- Soit informatif et utile pour les développeurs/techniciens
- Contienne des exemples concrets quand pertinent
- Ait une structure logique et fluide
- Intègre naturellement les mots-clés
- Soit engageant du début à la fin",
        title = title
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Label;

    #[test]
    fn test_parse_article_type() {
        assert_eq!("guide".parse::<ArticleType>().unwrap(), ArticleType::Guide);
        assert_eq!(
            "Retour-Experience".parse::<ArticleType>().unwrap(),
            ArticleType::RetourExperience
        );
        let err = "poem".parse::<ArticleType>().unwrap_err();
        assert!(err.contains("tutoriel"));
        assert_eq!(ArticleType::default(), ArticleType::Tutoriel);
    }

    #[test]
    fn test_article_type_serde() {
        let json = serde_json::to_string(&ArticleType::RetourExperience).unwrap();
        assert_eq!(json, "\"retour-experience\"");
    }

    #[test]
    fn test_user_prompt_mentions_every_label() {
        let request = GenerationRequest {
            title: "Maîtriser Rust".to_string(),
            prompt: Some("Ton décontracté".to_string()),
            article_type: ArticleType::Guide,
            keywords: Some("rust, ownership".to_string()),
        };
        let prompt = user_prompt(&request);
        assert!(prompt.contains("\"Maîtriser Rust\""));
        assert!(prompt.contains("Instructions supplémentaires : Ton décontracté"));
        assert!(prompt.contains("Mots-clés à inclure naturellement : rust, ownership"));
        assert!(prompt.contains("Type d'article : Guide pratique"));
        assert!(prompt.contains("# Maîtriser Rust"));
        for label in Label::ALL {
            assert!(prompt.contains(label.marker()), "missing {}", label.marker());
        }
    }

    #[test]
    fn test_user_prompt_skips_blank_options() {
        let request = GenerationRequest {
            prompt: Some("  ".to_string()),
            ..GenerationRequest::new("T")
        };
        let prompt = user_prompt(&request);
        assert!(!prompt.contains("Instructions supplémentaires"));
        assert!(!prompt.contains("Mots-clés à inclure"));
    }

    #[test]
    fn test_validate_requires_title() {
        assert!(GenerationRequest::new("  ").validate().is_err());
        assert!(GenerationRequest::new("Rust").validate().is_ok());
        assert_eq!(GenerationRequest::new("x").messages().len(), 2);
    }
}
