//! Generate an article and create it in the CMS

use anyhow::Result;
use chrono::Utc;

use crate::content::PostDocument;
use crate::error::Error;
use crate::llm::GenerationRequest;
use crate::BlogWriter;

/// Generate, convert and save a post; returns the new document id
pub async fn run(writer: &BlogWriter, request: &GenerationRequest) -> Result<String> {
    let i18n = writer.i18n()?;
    let llm = writer.llm_client()?;
    let cms = writer.cms_client()?;

    let article = llm.generate(request).await?;
    if article.is_sparse() {
        eprintln!("{}", i18n.get("generate.empty"));
    }

    let post = PostDocument::from_generated(&request.title, &article, Utc::now())?;
    for warning in post.seo_warnings() {
        tracing::warn!("{}", warning);
    }

    match cms.create(&post).await {
        Ok(id) => {
            println!("{}", i18n.get("save.success"));
            println!("  {} [{}]", post.slug.current, id);
            Ok(id)
        }
        Err(err) => {
            if let Error::Save { kind, .. } = &err {
                eprintln!("{} {}", i18n.get("save.failed"), i18n.get(kind.hint_key()));
            }
            Err(err.into())
        }
    }
}
