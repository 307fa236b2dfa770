//! Translation client for on-page label matching.
//!
//! G1 renders its filter labels in Portuguese while the work-items document
//! may carry criteria in English. Labels for the known criteria values come
//! from a static table ([`crate::labels`]); this client is only consulted
//! for values outside that table.
//!
//! The trait-based design mirrors the seams used elsewhere in the pipeline:
//! the navigator holds a `dyn Translate`, so tests can substitute a canned
//! translator instead of hitting the network.

use std::error::Error;

use tracing::{debug, warn};

/// Trait for text translation into a target language.
pub trait Translate {
    /// Translate `text` into the language identified by `target_lang`
    /// (e.g. `"pt"`).
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>>;
}

/// HTTP translator backed by the public gtx translation endpoint.
pub struct HttpTranslator {
    client: reqwest::blocking::Client,
}

impl HttpTranslator {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Translate for HttpTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        let url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            target_lang,
            urlencoding::encode(text)
        );
        let body: serde_json::Value = self.client.get(&url).send()?.error_for_status()?.json()?;
        // Response shape: [[["translated","original",...],...],...]
        let translated = body[0][0][0]
            .as_str()
            .ok_or("translation response missing text")?
            .to_string();
        debug!(original = text, %translated, target_lang, "Translated label");
        Ok(translated)
    }
}

/// Translate with the documented fallback: on any failure, keep the
/// untranslated original.
pub fn translate_or_original(translator: &dyn Translate, text: &str, target_lang: &str) -> String {
    match translator.translate(text, target_lang) {
        Ok(translated) => translated,
        Err(e) => {
            warn!(text, error = %e, "Translation failed; using the untranslated value");
            text.to_string()
        }
    }
}
