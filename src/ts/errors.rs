use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("unsupported language: {name}")]
    UnknownLanguage { name: String },
}
