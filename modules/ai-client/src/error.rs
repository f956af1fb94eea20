use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiClientError {
    #[error("{provider} request failed ({status}): {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned no usable completion")]
    EmptyResponse(&'static str),

    #[error("failed to deserialize {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
