use reqwest::StatusCode;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error("{service} responded with {status}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
    },
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
    #[error("upstream response carried no data")]
    MissingData,
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
