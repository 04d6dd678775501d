use thiserror::Error;
use tracing::debug;

use crate::lifecycle::CustomResourceResponse;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("failed to serialize custom resource response: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("response url rejected the response with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to deliver custom resource response: {0}")]
    Transport(String),
}

pub fn response_body(response: &CustomResourceResponse) -> Result<String, ResponseError> {
    Ok(serde_json::to_string(response)?)
}

/// PUTs the response to CloudFormation's pre-signed S3 url. Blocking.
///
/// The url is signed without a content type, so the header must be sent
/// empty or S3 rejects the signature.
pub fn send_response(response_url: &str, response: &CustomResourceResponse) -> Result<(), ResponseError> {
    let body = response_body(response)?;
    debug!(status = ?response.status, physical_resource_id = %response.physical_resource_id, "sending custom resource response");
    match ureq::put(response_url)
        .set("Content-Type", "")
        .send_string(&body)
    {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(status, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(ResponseError::Status { status, body })
        }
        Err(e) => Err(ResponseError::Transport(format!("{:#?}", e))),
    }
}
