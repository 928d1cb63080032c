use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form,
};

use super::TtsRequest;
use crate::error::AppError;

/// `TtsRequest` read from either a urlencoded or a multipart form body.
#[derive(Debug)]
pub struct TtsForm(pub TtsRequest);

#[async_trait]
impl<S> FromRequest<S> for TtsForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidForm(e.body_text()))?;
            return read_multipart(multipart).await.map(TtsForm);
        }

        let Form(request) = Form::<TtsRequest>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidForm(e.body_text()))?;
        Ok(TtsForm(request))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<TtsRequest, AppError> {
    let mut text = None;
    let mut voice_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidForm(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        let value = field
            .text()
            .await
            .map_err(|e| AppError::InvalidForm(e.body_text()))?;

        match name.as_deref() {
            Some("text") => text = Some(value),
            Some("voice_id") => voice_id = Some(value),
            _ => {}
        }
    }

    let text = text.ok_or_else(|| AppError::InvalidForm("missing field `text`".into()))?;
    Ok(TtsRequest { text, voice_id })
}
