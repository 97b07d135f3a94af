use crate::Error;

/// Pass 2xx responses through; turn anything else into [`Error::Http`],
/// keeping the body for the caller.
pub async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(res)
}
