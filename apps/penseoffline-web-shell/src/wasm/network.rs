use super::*;

/// `fetch` through gloo-net. No timeout and no retry: a hung request
/// hangs its caller.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut request_builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Put => Request::put(&request.url),
        };

        for (header_name, header_value) in &request.headers {
            request_builder = request_builder.header(header_name, header_value);
        }

        let response = if let Some(body) = request.body.as_ref() {
            let body = serde_json::to_string(body).map_err(|error| {
                ApiError::decode(format!("failed to serialize request body: {error}"))
            })?;
            let request = request_builder
                .body(body)
                .map_err(|error| ApiError::network(error.to_string()))?;
            request.send().await.map_err(map_network_error)?
        } else {
            request_builder.send().await.map_err(map_network_error)?
        };

        let status = response.status();
        let body = response.text().await.map_err(map_network_error)?;
        Ok(HttpResponse { status, body })
    }
}

pub(super) fn map_network_error(error: gloo_net::Error) -> ApiError {
    ApiError::network(error.to_string())
}
