//! Request descriptors and wire request construction.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Request, Url};
use serde_json::{Map, Value};

use super::ApiError;

/// Request methods supported by the descriptor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
            RequestMethod::Put => Method::PUT,
            RequestMethod::Delete => Method::DELETE,
        }
    }
}

/// Declarative description of one outbound call.
///
/// Implementors supply the fields of a request; [`build_request`] assembles
/// the wire request from them. Most fields carry defaults so a typical
/// endpoint enum only specifies method, host and path.
pub trait RequestData: Send + Sync {
    /// Request method type.
    fn method(&self) -> RequestMethod;

    /// Host for the end point.
    fn host(&self) -> String;

    /// Request end point (URL path).
    fn end_point(&self) -> String;

    /// Scheme of the request url.
    fn scheme(&self) -> &str {
        "https"
    }

    /// Query params appended to the url, in iteration order.
    /// Duplicate keys are permitted and all are appended.
    fn query_params(&self) -> Option<Vec<(String, String)>> {
        None
    }

    /// Header values copied verbatim onto the request. No defaults are
    /// injected.
    fn header(&self) -> Option<Vec<(String, String)>> {
        None
    }

    /// Request params, serialized as the JSON body when present.
    fn params(&self) -> Option<Map<String, Value>> {
        None
    }

    /// Whether the request needs authentication. Advisory metadata only:
    /// the builder never injects an authorization header, a descriptor
    /// that needs one supplies it via [`RequestData::header`].
    fn is_auth_required(&self) -> bool {
        false
    }
}

/// Build a wire request from a descriptor.
///
/// Pure function of its input: assembles the URL from scheme, host, path and
/// query params, sets the method, copies headers verbatim and serializes
/// `params` as a JSON body. Fails with [`ApiError::InvalidRequest`] when the
/// pieces cannot form a valid URL or the body cannot be serialized. Never
/// performs network activity.
pub fn build_request(request_data: &dyn RequestData) -> Result<Request, ApiError> {
    let base = format!(
        "{}://{}{}",
        request_data.scheme(),
        request_data.host(),
        request_data.end_point()
    );
    let mut url = Url::parse(&base).map_err(|_| ApiError::InvalidRequest)?;

    if let Some(query_params) = request_data.query_params() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &query_params {
            pairs.append_pair(key, value);
        }
    }

    let mut request = Request::new(request_data.method().into(), url);

    if let Some(header) = request_data.header() {
        let headers = request.headers_mut();
        for (key, value) in &header {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| ApiError::InvalidRequest)?;
            let value = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidRequest)?;
            headers.append(name, value);
        }
    }

    if let Some(params) = request_data.params() {
        let body = serde_json::to_vec(&params).map_err(|_| ApiError::InvalidRequest)?;
        *request.body_mut() = Some(body.into());
    }

    Ok(request)
}
