//! `lambda_http` glue: event in, [`ApiRequest`] out, and back again.

use lambda_http::{Body, Error, Request, RequestExt, Response};

use crate::api::{ApiRequest, ApiResponse};


pub fn to_api_request(event: Request) -> ApiRequest {
    let query = event
        .query_string_parameters()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let (parts, body) = event.into_parts();

    ApiRequest {
        method: parts.method,
        headers: parts.headers,
        query,
        body: body.to_vec(),
    }
}

pub fn to_response(res: ApiResponse) -> Result<Response<Body>, Error> {
    let body = if res.body.is_empty() {
        Body::Empty
    } else {
        Body::Text(res.body)
    };

    let mut response = Response::builder()
        .status(res.status)
        .body(body)?;
    response.headers_mut().extend(res.headers);

    Ok(response)
}
