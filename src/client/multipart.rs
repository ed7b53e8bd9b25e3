//! Multipart/form-data body assembly for file uploads.
//!
//! The body is built by hand so part order and the boundary token stay
//! under our control: one text part per scalar parameter, one part per
//! list element under the `key[]` field name, and the binary file part
//! appended last under the `file` field with a `.jpg` filename and
//! `image/jpg` content type.

use crate::client::params::{ParamValue, Params};
use crate::constants::multipart::{
    BOUNDARY_LENGTH, FILE_EXTENSION, FILE_FIELD, FILE_MIME, LIST_FIELD_SUFFIX,
};
use rand::distr::{Alphanumeric, SampleString};

/// An assembled multipart body and the boundary it was built with.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    /// Builds the body with a freshly generated random boundary token.
    pub fn build(params: Option<&Params>, file_name: &str, file_bytes: &[u8]) -> Self {
        let boundary = random_boundary();
        let bytes = encode(params, file_name, file_bytes, &boundary);
        Self { boundary, bytes }
    }

    /// `Content-Type` header value for the whole request
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn random_boundary() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), BOUNDARY_LENGTH)
}

fn encode(params: Option<&Params>, file_name: &str, file_bytes: &[u8], boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(file_bytes.len() + 512);

    if let Some(params) = params {
        for (key, value) in params.iter() {
            match value {
                ParamValue::Scalar(scalar) => {
                    append_text_part(&mut body, boundary, key, &scalar.to_text());
                }
                ParamValue::List(items) => {
                    let field = format!("{key}{LIST_FIELD_SUFFIX}");
                    for item in items {
                        append_text_part(&mut body, boundary, &field, &item.to_text());
                    }
                }
            }
        }
    }

    append_file_part(&mut body, boundary, file_name, file_bytes);
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

fn append_text_part(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file_part(body: &mut Vec<u8>, boundary: &str, file_name: &str, file_bytes: &[u8]) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; \
             filename=\"{file_name}{FILE_EXTENSION}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {FILE_MIME}\r\n\r\n").as_bytes());
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
}
