//! Request extractors whose rejections render through [`AppError`].
//!
//! Axum's stock `Json` and `Query` reject with plain-text bodies. These
//! wrappers keep malformed bodies and query strings on the same
//! `{error, code}` envelope as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor. Rejections become `400 BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor. Rejections become `400 BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
