//! Payload builder interface.
//!
//! The builder is handed to the handler at construction; nothing in this
//! crate looks one up globally.

use crate::selection::SelectionParams;

/// Produces a calibration payload and the fingerprint of its inputs.
pub trait PayloadBuilder<T> {
    /// Fingerprint of the selection/configuration the payload is built from
    fn metadata_string(&self) -> String;

    /// The built payload, or `None` if the builder could not produce one
    fn get_obj(&mut self) -> Option<T>;
}

impl<T, B: PayloadBuilder<T> + ?Sized> PayloadBuilder<T> for Box<B> {
    fn metadata_string(&self) -> String {
        (**self).metadata_string()
    }

    fn get_obj(&mut self) -> Option<T> {
        (**self).get_obj()
    }
}

/// Builder over an already-built payload.
///
/// Hands out a clone on every request, so repeated cycles see the same
/// object. Used by the CLI (payload read from a file) and in tests.
#[derive(Debug, Clone)]
pub struct StaticPayloadBuilder<T> {
    metadata: String,
    payload: Option<T>,
}

impl<T> StaticPayloadBuilder<T> {
    pub fn new(metadata: impl Into<String>, payload: Option<T>) -> Self {
        Self {
            metadata: metadata.into(),
            payload,
        }
    }

    /// Fingerprint taken from a selection's metadata string
    pub fn from_selection(selection: &SelectionParams, payload: Option<T>) -> Self {
        Self::new(selection.metadata_string(), payload)
    }

    /// A builder whose payload is missing
    pub fn without_payload(metadata: impl Into<String>) -> Self {
        Self::new(metadata, None)
    }

    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = metadata.into();
    }

    pub fn set_payload(&mut self, payload: Option<T>) {
        self.payload = payload;
    }
}

impl<T: Clone> PayloadBuilder<T> for StaticPayloadBuilder<T> {
    fn metadata_string(&self) -> String {
        self.metadata.clone()
    }

    fn get_obj(&mut self) -> Option<T> {
        self.payload.clone()
    }
}
