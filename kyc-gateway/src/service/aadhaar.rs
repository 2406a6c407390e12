//! Aadhaar verification service

use super::link::LinkService;
use crate::domain::{AadhaarLinkRequest, CreateAadhaarLinkInput, NewAadhaarLinkRequest};
use crate::error::Result;
use crate::repository::AadhaarLinkRequestRepository;
use validator::Validate;

pub struct AadhaarService<R: AadhaarLinkRequestRepository> {
    link: LinkService<R>,
}

impl<R: AadhaarLinkRequestRepository> AadhaarService<R> {
    pub fn new(link: LinkService<R>) -> Self {
        Self { link }
    }

    /// Validate consent and number, then store only the digest and masked form
    pub async fn start(&self, input: CreateAadhaarLinkInput) -> Result<AadhaarLinkRequest> {
        input.validate()?;
        let new = NewAadhaarLinkRequest::from(&input);
        self.link.create(&new).await
    }

    pub async fn send_otp(&self, request_id: &str) -> Result<AadhaarLinkRequest> {
        self.link.send_otp(request_id).await
    }

    pub async fn verify_otp(&self, request_id: &str, otp: &str) -> Result<AadhaarLinkRequest> {
        self.link.verify_otp(request_id, otp).await
    }

    pub async fn finalize(&self, request_id: &str) -> Result<AadhaarLinkRequest> {
        self.link.finalize(request_id).await
    }

    pub async fn status(&self, request_id: &str) -> Result<AadhaarLinkRequest> {
        self.link.get(request_id).await
    }
}
