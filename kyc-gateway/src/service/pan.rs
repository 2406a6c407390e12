//! PAN verification service

use super::link::LinkService;
use crate::domain::{CreatePanLinkInput, PanLinkRequest};
use crate::error::Result;
use crate::repository::PanLinkRequestRepository;
use validator::Validate;

pub struct PanService<R: PanLinkRequestRepository> {
    link: LinkService<R>,
}

impl<R: PanLinkRequestRepository> PanService<R> {
    pub fn new(link: LinkService<R>) -> Self {
        Self { link }
    }

    pub async fn start(&self, input: CreatePanLinkInput) -> Result<PanLinkRequest> {
        input.validate()?;
        self.link.create(&input).await
    }

    pub async fn send_otp(&self, request_id: &str) -> Result<PanLinkRequest> {
        self.link.send_otp(request_id).await
    }

    pub async fn verify_otp(&self, request_id: &str, otp: &str) -> Result<PanLinkRequest> {
        self.link.verify_otp(request_id, otp).await
    }

    pub async fn finalize(&self, request_id: &str) -> Result<PanLinkRequest> {
        self.link.finalize(request_id).await
    }

    pub async fn status(&self, request_id: &str) -> Result<PanLinkRequest> {
        self.link.get(request_id).await
    }
}
