//! Profile endpoints (get, update, photo upload)

use reqwest::Method;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use crate::error::{Operation, Result};
use crate::images::UploadImage;
use crate::models::ProfileUser;

use super::{Client, decode, image_part};

#[derive(Debug, Deserialize)]
struct ProfileData {
    user: ProfileUser,
}

#[derive(Debug, Serialize)]
struct ProfileUpdateRequest<'a> {
    name: &'a str,
    email: &'a str,
}

impl Client {
    /// Fetch the viewer's profile.
    ///
    /// The returned record carries no phone; callers merge in the local
    /// override ([`ProfileUser::with_phone`]).
    pub async fn profile(&self) -> Result<ProfileUser> {
        let response = self.authorized(Method::GET, "/users/me")?.send().await?;

        Ok(decode::<ProfileData>(Operation::LoadProfile, response)
            .await?
            .data()?
            .user)
    }

    /// Update name and email. Phone never travels through this endpoint.
    pub async fn update_profile(&self, name: &str, email: &str) -> Result<ProfileUser> {
        let response = self
            .authorized(Method::PUT, "/users/me")?
            .json(&ProfileUpdateRequest { name, email })
            .send()
            .await?;

        Ok(decode::<ProfileData>(Operation::UpdateProfile, response)
            .await?
            .data()?
            .user)
    }

    /// Upload a new profile photo; returns the server's confirmation message
    pub async fn update_photo(&self, photo: UploadImage) -> Result<String> {
        let form = Form::new().part("photo", image_part(photo)?);

        let response = self
            .authorized(Method::POST, "/users/photo")?
            .multipart(form)
            .send()
            .await?;

        let envelope = decode::<serde_json::Value>(Operation::UpdatePhoto, response).await?;
        Ok(envelope.message)
    }
}
