//! Post endpoints (list, fetch, add, edit, delete)

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;

use crate::error::{Operation, Result};
use crate::images::UploadImage;
use crate::models::{DetailedPost, Post};

use super::{Client, decode, image_part};

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct PostData {
    post: DetailedPost,
}

#[derive(Debug, Deserialize)]
struct NewPostData {
    post_id: i64,
}

impl Client {
    /// List posts; `only_mine` narrows the feed to the viewer's own
    pub async fn posts(&self, only_mine: bool) -> Result<Vec<Post>> {
        let response = self
            .authorized(Method::GET, "/posts")?
            .query(&[("is_me", i32::from(only_mine))])
            .send()
            .await?;

        Ok(decode::<PostsData>(Operation::LoadPosts, response)
            .await?
            .data()?
            .posts)
    }

    /// Fetch a single post with its full comment list
    pub async fn post(&self, id: i64) -> Result<DetailedPost> {
        let response = self
            .authorized(Method::GET, &format!("/posts/{id}"))?
            .send()
            .await?;

        Ok(decode::<PostData>(Operation::LoadPost, response)
            .await?
            .data()?
            .post)
    }

    /// Create a post from a cover image and description; returns the new id
    pub async fn add_post(&self, cover: UploadImage, description: &str) -> Result<i64> {
        let form = Form::new()
            .part("cover", image_part(cover)?)
            .text("description", description.to_string());

        let response = self
            .authorized(Method::POST, "/posts")?
            .multipart(form)
            .send()
            .await?;

        Ok(decode::<NewPostData>(Operation::AddPost, response)
            .await?
            .data()?
            .post_id)
    }

    /// Update a post's description; returns the server's confirmation message
    pub async fn update_description(&self, id: i64, description: &str) -> Result<String> {
        let response = self
            .authorized(Method::PUT, &format!("/posts/{id}"))?
            .form(&[("description", description)])
            .send()
            .await?;

        let envelope = decode::<serde_json::Value>(Operation::UpdatePost, response).await?;
        Ok(envelope.message)
    }

    /// Replace a post's cover image; returns the server's confirmation message
    pub async fn change_cover(&self, id: i64, cover: UploadImage) -> Result<String> {
        let form = Form::new().part("cover", image_part(cover)?);

        let response = self
            .authorized(Method::POST, &format!("/posts/{id}/cover"))?
            .multipart(form)
            .send()
            .await?;

        let envelope = decode::<serde_json::Value>(Operation::ChangeCover, response).await?;
        Ok(envelope.message)
    }

    /// Delete a post; returns the server's confirmation message
    pub async fn delete_post(&self, id: i64) -> Result<String> {
        let response = self
            .authorized(Method::DELETE, &format!("/posts/{id}"))?
            .send()
            .await?;

        let envelope = decode::<serde_json::Value>(Operation::DeletePost, response).await?;
        Ok(envelope.message)
    }
}
