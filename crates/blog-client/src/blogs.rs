use blog_shared::dto::{BlogResponse, CreateBlogRequest};
use reqwest::Method;

use crate::transport::decode;
use crate::{BlogClient, ClientError};

impl BlogClient {
    /// Every blog, newest first.
    pub async fn list_blogs(&self) -> Result<Vec<BlogResponse>, ClientError> {
        let response = self
            .transport
            .send(self.transport.request(Method::GET, "/api/blogs"))
            .await?;
        decode(response).await
    }

    /// Publish a blog as the signed-in user (or anonymously when the server
    /// allows it).
    pub async fn create_blog(&self, content: &str) -> Result<BlogResponse, ClientError> {
        let response = self
            .transport
            .send(
                self.transport
                    .request(Method::POST, "/api/blogs")
                    .json(&CreateBlogRequest::new(content)),
            )
            .await?;
        decode(response).await
    }
}
