use blog_shared::dto::BlogResponse;

use crate::{BlogClient, ClientError};

pub const LOAD_FAILED: &str = "Failed to load posts.";
pub const PUBLISH_FAILED: &str = "Failed to publish post.";

/// What happened to a composed post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publish {
    Posted(BlogResponse),
    /// Blank drafts never reach the server.
    RejectedBlank,
}

/// The home timeline: posts newest first plus a one-shot notice.
#[derive(Debug, Default)]
pub struct Feed {
    posts: Vec<BlogResponse>,
    notice: Option<String>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[BlogResponse] {
        &self.posts
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Replace the posts with the server's list.
    pub async fn refresh(&mut self, client: &BlogClient) -> Result<(), ClientError> {
        match client.list_blogs().await {
            Ok(posts) => {
                self.posts = posts;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Loading the feed failed: {}", e);
                self.notice = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Publish a draft and put it at the top of the feed.
    pub async fn publish(
        &mut self,
        client: &BlogClient,
        draft: &str,
    ) -> Result<Publish, ClientError> {
        if draft.trim().is_empty() {
            return Ok(Publish::RejectedBlank);
        }

        match client.create_blog(draft).await {
            Ok(blog) => {
                self.prepend(blog.clone());
                Ok(Publish::Posted(blog))
            }
            Err(e) => {
                tracing::warn!("Publishing failed: {}", e);
                self.notice = Some(PUBLISH_FAILED.to_string());
                Err(e)
            }
        }
    }

    fn prepend(&mut self, blog: BlogResponse) {
        self.posts.insert(0, blog);
    }
}
