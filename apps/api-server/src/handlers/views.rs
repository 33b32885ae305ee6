//! Domain to wire conversions.

use blog_core::domain::{Blog, User};
use blog_shared::dto::{AuthorResponse, BlogResponse, UserResponse};

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        image: user.image.clone(),
        created_at: user.created_at,
    }
}

pub fn blog_response(blog: Blog) -> BlogResponse {
    BlogResponse {
        id: blog.id,
        content: blog.content,
        user: blog.author.map(|a| AuthorResponse {
            id: a.id,
            name: a.name,
        }),
        created_at: blog.created_at,
        updated_at: blog.updated_at,
    }
}
