use std::fmt;

use blog_shared::dto::BlogResponse;
use chrono::{DateTime, TimeZone};

/// Label shown for posts without an author.
pub const ANONYMOUS: &str = "Anonymous";

/// A blog prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub author: String,
    pub avatar: char,
    pub content: String,
    pub posted_at: String,
}

impl PostCard {
    /// Build a card, rendering the timestamp in `tz`.
    pub fn new<Tz: TimeZone>(blog: &BlogResponse, tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let name = blog.user.as_ref().map(|u| u.name.as_str());
        Self {
            author: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(ANONYMOUS)
                .to_string(),
            avatar: avatar_initial(name),
            content: blog.content.clone(),
            posted_at: format_timestamp(&blog.created_at.with_timezone(tz)),
        }
    }
}

impl fmt::Display for PostCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "({}) {}", self.avatar, self.author)?;
        writeln!(f, "{}", self.content)?;
        write!(f, "  {}", self.posted_at)
    }
}

/// First character of the author's name, `U` when there is none.
pub fn avatar_initial(name: Option<&str>) -> char {
    name.and_then(|n| n.trim().chars().next()).unwrap_or('U')
}

/// `2024年11月6日 9:05`
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%Y年%-m月%-d日 %-H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_shared::dto::AuthorResponse;
    use chrono::{FixedOffset, Utc};
    use uuid::Uuid;

    fn blog(user: Option<&str>) -> BlogResponse {
        let at = Utc.with_ymd_and_hms(2024, 11, 6, 0, 5, 0).unwrap();
        BlogResponse {
            id: Uuid::new_v4(),
            content: "hello".into(),
            user: user.map(|name| AuthorResponse {
                id: Uuid::new_v4(),
                name: name.into(),
            }),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2024年1月2日 3:04");
    }

    #[test]
    fn test_card_for_attributed_post() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let card = PostCard::new(&blog(Some("alice")), &tokyo);

        assert_eq!(card.author, "alice");
        assert_eq!(card.avatar, 'a');
        assert_eq!(card.posted_at, "2024年11月6日 9:05");
    }

    #[test]
    fn test_card_for_anonymous_post() {
        let card = PostCard::new(&blog(None), &Utc);

        assert_eq!(card.author, ANONYMOUS);
        assert_eq!(card.avatar, 'U');
        assert_eq!(card.to_string(), "(U) Anonymous\nhello\n  2024年11月6日 0:05");
    }
}
