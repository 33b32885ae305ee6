use std::fmt;

/// Application title shown in the header.
pub const APP_TITLE: &str = "Blog App";

/// Top bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Header;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "== {APP_TITLE} ==")
    }
}

/// Sidebar destinations and the CLI command each maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    SignUp,
    LogIn,
    LogOut,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [
        NavItem::Home,
        NavItem::SignUp,
        NavItem::LogIn,
        NavItem::LogOut,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NavItem::Home => "Home",
            NavItem::SignUp => "Sign up",
            NavItem::LogIn => "Log in",
            NavItem::LogOut => "Log out",
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            NavItem::Home => "feed",
            NavItem::SignUp => "signup",
            NavItem::LogIn => "login",
            NavItem::LogOut => "logout",
        }
    }
}

/// Navigation list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sidebar;

impl Sidebar {
    pub fn items(&self) -> &'static [NavItem] {
        &NavItem::ALL
    }
}

impl fmt::Display for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items().iter().enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            write!(f, "{} [{}]", item.label(), item.command())?;
        }
        Ok(())
    }
}
