//! Page chrome
//!
//! Navbar styling on scroll, the mobile menu toggle and in-page anchors.

use vitrine_presenter::Document;

pub const NAVBAR: &str = "navbar";
pub const MOBILE_MENU_BUTTON: &str = "mobile-menu-btn";
pub const NAV_LINKS: &str = "nav-links";

pub const SCROLLED_CLASS: &str = "scrolled";
pub const ACTIVE_CLASS: &str = "active";

/// Scroll offset (px) above which the navbar turns compact
pub const SCROLL_THRESHOLD: f32 = 50.0;

/// Navbar appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavbarState {
    #[default]
    Expanded,
    Compact,
}

impl NavbarState {
    pub fn for_scroll(scroll_y: f32) -> Self {
        if scroll_y > SCROLL_THRESHOLD {
            Self::Compact
        } else {
            Self::Expanded
        }
    }
}

/// Result of an anchor click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOutcome {
    /// The browser's own navigation is always suppressed
    pub default_prevented: bool,
    /// Element scrolled into view, if the target exists
    pub scrolled_to: Option<String>,
}

/// Navbar, menu and anchor behaviour
#[derive(Debug, Clone)]
pub struct PageChrome {
    navbar: NavbarState,
    menu_wired: bool,
}

impl PageChrome {
    /// Wire the chrome against the current document
    pub fn init(document: &dyn Document) -> Self {
        let menu_wired = document.element_exists(MOBILE_MENU_BUTTON);
        if !menu_wired {
            log::debug!("No mobile menu button, menu toggle disabled");
        }
        Self {
            navbar: NavbarState::Expanded,
            menu_wired,
        }
    }

    pub fn navbar(&self) -> NavbarState {
        self.navbar
    }

    pub fn is_menu_wired(&self) -> bool {
        self.menu_wired
    }

    /// Update the navbar for a new scroll offset.
    ///
    /// The class list is only touched when the state changes. Returns whether
    /// it did.
    pub fn on_scroll(&mut self, document: &mut dyn Document, scroll_y: f32) -> bool {
        let next = NavbarState::for_scroll(scroll_y);
        if next == self.navbar {
            return false;
        }
        self.navbar = next;
        match next {
            NavbarState::Compact => document.add_class(NAVBAR, SCROLLED_CLASS),
            NavbarState::Expanded => document.remove_class(NAVBAR, SCROLLED_CLASS),
        };
        true
    }

    /// Toggle the mobile menu; returns whether it is now open
    pub fn on_menu_click(&mut self, document: &mut dyn Document) -> Option<bool> {
        if !self.menu_wired {
            return None;
        }
        document.toggle_class(NAV_LINKS, ACTIVE_CLASS)
    }

    /// Handle a click on an `#id` link
    pub fn on_anchor_click(&mut self, document: &mut dyn Document, href: &str) -> AnchorOutcome {
        let target = href.strip_prefix('#').unwrap_or(href);
        let scrolled_to = if !target.is_empty() && document.scroll_into_view(target) {
            document.remove_class(NAV_LINKS, ACTIVE_CLASS);
            Some(target.to_string())
        } else {
            log::debug!("Anchor target '{}' not found", href);
            None
        };
        AnchorOutcome {
            default_prevented: true,
            scrolled_to,
        }
    }
}
