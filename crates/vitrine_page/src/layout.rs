//! Portfolio page layout
//!
//! Element ids the page looks up, and an in-memory document containing all of
//! them for headless runs.

use vitrine_presenter::MemoryDocument;
use vitrine_showcase::loader_scene::LOADER_CONTAINER;

use crate::chrome::{MOBILE_MENU_BUTTON, NAVBAR, NAV_LINKS};

pub const CANVAS: &str = "canvas-3d";
pub const LOADER_OVERLAY: &str = "loader";
pub const FORMACION_SECTION: &str = "formacion";
pub const WALLY_CONTAINER: &str = "formacion-wally-3d";
/// Size of the container created for the wally viewer
pub const WALLY_CONTAINER_SIZE: (u32, u32) = (200, 200);

/// Sections reachable through in-page anchors
pub const SECTIONS: [&str; 5] = ["inicio", "sobre-mi", "experiencia", "formacion", "contacto"];

/// A document carrying every element the portfolio page uses
pub fn portfolio_document(window_width: u32, window_height: u32) -> MemoryDocument {
    let mut document = MemoryDocument::new(window_width, window_height)
        .with_element(CANVAS, (window_width, window_height))
        .with_element(LOADER_OVERLAY, (window_width, window_height))
        .with_element(LOADER_CONTAINER, (200, 200))
        .with_element(NAVBAR, (window_width, 80))
        .with_element(MOBILE_MENU_BUTTON, (40, 40))
        .with_element(NAV_LINKS, (window_width / 2, 40))
        .with_element("model-container-1", (400, 400))
        .with_element("model-container-2", (400, 400))
        .with_element("experiencia-3d-right", (500, 500));

    for section in SECTIONS {
        document = document.with_element(section, (window_width, window_height));
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_presenter::Document;

    #[test]
    fn test_portfolio_document() {
        let doc = portfolio_document(1920, 1080);
        for id in [CANVAS, LOADER_OVERLAY, NAVBAR, FORMACION_SECTION, "experiencia-3d-right"] {
            assert!(doc.element_exists(id), "missing {}", id);
        }
        assert!(!doc.element_exists(WALLY_CONTAINER));
        assert_eq!(doc.element_size(LOADER_CONTAINER), Some((200, 200)));
    }
}
