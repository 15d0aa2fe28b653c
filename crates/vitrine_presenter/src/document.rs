//! Document boundary
//!
//! The page talks to its host document only through [`Document`]. Every
//! operation names its element by id; operations on elements that do not
//! exist are no-ops that report `false` (or `None`).

use crate::headless::{HeadlessSurface, SurfaceStatsHandle};
use crate::surface::{RenderSurface, SurfaceConfig};
use std::collections::BTreeMap;

/// Icon placeholder shown in place of a model that failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Icon font classes, e.g. `fas fa-robot`
    pub icon: String,
    /// CSS color, if any
    pub color: Option<String>,
}

impl Glyph {
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Host document operations used by the page
pub trait Document {
    fn element_exists(&self, id: &str) -> bool;

    /// Client size of an element in CSS pixels
    fn element_size(&self, id: &str) -> Option<(u32, u32)>;

    /// Inner size of the window
    fn window_size(&self) -> (u32, u32);

    fn has_class(&self, id: &str, class: &str) -> bool;

    fn add_class(&mut self, id: &str, class: &str) -> bool;

    fn remove_class(&mut self, id: &str, class: &str) -> bool;

    /// Toggle a class; returns whether the class is now present
    fn toggle_class(&mut self, id: &str, class: &str) -> Option<bool> {
        if !self.element_exists(id) {
            return None;
        }
        if self.has_class(id, class) {
            self.remove_class(id, class);
            Some(false)
        } else {
            self.add_class(id, class);
            Some(true)
        }
    }

    fn set_opacity(&mut self, id: &str, opacity: f32) -> bool;

    /// Show or hide an element (inline `display`)
    fn set_visible(&mut self, id: &str, visible: bool) -> bool;

    /// Smooth-scroll so the element's top aligns with the viewport top
    fn scroll_into_view(&mut self, id: &str) -> bool;

    /// Create a child container with a fixed size
    fn insert_container(&mut self, parent: &str, id: &str, size: (u32, u32)) -> bool;

    fn append_glyph(&mut self, container: &str, glyph: Glyph) -> bool;

    /// Create a render surface filling `container`
    fn mount_surface(
        &mut self,
        container: &str,
        size: (u32, u32),
        config: &SurfaceConfig,
    ) -> Option<Box<dyn RenderSurface>>;
}

/// Element state kept by [`MemoryDocument`]
#[derive(Debug, Clone)]
pub struct Element {
    pub parent: Option<String>,
    pub classes: Vec<String>,
    pub size: (u32, u32),
    pub opacity: f32,
    pub visible: bool,
    pub glyphs: Vec<Glyph>,
    /// Number of class list changes that actually altered the list
    pub class_mutations: usize,
    pub scroll_requests: usize,
    pub surfaces: Vec<SurfaceStatsHandle>,
}

impl Element {
    fn new(parent: Option<String>, size: (u32, u32)) -> Self {
        Self {
            parent,
            classes: Vec::new(),
            size,
            opacity: 1.0,
            visible: true,
            glyphs: Vec::new(),
            class_mutations: 0,
            scroll_requests: 0,
            surfaces: Vec::new(),
        }
    }
}

/// In-memory document backed by headless surfaces
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: BTreeMap<String, Element>,
    window_size: (u32, u32),
}

impl MemoryDocument {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            elements: BTreeMap::new(),
            window_size: (window_width, window_height),
        }
    }

    /// Add a top-level element
    pub fn with_element(mut self, id: &str, size: (u32, u32)) -> Self {
        self.elements.insert(id.to_string(), Element::new(None, size));
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Stats of the most recent surface mounted in `id`
    pub fn surface_stats(&self, id: &str) -> Option<SurfaceStatsHandle> {
        self.elements.get(id).and_then(|e| e.surfaces.last().cloned())
    }

    pub fn glyphs(&self, id: &str) -> &[Glyph] {
        self.elements.get(id).map(|e| e.glyphs.as_slice()).unwrap_or(&[])
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl Document for MemoryDocument {
    fn element_exists(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn element_size(&self, id: &str) -> Option<(u32, u32)> {
        self.elements.get(id).map(|e| e.size)
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, id: &str, class: &str) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
            element.class_mutations += 1;
        }
        true
    }

    fn remove_class(&mut self, id: &str, class: &str) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let before = element.classes.len();
        element.classes.retain(|c| c != class);
        if element.classes.len() != before {
            element.class_mutations += 1;
        }
        true
    }

    fn set_opacity(&mut self, id: &str, opacity: f32) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.visible = visible;
                true
            }
            None => false,
        }
    }

    fn scroll_into_view(&mut self, id: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.scroll_requests += 1;
                true
            }
            None => false,
        }
    }

    fn insert_container(&mut self, parent: &str, id: &str, size: (u32, u32)) -> bool {
        if !self.elements.contains_key(parent) || self.elements.contains_key(id) {
            return false;
        }
        self.elements
            .insert(id.to_string(), Element::new(Some(parent.to_string()), size));
        true
    }

    fn append_glyph(&mut self, container: &str, glyph: Glyph) -> bool {
        match self.elements.get_mut(container) {
            Some(element) => {
                element.glyphs.push(glyph);
                true
            }
            None => false,
        }
    }

    fn mount_surface(
        &mut self,
        container: &str,
        size: (u32, u32),
        config: &SurfaceConfig,
    ) -> Option<Box<dyn RenderSurface>> {
        let element = self.elements.get_mut(container)?;
        let surface = HeadlessSurface::new(size.0, size.1, config.clone());
        element.surfaces.push(surface.stats());
        Some(Box::new(surface))
    }
}
