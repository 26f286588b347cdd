//! Seam to whatever routing system hosts the guards.

/// Routing primitives the navigation guard needs.
pub trait Router {
    fn current_path(&self) -> &str;

    /// Replace the current location with `target`.
    fn redirect(&mut self, target: &str);
}

/// In-memory router: a navigation history plus a log of redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRouter {
    history: Vec<String>,
    redirects: Vec<String>,
}

impl MemoryRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            history: vec![initial_path.into()],
            redirects: Vec::new(),
        }
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.history.push(path.into());
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn redirects(&self) -> &[String] {
        &self.redirects
    }
}

impl Router for MemoryRouter {
    fn current_path(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or("/")
    }

    fn redirect(&mut self, target: &str) {
        match self.history.last_mut() {
            Some(current) => *current = target.to_string(),
            None => self.history.push(target.to_string()),
        }
        self.redirects.push(target.to_string());
    }
}
