/// Branch chosen by a guard or gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<V> {
    Children(V),
    Fallback(V),
    Nothing,
}

impl<V> Rendered<V> {
    pub fn is_children(&self) -> bool {
        matches!(self, Rendered::Children(_))
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Rendered::Nothing)
    }

    /// The rendered view, whichever branch produced it.
    pub fn into_view(self) -> Option<V> {
        match self {
            Rendered::Children(view) | Rendered::Fallback(view) => Some(view),
            Rendered::Nothing => None,
        }
    }
}
