/// Open/closed state of the lightbox, keyed by the expanded card.
///
/// Holds at most one card. [`Session::begin`] refuses to stack a second
/// card on top of an open one; callers close first.
#[derive(Debug)]
pub struct Session<C> {
    expanded: Option<C>,
}

impl<C> Default for Session<C> {
    fn default() -> Self {
        Self { expanded: None }
    }
}

impl<C> Session<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.expanded.is_some()
    }

    pub fn expanded(&self) -> Option<&C> {
        self.expanded.as_ref()
    }

    /// Records `card` as expanded. Returns it back if another card is
    /// still open.
    pub fn begin(&mut self, card: C) -> Result<(), C> {
        if self.expanded.is_some() {
            return Err(card);
        }
        self.expanded = Some(card);
        Ok(())
    }

    /// Clears the expanded card, returning it. `None` means nothing was open.
    pub fn end(&mut self) -> Option<C> {
        self.expanded.take()
    }
}
