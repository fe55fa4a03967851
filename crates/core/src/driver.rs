//! The browser primitives a fill pass needs, independent of what drives them.

/// Kind of form control, derived from its tag and `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Select,
    Password,
    Text,
}

impl ElementKind {
    pub fn classify(tag: &str, input_type: Option<&str>) -> Self {
        if tag.eq_ignore_ascii_case("select") {
            ElementKind::Select
        } else if input_type.is_some_and(|t| t.eq_ignore_ascii_case("password")) {
            ElementKind::Password
        } else {
            ElementKind::Text
        }
    }
}

/// Access to the form controls of the currently loaded page.
///
/// Handles returned by [`form_elements`](FormDriver::form_elements) are only
/// valid until the page changes; stale handles should fail with
/// [`DriverError::StaleElement`].
pub trait FormDriver {
    type Element;

    /// All `input`, `textarea` and `select` elements, in document order.
    fn form_elements(&mut self) -> Result<Vec<Self::Element>, DriverError>;

    /// Lowercase tag name.
    fn tag_name(&mut self, element: &Self::Element) -> Result<String, DriverError>;

    fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Visible text of each option of a select, in order.
    fn option_texts(&mut self, element: &Self::Element) -> Result<Vec<String>, DriverError>;

    /// Select the option at `index`, counted in [`option_texts`](FormDriver::option_texts)
    /// order.
    fn select_option(&mut self, element: &Self::Element, index: usize) -> Result<(), DriverError>;

    fn clear(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    /// Enter text as simulated keystrokes.
    fn type_text(&mut self, element: &Self::Element, text: &str) -> Result<(), DriverError>;

    /// Assign the `value` property directly, without keyboard events.
    fn set_value(&mut self, element: &Self::Element, value: &str) -> Result<(), DriverError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Element is not interactable: {0}")]
    NotInteractable(String),
    #[error("No option at index {0}")]
    NoSuchOption(usize),
    #[error("Element is no longer attached to the page")]
    StaleElement,
    #[error("Browser command failed: {0}")]
    Command(String),
}
