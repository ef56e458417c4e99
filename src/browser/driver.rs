use crate::browser::error::DriverError;
use crate::browser::locator::Locator;

/// Opaque reference to an element resolved by a [`PageDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    id: String,
    locator: Locator,
}

impl ElementRef {
    pub fn new(id: impl Into<String>, locator: Locator) -> Self {
        Self {
            id: id.into(),
            locator,
        }
    }

    /// Driver-specific element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The locator this element was resolved from.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

/// A controllable browser session.
///
/// Every read and every action goes through `&mut self`: one driver belongs
/// to exactly one running scenario.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Resolve a locator against the current page.
    /// Returns `DriverError::ElementNotFound` when nothing matches.
    fn find_element(&mut self, locator: &Locator) -> Result<ElementRef, DriverError>;

    /// Type `text` into an element. Empty text is valid and leaves the field as is.
    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    fn click(&mut self, element: &ElementRef) -> Result<(), DriverError>;

    fn element_text(&mut self, element: &ElementRef) -> Result<String, DriverError>;

    /// Whether the element is displayed and enabled, i.e. a click would land.
    fn is_interactable(&mut self, element: &ElementRef) -> Result<bool, DriverError>;

    fn current_url(&mut self) -> Result<String, DriverError>;

    fn current_title(&mut self) -> Result<String, DriverError>;

    fn page_source(&mut self) -> Result<String, DriverError>;

    /// Close the session. Calling it twice is harmless.
    fn quit(&mut self) -> Result<(), DriverError>;
}

impl<D: PageDriver + ?Sized> PageDriver for Box<D> {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        (**self).navigate(url)
    }

    fn find_element(&mut self, locator: &Locator) -> Result<ElementRef, DriverError> {
        (**self).find_element(locator)
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        (**self).send_keys(element, text)
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), DriverError> {
        (**self).click(element)
    }

    fn element_text(&mut self, element: &ElementRef) -> Result<String, DriverError> {
        (**self).element_text(element)
    }

    fn is_interactable(&mut self, element: &ElementRef) -> Result<bool, DriverError> {
        (**self).is_interactable(element)
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        (**self).current_url()
    }

    fn current_title(&mut self) -> Result<String, DriverError> {
        (**self).current_title()
    }

    fn page_source(&mut self) -> Result<String, DriverError> {
        (**self).page_source()
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        (**self).quit()
    }
}

/// Opens a fresh [`PageDriver`] session for each scenario.
pub trait DriverFactory {
    fn open(&self) -> Result<Box<dyn PageDriver>, DriverError>;
}

impl<F> DriverFactory for F
where
    F: Fn() -> Result<Box<dyn PageDriver>, DriverError>,
{
    fn open(&self) -> Result<Box<dyn PageDriver>, DriverError> {
        self()
    }
}
