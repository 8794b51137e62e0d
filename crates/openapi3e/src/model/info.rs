//! The document's `info` block

use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{Result, require_text};

/// Contact details; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.email.is_none()
    }
}

impl WireObject for Contact {
    fn kind(&self) -> WireKind {
        WireKind::Contact
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("name", Field::opt_str(&self.name)),
            ("url", Field::opt_str(&self.url)),
            ("email", Field::opt_str(&self.email)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    name: String,
    url: Option<String>,
}

impl License {
    /// # Errors
    /// Returns `MissingField` when `name` is blank
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_text(&name, "License", "name")?;
        Ok(Self { name, url: None })
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl WireObject for License {
    fn kind(&self) -> WireKind {
        WireKind::License
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("name", Field::Str(&self.name)),
            ("url", Field::opt_str(&self.url)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    title: String,
    description: Option<String>,
    terms_of_service: Option<String>,
    contact: Option<Contact>,
    license: Option<License>,
    version: String,
}

impl Info {
    /// # Errors
    /// Returns `MissingField` when `title` or `version` is blank
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let version = version.into();
        require_text(&title, "Info", "title")?;
        require_text(&version, "Info", "version")?;
        Ok(Self {
            title,
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            version,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.terms_of_service = Some(url.into());
        self
    }

    /// Attach contact details; an empty contact is dropped
    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = (!contact.is_empty()).then_some(contact);
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl WireObject for Info {
    fn kind(&self) -> WireKind {
        WireKind::Info
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("title", Field::Str(&self.title)),
            ("description", Field::opt_str(&self.description)),
            ("terms_of_service", Field::opt_str(&self.terms_of_service)),
            ("contact", Field::opt_object(&self.contact)),
            ("_license", Field::opt_object(&self.license)),
            ("version", Field::Str(&self.version)),
        ])
    }
}
