use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::url_check::{is_valid_url, same_page};

/// One step of the navigation history.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Url of the page
    pub url: String,

    /// Label that a breadcrumb links with the url (may be empty)
    pub text: String,

    /// Icon name shown next to the label (may be empty)
    pub icon: String,
}

impl NavigationEntry {
    pub fn new(url: &str, text: &str, icon: &str) -> Self {
        NavigationEntry {
            url: url.to_string(),
            text: text.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Breadcrumb history of the pages visited within a module.
///
/// Every page that is entered adds its url. The last entry is the current
/// page, the one below it is where a "back" link should lead. The stack
/// keeps itself short:
///
/// * re-adding the current url changes nothing,
/// * a url with the same label as the current page that only differs in its
///   query string replaces the current page,
/// * a url that is already further down the stack cuts everything from that
///   point on before it is appended again.
///
/// ```
/// use navstack::navigation::NavigationStack;
///
/// let mut nav = NavigationStack::new();
/// nav.add_start_url("https://example.com/index.php", "Example-Module", "").unwrap();
/// nav.add_url("https://example.com/addentry.php", "Add Entry", "").unwrap();
/// assert_eq!(nav.previous_url().unwrap(), "https://example.com/index.php");
///
/// nav.delete_last_url();
/// assert_eq!(nav.url().unwrap(), "https://example.com/index.php");
/// ```
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct NavigationStack {
    entries: Vec<NavigationEntry>,
}

impl NavigationStack {
    pub fn new() -> Self {
        NavigationStack {
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of urls currently on the stack
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reset the stack and seed it with the start page of a module.
    ///
    /// The url is checked before anything is cleared, so an invalid url
    /// leaves the current stack as it was.
    pub fn add_start_url(&mut self, url: &str, text: &str, icon: &str) -> Result<(), NavigationError> {
        check_url(url)?;
        self.clear();
        self.add_url(url, text, icon)?;
        Ok(())
    }

    /// Push a page onto the stack.
    ///
    /// Returns `Ok(true)` if the stack changed and `Ok(false)` if `url` is
    /// already the current page.
    ///
    /// # Errors
    /// * `NavigationError::InvalidUrl` if the url contains illegal characters
    pub fn add_url(&mut self, url: &str, text: &str, icon: &str) -> Result<bool, NavigationError> {
        check_url(url)?;

        let top = match self.entries.last() {
            Some(top) if top.url == url => return Ok(false),
            Some(top) => Some(top),
            None => None,
        };

        // same label and same page, only the query differs: replace the top
        if let Some(top) = top {
            if !text.is_empty() && top.text == text && same_page(url, &top.url) {
                let replaced = self.entries.pop();
                debug!("navigation: replacing {:?} with {}", replaced.map(|e| e.url), url);
            }
        }

        if let Some(pos) = self.entries.iter().position(|entry| entry.url == url) {
            debug!(
                "navigation: {} already at position {}, dropping {} entries",
                url,
                pos,
                self.entries.len() - pos
            );
            self.entries.truncate(pos);
        }

        self.entries.push(NavigationEntry::new(url, text, icon));
        debug!("navigation: pushed {} (depth {})", url, self.entries.len());
        Ok(true)
    }

    /// Remove the last page from the stack and return it.
    ///
    /// The first page is never removed because it is the start of the
    /// module; with one entry left this returns `None`.
    pub fn delete_last_url(&mut self) -> Option<NavigationEntry> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }

    /// All entries, oldest first
    pub fn stack(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.entries.last()
    }

    /// Url of the entry at `index`.
    pub fn stack_entry_url(&self, index: usize) -> Result<&str, NavigationError> {
        self.entries
            .get(index)
            .map(|entry| entry.url.as_str())
            .ok_or(NavigationError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Url of the current page.
    pub fn url(&self) -> Result<&str, NavigationError> {
        self.entries
            .last()
            .map(|entry| entry.url.as_str())
            .ok_or(NavigationError::EmptyStack)
    }

    /// Url of the page before the current one. With a single entry that
    /// entry's url is returned.
    pub fn previous_url(&self) -> Result<&str, NavigationError> {
        if self.entries.is_empty() {
            return Err(NavigationError::EmptyStack);
        }

        let index = self.entries.len().saturating_sub(2);
        Ok(self.entries[index].url.as_str())
    }
}

fn check_url(url: &str) -> Result<(), NavigationError> {
    if is_valid_url(url) {
        Ok(())
    } else {
        Err(NavigationError::InvalidUrl(url.to_string()))
    }
}
