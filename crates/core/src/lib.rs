pub mod dom;
pub mod driver;
pub mod dropdown;
pub mod fill;
pub mod matcher;
pub mod page;
pub mod profile;
pub mod similarity;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use driver::{DriverError, ElementKind, FormDriver};
pub use fill::{smart_fill, FieldOutcome, FillConfig, FillMethod, FillReport};
pub use matcher::match_key;
pub use page::Page;
pub use profile::Profile;
pub use similarity::similarity;

/// Parse an HTML string and fill its form with the given profile.
/// This is the primary entry point for offline use.
pub fn fill_html(html: &str, profile: &Profile, config: &FillConfig) -> (Page, FillReport) {
    let mut page = Page::from_html(html, "");
    // Page never fails to list its controls.
    let report = smart_fill(&mut page, profile, config).unwrap_or_default();
    (page, report)
}
