//! Tests for the in-memory page driver.

use formfill_core::driver::{DriverError, FormDriver};
use formfill_core::Page;

const FORM: &str = r#"
<html><body>
    <form>
        <input type="text" name="first" value="Ann">
        <input type="text" name="locked" readonly value="fixed">
        <input type="hidden" name="token" value="t">
        <textarea name="notes">hello</textarea>
        <select name="size" disabled><option>Small</option></select>
        <select name="color">
            <option> Red </option>
            <option selected>Green</option>
        </select>
    </form>
    <script>var x = "<input name='fake'>";</script>
</body></html>
"#;

#[test]
fn test_controls_in_document_order() {
    let mut page = Page::from_html(FORM, "http://localhost/form");
    let ids = page.form_elements().unwrap();
    assert_eq!(ids.len(), 6);
    assert_eq!(page.url(), "http://localhost/form");

    let tags: Vec<String> = ids.iter().map(|id| page.tag_name(id).unwrap()).collect();
    assert_eq!(tags, vec!["input", "input", "input", "textarea", "select", "select"]);
    assert_eq!(page.attribute(&0, "name").unwrap().as_deref(), Some("first"));
    assert_eq!(page.attribute(&0, "placeholder").unwrap(), None);
}

#[test]
fn test_initial_values() {
    let page = Page::from_html(FORM, "");
    assert_eq!(page.value_by_name("first"), Some("Ann"));
    assert_eq!(page.value_by_name("notes"), Some("hello"));
    assert_eq!(page.value_by_name("color"), Some("Green"));
    // No `selected` option: the browser shows the first one
    assert_eq!(page.value_by_name("size"), Some("Small"));
}

#[test]
fn test_select_defaults_to_first_option() {
    let page = Page::from_html(
        r#"<select name="a"><option>One</option><option>Two</option></select>
           <select name="b"></select>"#,
        "",
    );
    assert_eq!(page.value_by_name("a"), Some("One"));
    assert_eq!(page.value_by_name("b"), None);
}

#[test]
fn test_typing_appends_until_cleared() {
    let mut page = Page::from_html(FORM, "");
    page.type_text(&0, "ie").unwrap();
    assert_eq!(page.value(0), Some("Annie"));
    page.clear(&0).unwrap();
    page.type_text(&0, "Bo").unwrap();
    assert_eq!(page.value(0), Some("Bo"));
}

#[test]
fn test_readonly_and_hidden_reject_typing() {
    let mut page = Page::from_html(FORM, "");
    assert!(matches!(page.clear(&1), Err(DriverError::NotInteractable(_))));
    assert!(matches!(page.type_text(&2, "x"), Err(DriverError::NotInteractable(_))));
    assert!(matches!(page.type_text(&4, "x"), Err(DriverError::NotInteractable(_))));

    // Script assignment is not bound by those rules
    page.set_value(&2, "new").unwrap();
    assert_eq!(page.value(2), Some("new"));
}

#[test]
fn test_select_option() {
    let mut page = Page::from_html(FORM, "");
    assert_eq!(page.option_texts(&5).unwrap(), vec!["Red", "Green"]);

    page.select_option(&5, 0).unwrap();
    assert_eq!(page.value(5), Some("Red"));

    assert!(matches!(page.select_option(&5, 9), Err(DriverError::NoSuchOption(9))));
    assert!(matches!(page.select_option(&4, 0), Err(DriverError::NotInteractable(_))));
    assert!(matches!(page.select_option(&0, 0), Err(DriverError::NotInteractable(_))));
}

#[test]
fn test_unknown_handle_is_stale() {
    let mut page = Page::from_html(FORM, "");
    assert!(matches!(page.tag_name(&99), Err(DriverError::StaleElement)));
    assert!(matches!(page.set_value(&99, "x"), Err(DriverError::StaleElement)));
}

#[test]
fn test_values_listing() {
    let mut page = Page::from_html(FORM, "");
    page.clear(&0).unwrap();
    page.type_text(&0, "Zed").unwrap();
    let values = page.values();
    assert_eq!(values.len(), 6);
    assert_eq!(values[0].name.as_deref(), Some("first"));
    assert_eq!(values[0].value.as_deref(), Some("Zed"));
    assert_eq!(values[4].value.as_deref(), Some("Small"));
}

#[test]
fn test_empty_page() {
    let page = Page::from_html("<p>No form here</p>", "");
    assert!(page.is_empty());
    assert!(page.values().is_empty());
}
