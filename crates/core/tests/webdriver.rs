//! Live browser tests. They need chromedriver listening on localhost:9515,
//! so they only run with `--ignored`.
#![cfg(feature = "webdriver")]

use formfill_core::fill::{smart_fill, FillConfig};
use formfill_core::webdriver::{Browser, WebDriverConfig, WebDriverSession};
use formfill_core::Profile;

#[test]
fn test_browser_from_str() {
    assert_eq!("Chrome".parse::<Browser>().unwrap(), Browser::Chrome);
    assert_eq!("chromium".parse::<Browser>().unwrap(), Browser::Chrome);
    assert_eq!("firefox".parse::<Browser>().unwrap(), Browser::Firefox);
    assert!("safari".parse::<Browser>().is_err());
}

#[test]
#[ignore]
fn test_fill_live_form() {
    let config = WebDriverConfig {
        headless: true,
        ..Default::default()
    };
    let mut session = WebDriverSession::launch(&config).unwrap();
    session
        .goto(concat!(
            "data:text/html,",
            "<input name='fname'><input type='password' name='pw'>",
            "<select name='city'><option>\n  Toronto\n</option></select>",
        ))
        .unwrap();

    let report = smart_fill(&mut session, &Profile::sample(), &FillConfig::default()).unwrap();
    assert_eq!(report.filled_keys(), vec!["first_name", "password", "city"]);

    session.quit().unwrap();
}
