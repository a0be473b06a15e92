//! Supported browsers and their WebDriver capability descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HarnessError;

/// Browser under test. Unknown names only exist at the parse/deserialize
/// boundary; once a value of this type exists, capability lookup is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Opera,
    Ie,
}

impl Browser {
    /// All supported browsers, in the order the suite runs them by default.
    pub const ALL: [Browser; 4] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Opera,
        Browser::Ie,
    ];

    /// The `browserName` value the automation server expects.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Opera => "opera",
            Browser::Ie => "internet explorer",
        }
    }

    /// Build the capability map sent with the new-session request.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "browserName".to_string(),
            Value::String(self.wire_name().to_string()),
        );

        match self {
            Browser::Chrome => {
                let mut chrome_options = Map::new();
                chrome_options.insert(
                    "args".to_string(),
                    Value::Array(vec![
                        Value::String("--disable-gpu".to_string()),
                        Value::String("--no-sandbox".to_string()),
                    ]),
                );
                caps.insert(
                    "goog:chromeOptions".to_string(),
                    Value::Object(chrome_options),
                );
            }
            Browser::Firefox => {
                // Empty options object keeps geckodriver from guessing a profile
                caps.insert(
                    "moz:firefoxOptions".to_string(),
                    Value::Object(Map::new()),
                );
            }
            // Opera and IE are selected by browserName alone; the grid node
            // supplies the matching driver
            Browser::Opera | Browser::Ie => {}
        }

        caps
    }
}

impl FromStr for Browser {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "opera" => Ok(Browser::Opera),
            "ie" | "internet explorer" => Ok(Browser::Ie),
            _ => Err(HarnessError::UnsupportedBrowser {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_carry_the_wire_name() {
        for browser in Browser::ALL {
            let caps = browser.capabilities();
            assert_eq!(
                caps.get("browserName").and_then(|v| v.as_str()),
                Some(browser.wire_name()),
                "wrong browserName for {browser:?}"
            );
        }
    }

    #[test]
    fn chrome_capabilities_include_vendor_options() {
        let caps = Browser::Chrome.capabilities();
        assert!(caps.contains_key("goog:chromeOptions"));
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("chrome".parse::<Browser>().unwrap(), Browser::Chrome);
        assert_eq!("FIREFOX".parse::<Browser>().unwrap(), Browser::Firefox);
        assert_eq!("ie".parse::<Browser>().unwrap(), Browser::Ie);
        assert_eq!(
            "internet explorer".parse::<Browser>().unwrap(),
            Browser::Ie
        );
    }

    #[test]
    fn unknown_name_fails_at_the_parse_boundary() {
        let err = "netscape".parse::<Browser>().unwrap_err();
        assert!(matches!(err, HarnessError::UnsupportedBrowser { ref name } if name == "netscape"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let browsers: Vec<Browser> = serde_json::from_str(r#"["chrome", "ie"]"#).unwrap();
        assert_eq!(browsers, vec![Browser::Chrome, Browser::Ie]);
        assert!(serde_json::from_str::<Browser>(r#""netscape""#).is_err());
    }
}
