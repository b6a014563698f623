use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::screen::screen_model::ElementType;
use crate::service::error::ScriptError;

/// Supported test-automation frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "XCUITest")]
    XcuiTest,
    Espresso,
    Playwright,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::XcuiTest, Framework::Espresso, Framework::Playwright];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::XcuiTest => "XCUITest",
            Framework::Espresso => "Espresso",
            Framework::Playwright => "Playwright",
        }
    }

    /// Selector expression for an element, `{identifier}` filled in.
    pub fn selector(&self, element_type: ElementType, identifier: &str) -> String {
        match (self, element_type) {
            (Framework::XcuiTest, ElementType::Button) => format!("app.buttons[\"{}\"]", identifier),
            (Framework::XcuiTest, ElementType::TextField) => {
                format!("app.textFields[\"{}\"]", identifier)
            }
            (Framework::XcuiTest, ElementType::StaticText) => {
                format!("app.staticTexts[\"{}\"]", identifier)
            }
            (Framework::Espresso, _) => format!("onView(withId(R.id.{}))", identifier),
            (Framework::Playwright, _) => {
                format!("page.locator(\"[data-testid={}]\")", identifier)
            }
        }
    }

    /// Existence assertion idiom wrapped around a selector.
    pub fn exists_assertion(&self, element: &str) -> String {
        match self {
            Framework::XcuiTest => format!("XCTAssertTrue({}.exists)", element),
            Framework::Espresso => format!("{}.check(matches(isDisplayed()))", element),
            Framework::Playwright => format!("await expect({}).toBeVisible()", element),
        }
    }

    pub fn enabled_assertion(&self, element: &str) -> String {
        match self {
            Framework::XcuiTest => format!("XCTAssertTrue({}.isEnabled)", element),
            Framework::Espresso => format!("{}.check(matches(isEnabled()))", element),
            Framework::Playwright => format!("await expect({}).toBeEnabled()", element),
        }
    }

    /// Base test-class template with `class_name` substituted.
    pub fn base_template(&self, class_name: &str) -> String {
        let template = match self {
            Framework::XcuiTest => {
                r#"import XCTest

class {className}: XCTestCase {
    let app = XCUIApplication()

    override func setUpWithError() throws {
        continueAfterFailure = false
        app.launch()
    }
}"#
            }
            Framework::Espresso => {
                r#"@RunWith(AndroidJUnit4.class)
public class {className} {
    @Rule
    public ActivityScenarioRule<MainActivity> activityRule =
            new ActivityScenarioRule<>(MainActivity.class);

    @Before
    public void setUp() {
        // Setup code
    }
}"#
            }
            Framework::Playwright => {
                r#"import { test, expect } from '@playwright/test';

test.describe('{className}', () => {
    test.beforeEach(async ({ page }) => {
        await page.goto(baseUrl);
    });
});"#
            }
        };
        template.replace("{className}", class_name)
    }

    pub fn best_practices(&self) -> &'static [&'static str] {
        match self {
            Framework::XcuiTest => &[
                "Use proper XCTest assertions",
                "Handle app launch in setUp",
                "Use proper element queries",
                "Handle element waits properly",
                "Use proper test method naming",
            ],
            Framework::Espresso => &[
                "Use ViewMatchers and ViewActions",
                "Handle IdlingResources",
                "Use proper test annotations",
                "Handle activity scenarios",
                "Use hamcrest matchers",
            ],
            Framework::Playwright => &[
                "Use async/await properly",
                "Handle page objects",
                "Use proper selectors",
                "Handle network conditions",
                "Use proper test fixtures",
            ],
        }
    }

    /// Pattern-specific guidance; generic advice for unknown patterns.
    pub fn pattern_specifics(&self, pattern_id: &str) -> &'static str {
        match (self, pattern_id) {
            (Framework::XcuiTest, "standardXCTest") => {
                "- Use direct XCUIElement interactions\n- Include proper element queries\n- Use XCTAssert methods"
            }
            (Framework::XcuiTest, "chainedPageObject") => {
                "- Implement chainable methods\n- Use @discardableResult\n- Return self or next page"
            }
            (Framework::Espresso, "standardEspresso") => {
                "- Use ViewMatchers and ViewActions\n- Include espresso assertions\n- Handle view hierarchies"
            }
            (Framework::Espresso, "robotPattern") => {
                "- Implement robot methods\n- Include check methods\n- Use screen classes"
            }
            (Framework::Playwright, "pageObjectModel") => {
                "- Implement page classes\n- Use proper locators\n- Handle async operations"
            }
            (Framework::Playwright, "fixtureBasedTests") => {
                "- Use test fixtures\n- Handle test context\n- Implement beforeEach hooks"
            }
            _ => "Follow standard framework conventions",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Framework::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| ScriptError::validation(format!("Unsupported framework: {}", s)))
    }
}
