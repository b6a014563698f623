use serde::Serialize;

// ============================================================================
// Script patterns: per-framework code skeletons
// ============================================================================

/// A named code-structuring convention with its example skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptPattern {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub skeleton: &'static str,
}

/// Listing entry returned by `GET /api/patterns/:framework`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&ScriptPattern> for PatternSummary {
    fn from(p: &ScriptPattern) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.to_string(),
            description: p.description.to_string(),
        }
    }
}

/// Read-only catalogue keyed by (framework, pattern id).
///
/// Built once at startup and shared; lookups never fail, a miss is empty.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    entries: Vec<(&'static str, ScriptPattern)>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PATTERNS.to_vec(),
        }
    }

    pub fn from_entries(entries: Vec<(&'static str, ScriptPattern)>) -> Self {
        Self { entries }
    }

    /// Patterns for `framework` in catalogue order; empty for unknown frameworks.
    pub fn list_patterns(&self, framework: &str) -> Vec<PatternSummary> {
        self.entries
            .iter()
            .filter(|(fw, _)| *fw == framework)
            .map(|(_, p)| PatternSummary::from(p))
            .collect()
    }

    pub fn get(&self, framework: &str, pattern_id: &str) -> Option<&ScriptPattern> {
        self.entries
            .iter()
            .find(|(fw, p)| *fw == framework && p.id == pattern_id)
            .map(|(_, p)| p)
    }

    /// Skeleton text, or "" when the framework or pattern is unknown.
    pub fn skeleton(&self, framework: &str, pattern_id: &str) -> &'static str {
        self.get(framework, pattern_id).map(|p| p.skeleton).unwrap_or("")
    }

    pub fn frameworks(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for (fw, _) in &self.entries {
            if !out.contains(fw) {
                out.push(fw);
            }
        }
        out
    }
}

const BUILTIN_PATTERNS: &[(&str, ScriptPattern)] = &[
    (
        "XCUITest",
        ScriptPattern {
            id: "chainedPageObject",
            name: "Chained Page Object Pattern",
            description: "Uses chained method calls with page objects, returning self for fluent interface",
            skeleton: r#"
func testSwitchToListView() {
    app.launch()
    signUpPage
        .tapLogin()
        .login(userName: userName, password: password)
        .dismissOverlay()
        .navigateToSideMenu()
        .navigateToLibrary()
        .switchToListView()
}

@discardableResult func tapLogin() -> LoginPage {
    let logInLnk = SignupPageView.logInLnk.element
    XCTAssertTrue(logInLnk.exists, "Login link/button does not exist on the screen")
    logInLnk.tap()
    return LoginPage(testCase: testCase)
}"#,
        },
    ),
    (
        "XCUITest",
        ScriptPattern {
            id: "standardXCTest",
            name: "Standard XCTest Pattern",
            description: "Traditional XCTest style with direct UI element interactions",
            skeleton: r#"
class LoginTests: XCTestCase {
    func testLogin() {
        let app = XCUIApplication()
        app.launch()

        let loginButton = app.buttons["Login"]
        XCTAssertTrue(loginButton.exists)
        loginButton.tap()
    }
}"#,
        },
    ),
    (
        "Espresso",
        ScriptPattern {
            id: "robotPattern",
            name: "Robot Pattern",
            description: "Uses Robot Pattern for better readability and maintenance",
            skeleton: r#"
@Test
fun testLogin() {
    loginRobot {
        enterUsername("user")
        enterPassword("pass")
        clickLogin()
    } verify {
        isHomeScreenVisible()
    }
}"#,
        },
    ),
    (
        "Espresso",
        ScriptPattern {
            id: "standardEspresso",
            name: "Standard Espresso",
            description: "Traditional Espresso style with ViewMatchers and ViewActions",
            skeleton: r#"
@Test
public void testLogin() {
    onView(withId(R.id.username))
        .perform(typeText("username"));
    onView(withId(R.id.password))
        .perform(typeText("password"));
    onView(withId(R.id.login))
        .perform(click());
}"#,
        },
    ),
    (
        "Playwright",
        ScriptPattern {
            id: "pageObjectModel",
            name: "Page Object Model",
            description: "Uses Page Object Model with TypeScript support",
            skeleton: r#"
class LoginPage {
    async login(username, password) {
        await this.usernameInput.fill(username);
        await this.passwordInput.fill(password);
        await this.loginButton.click();
        return new HomePage(this.page);
    }
}

test('user can login', async ({ page }) => {
    const loginPage = new LoginPage(page);
    const homePage = await loginPage.login('user', 'pass');
    await expect(homePage.welcome).toBeVisible();
});"#,
        },
    ),
    (
        "Playwright",
        ScriptPattern {
            id: "fixtureBasedTests",
            name: "Fixture-Based Tests",
            description: "Uses Playwright fixtures and direct selectors",
            skeleton: r#"
test.beforeEach(async ({ page }) => {
    await page.goto('login-url');
});

test('login workflow', async ({ page }) => {
    await page.fill('[data-testid=username]', 'user');
    await page.fill('[data-testid=password]', 'pass');
    await page.click('[data-testid=login]');
});"#,
        },
    ),
];
