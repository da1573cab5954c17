use rand::seq::SliceRandom;

/// Launch flags that keep Chromium from advertising automation.
pub const UNDETECTED_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-dev-shm-usage",
    "--disable-background-networking",
    "--disable-sync",
    "--mute-audio",
];

const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

pub struct UserAgentGenerator {
    user_agents: Vec<&'static str>,
}

impl UserAgentGenerator {
    pub fn new() -> Self {
        Self {
            user_agents: DESKTOP_USER_AGENTS.to_vec(),
        }
    }

    pub fn random_user_agent(&self) -> &'static str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(DESKTOP_USER_AGENTS[0])
    }
}

impl Default for UserAgentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Script registered to run before any page script on every new document.
pub fn generate_stealth_script() -> &'static str {
    r#"
    (function() {
        Object.defineProperty(navigator, 'webdriver', { get: () => undefined });

        Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });

        Object.defineProperty(navigator, 'plugins', {
            get: () => [
                { name: 'Chrome PDF Plugin', description: 'Portable Document Format' },
                { name: 'Chrome PDF Viewer', description: 'PDF Viewer' },
                { name: 'Native Client', description: 'Native Client' }
            ]
        });

        if (!window.chrome) {
            window.chrome = { runtime: {} };
        }

        const originalQuery = navigator.permissions && navigator.permissions.query;
        if (originalQuery) {
            navigator.permissions.query = function(parameters) {
                return parameters.name === 'notifications'
                    ? Promise.resolve({ state: Notification.permission })
                    : originalQuery.call(this, parameters);
            };
        }

        // chromedriver leftovers
        delete window.cdc_adoQpoasnfa76pfcZLmcfl_Array;
        delete window.cdc_adoQpoasnfa76pfcZLmcfl_Promise;
        delete window.cdc_adoQpoasnfa76pfcZLmcfl_Symbol;
    })();
    "#
}
