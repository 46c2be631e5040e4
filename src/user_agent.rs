//! User-Agent string for badge requests.
//!
//! shields.io and similar hosts block clients that identify as scripts, so
//! badge fetches present themselves as an Electron/Chrome browser on Linux.

/// Browser-like User-Agent sent with every badge request.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Cypress/3.4.1 Chrome/61.0.3163.100 \
    Electron/2.0.18 Safari/537.36";
