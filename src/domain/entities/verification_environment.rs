use std::fmt;

use crate::config::IssuerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationEnvironment {
    Production,
    Sandbox,
}

impl VerificationEnvironment {
    pub(crate) fn url<'a>(&self, config: &'a IssuerConfig) -> &'a str {
        match self {
            VerificationEnvironment::Production => &config.production_url,
            VerificationEnvironment::Sandbox => &config.sandbox_url,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationEnvironment::Production => "production",
            VerificationEnvironment::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for VerificationEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
