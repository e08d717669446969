use crate::ports::outbound::AuthorityCheck;

/// Authorizes exactly one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAuthority {
    address: String,
}

impl FixedAuthority {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl AuthorityCheck for FixedAuthority {
    fn is_authorized(&self, sender: &str) -> bool {
        !sender.is_empty() && sender == self.address
    }

    fn describe(&self) -> String {
        self.address.clone()
    }
}
