use crate::forms::{require, FieldEdit, ValidationError};

/// Network id the selector starts on: nothing chosen.
pub const NO_NETWORK: &str = "0";

/// State of the register-node form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegistration {
    pub code: String,
    pub network_id: String,
}

impl Default for NodeRegistration {
    fn default() -> Self {
        Self {
            code: String::new(),
            network_id: NO_NETWORK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeField {
    Code(String),
    NetworkId(String),
}

impl FieldEdit<NodeRegistration> for NodeField {
    fn apply(self, form: &mut NodeRegistration) {
        match self {
            NodeField::Code(code) => form.code = code,
            NodeField::NetworkId(id) => form.network_id = id,
        }
    }
}

pub fn validate(form: &NodeRegistration) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    require(&mut missing, "code", &form.code);
    if form.network_id.trim().is_empty() || form.network_id == NO_NETWORK {
        missing.push("network_id");
    }
    ValidationError::check(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_must_be_chosen() {
        let mut form = NodeRegistration::default();
        NodeField::Code("ABC".into()).apply(&mut form);
        assert_eq!(validate(&form).unwrap_err().fields, vec!["network_id"]);

        NodeField::NetworkId("3".into()).apply(&mut form);
        assert!(validate(&form).is_ok());
    }
}
