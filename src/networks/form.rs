use crate::forms::{require, FieldEdit, ValidationError};
use crate::model::Network;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkField {
    Name(String),
    Cidr(String),
    /// Connection token; only the edit form shows it.
    ConnectionConfig(String),
}

impl FieldEdit<Network> for NetworkField {
    fn apply(self, network: &mut Network) {
        match self {
            NetworkField::Name(name) => network.name = name,
            NetworkField::Cidr(cidr) => network.cidr = cidr,
            NetworkField::ConnectionConfig(config) => network.connection_config = config,
        }
    }
}

/// Name and CIDR are required. The CIDR is not parsed.
pub fn validate(network: &Network) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    require(&mut missing, "name", &network.name);
    require(&mut missing, "cidr", &network.cidr);
    ValidationError::check(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cidr_is_opaque() {
        let mut network = Network::blank();
        NetworkField::Name("lab".into()).apply(&mut network);
        assert_eq!(validate(&network).unwrap_err().fields, vec!["cidr"]);

        NetworkField::Cidr("not a cidr".into()).apply(&mut network);
        assert!(validate(&network).is_ok());
    }
}
