use crate::forms::{looks_like_email, require, FieldEdit, ValidationError};
use crate::model::{Account, Provider};

/// One input of the account form.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountField {
    Login(String),
    Password(String),
    Twofa(String),
    /// Provider chosen by name.
    Provider(String),
}

impl FieldEdit<Account> for AccountField {
    fn apply(self, account: &mut Account) {
        match self {
            AccountField::Login(login) => account.login = login,
            AccountField::Password(password) => account.password = password,
            AccountField::Twofa(twofa) => account.twofa = twofa,
            AccountField::Provider(name) => account.provider = Provider::named(name),
        }
    }
}

/// Every field is required and the login must look like an email.
pub fn validate(account: &Account) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    if !looks_like_email(&account.login) {
        missing.push("login");
    }
    require(&mut missing, "password", &account.password);
    require(&mut missing, "twofa", &account.twofa);
    require(&mut missing, "provider", &account.provider.name);
    ValidationError::check(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Form;

    #[test]
    fn test_blank_account_is_invalid() {
        let err = validate(&Account::blank()).unwrap_err();
        assert_eq!(err.fields, vec!["login", "password", "twofa"]);
    }

    #[test]
    fn test_fields_apply() {
        let mut form = Form::new(Account::blank());
        form.edit(AccountField::Login("a@b.com".into()));
        form.edit(AccountField::Password("p".into()));
        form.edit(AccountField::Twofa("123456".into()));
        form.edit(AccountField::Provider("Youtube".into()));

        assert!(validate(form.value()).is_ok());
        assert_eq!(form.value().provider.name, "Youtube");
    }
}
