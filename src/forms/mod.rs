use serde::{Deserialize, Serialize};
use url::Url;

/// A failed check on one submitted field, rendered inline above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

fn required(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "This field is required."));
    }
}

fn well_formed_url(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    if !value.trim().is_empty() && Url::parse(value).is_err() {
        errors.push(FieldError::new(field, "Invalid URL."));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// The password is deliberately not a required field; only name and
    /// email are checked.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required("name", &self.name, &mut errors);
        required("email", &self.email, &mut errors);
        errors
    }
}

/// Login never field-validates; a bad email or password comes back as a
/// flashed message instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl PostForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required("title", &self.title, &mut errors);
        required("subtitle", &self.subtitle, &mut errors);
        required("img_url", &self.img_url, &mut errors);
        well_formed_url("img_url", &self.img_url, &mut errors);
        required("body", &self.body, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

impl CommentForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required("comment", &self.comment, &mut errors);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_post_form_requires_every_field() {
        let errors = PostForm::default().validate();

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "subtitle", "img_url", "body"]);
    }

    #[test]
    fn test_post_form_rejects_malformed_url() {
        let form = PostForm {
            title: String::from("Hello World"),
            subtitle: String::from("A greeting"),
            img_url: String::from("not a url"),
            body: String::from("<p>hi</p>"),
        };

        let errors = form.validate();
        assert_eq!(errors, vec![FieldError::new("img_url", "Invalid URL.")]);
    }

    #[test]
    fn test_post_form_accepts_absolute_url() {
        let form = PostForm {
            title: String::from("Hello World"),
            subtitle: String::from("A greeting"),
            img_url: String::from("http://x/img.png"),
            body: String::from("<p>hi</p>"),
        };

        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_register_form_password_is_optional() {
        let form = RegisterForm {
            name: String::from("Reader"),
            email: String::from("reader@example.com"),
            password: String::new(),
        };

        assert!(form.validate().is_empty());

        let missing_name = RegisterForm {
            name: String::from("   "),
            ..form
        };
        let errors = missing_name.validate();
        assert_eq!(errors, vec![FieldError::new("name", "This field is required.")]);
    }
}
